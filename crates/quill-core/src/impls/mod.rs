//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **OsFileSystem**: `std::fs` による FileSystem
//! - **InPlaceWriter**: truncate して直接書く（比較用ベースライン）
//! - **AtomicReplaceWriter**: temp + fsync + rename（本命）

pub mod os_fs;
pub mod in_place;
pub mod atomic;

use std::io;

use crate::ports::FileSystem;

// 主要な型を再エクスポート
pub use self::os_fs::OsFileSystem;
pub use self::in_place::InPlaceWriter;
pub use self::atomic::AtomicReplaceWriter;

/// payload 全体を 1 回の write で書く。short write は `WriteZero` として扱う。
pub(crate) fn write_payload<F: FileSystem + ?Sized>(
    fs: &F,
    handle: &mut F::Handle,
    payload: &[u8],
) -> io::Result<()> {
    let written = fs.write(handle, payload)?;
    if written < payload.len() {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {written} of {} bytes", payload.len()),
        ));
    }
    Ok(())
}
