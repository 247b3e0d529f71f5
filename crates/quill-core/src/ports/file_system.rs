//! FileSystem port - OS ファイル API の抽象化
//!
//! Writer はこの trait だけを通してディスクに触る。
//! 本番は `OsFileSystem`、テストでは故障注入用のラッパーに差し替える。
//!
//! # 必要な能力
//! - create_dir_all / open / write / sync / close
//! - remove_file（best-effort cleanup 用）
//! - rename（replace-if-exists の atomic 置き換え）
//! - read_dir / modified（orphan sweeper 用）

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// ファイルを開くモード（どちらも write-only・create-if-absent）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// 既存の中身を open した瞬間に切り詰める（in-place 用）
    Truncate,
    /// 同名ファイルが既にあれば失敗する（exclusive create、temp 用）
    CreateNew,
}

/// FileSystem は Writer が必要とする最小限の OS ファイル操作
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数スレッドから同じ Writer を使える）
pub trait FileSystem: Send + Sync {
    /// open が返すハンドル。close されるまで Writer が排他的に所有する。
    type Handle;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn open(&self, path: &Path, mode: OpenMode) -> io::Result<Self::Handle>;

    /// 書き込んだバイト数を返す。`bytes.len()` より少なければ short write。
    fn write(&self, handle: &mut Self::Handle, bytes: &[u8]) -> io::Result<usize>;

    /// durability barrier
    fn sync(&self, handle: &mut Self::Handle) -> io::Result<()>;

    fn close(&self, handle: Self::Handle) {
        drop(handle);
    }

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// `to` が存在すれば atomic に置き換える
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}
