//! quill-core
//!
//! bytes を論理パスに丸ごと保存する durable write の部品。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TargetPath, SaveState, SaveError）
//! - **ports**: 抽象化レイヤー（Saver, FileSystem, TempNameGenerator, Clock）
//! - **impls**: 実装（OsFileSystem, InPlaceWriter, AtomicReplaceWriter）
//! - **app**: 使う側の道具（SaverBuilder, WriterConfig, BlockingSaver, OrphanSweeper）
//!
//! # 2 つの戦略
//! - `InPlaceWriter`: truncate して直接書く。途中で失敗すると壊れる（比較用）
//! - `AtomicReplaceWriter`: temp に書いて fsync し、rename で置き換える
//!
//! ```ignore
//! use quill_core::prelude::*;
//!
//! let saver = AtomicReplaceWriter::new();
//! saver.save(Path::new("./data/"), "hello.txt", b"Hello, World!")?;
//! ```

pub mod domain;
pub mod ports;
pub mod impls;
pub mod app;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude {
    pub use crate::app::{SaverBuilder, Strategy, WriterConfig};
    pub use crate::domain::{SaveError, SaveErrorKind};
    pub use crate::impls::{AtomicReplaceWriter, InPlaceWriter};
    pub use crate::ports::Saver;
}
