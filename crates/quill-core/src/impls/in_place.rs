//! InPlaceWriter - target を直接 truncate して書き直す（比較用ベースライン）
//!
//! # 既知の弱点（仕様として残す）
//! - open した瞬間に旧データが消える。write / sync の途中で失敗・クラッシュすると
//!   target は空か書きかけのまま残る
//! - 並行 reader は切り詰められた／書きかけの内容を見うる
//!
//! 単一 writer・小さなファイル全体の更新以外には使わないこと。
//! 安全な置き換えは [`AtomicReplaceWriter`](super::AtomicReplaceWriter)。

use std::path::Path;

use tracing::{debug, info};

use super::{OsFileSystem, write_payload};
use crate::domain::{SaveError, SaveErrorKind, TargetPath};
use crate::ports::{FileSystem, OpenMode, Saver};

pub struct InPlaceWriter<F = OsFileSystem> {
    fs: F,
}

impl InPlaceWriter<OsFileSystem> {
    pub fn new() -> Self {
        Self::with_fs(OsFileSystem)
    }
}

impl Default for InPlaceWriter<OsFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> InPlaceWriter<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }
}

impl<F: FileSystem> Saver for InPlaceWriter<F> {
    fn save(&self, directory: &Path, filename: &str, payload: &[u8]) -> Result<(), SaveError> {
        let target = TargetPath::new(directory, filename)?;

        self.fs
            .create_dir_all(target.dir())
            .map_err(|e| SaveError::new(SaveErrorKind::Directory, target.dir(), e))?;

        let path = target.path();
        let mut handle = self
            .fs
            .open(&path, OpenMode::Truncate)
            .map_err(|e| SaveError::new(SaveErrorKind::Open, &path, e))?;
        debug!(path = %path.display(), "target truncated");

        let result = write_payload(&self.fs, &mut handle, payload)
            .map_err(|e| SaveError::new(SaveErrorKind::Write, &path, e))
            .and_then(|()| {
                self.fs
                    .sync(&mut handle)
                    .map_err(|e| SaveError::new(SaveErrorKind::Sync, &path, e))
            });
        self.fs.close(handle);
        result?;

        info!(path = %path.display(), bytes = payload.len(), "saved in place");
        Ok(())
    }

    fn strategy_name(&self) -> &'static str {
        "in_place"
    }
}
