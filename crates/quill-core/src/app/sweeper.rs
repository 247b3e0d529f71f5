//! OrphanSweeper - 取り残された temp ファイルの回収
//!
//! save 中にプロセスが落ちると TempGuard の後始末は走らず、
//! `<filename><marker><suffix>` が残る。sweeper はそれを探して削除する。
//!
//! # 設計原則
//! - target 自身は決して消さない（プレフィックス一致 + suffix 非空のみ対象）
//! - suffix は名前生成器が作りうる形のものだけ（`TempNameGenerator::matches`）。
//!   `f` の sweep で `f.tmp.backup` や `f.tmp.backup.tmp.<n>` を消さない
//! - `min_age` より新しいものは別プロセスの save 途中かもしれないので残す
//! - 古さは mtime と Clock の差で判定（テストでは FixedClock）

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;
use tracing::{debug, warn};

use crate::app::builder::{BuildError, suffix_generator, validate_marker};
use crate::app::config::WriterConfig;
use crate::domain::{DEFAULT_TEMP_MARKER, TargetPath};
use crate::impls::OsFileSystem;
use crate::ports::{Clock, FileSystem, RandomSuffix, SystemClock, TempNameGenerator};

/// SweepError は sweep 全体を中断するエラー
///
/// 個々の temp ファイルの stat / 削除失敗は `SweepReport::failed` に入り、ここには来ない。
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("invalid file name {0:?}")]
    InvalidFileName(String),

    #[error("failed to list directory {}: {source}", .path.display())]
    ReadDir { path: PathBuf, source: io::Error },
}

/// 1 回の sweep の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub removed: Vec<PathBuf>,
    /// `min_age` に満たなかったもの
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

pub struct OrphanSweeper<F = OsFileSystem, C = SystemClock, G = RandomSuffix> {
    fs: F,
    clock: C,
    names: G,
    marker: String,
}

impl OrphanSweeper<OsFileSystem, SystemClock, RandomSuffix> {
    pub fn new() -> Self {
        Self::with_parts(OsFileSystem, SystemClock)
    }
}

impl Default for OrphanSweeper<OsFileSystem, SystemClock, RandomSuffix> {
    fn default() -> Self {
        Self::new()
    }
}

impl OrphanSweeper<OsFileSystem, SystemClock, Box<dyn TempNameGenerator>> {
    /// save 側と同じ marker / suffix 種別で sweep する
    pub fn from_config(config: &WriterConfig) -> Result<Self, BuildError> {
        OrphanSweeper::with_parts(OsFileSystem, SystemClock)
            .with_names(suffix_generator(config.suffix))
            .with_marker(config.temp_marker.clone())
    }
}

impl<F: FileSystem, C: Clock> OrphanSweeper<F, C, RandomSuffix> {
    pub fn with_parts(fs: F, clock: C) -> Self {
        Self {
            fs,
            clock,
            names: RandomSuffix,
            marker: DEFAULT_TEMP_MARKER.to_string(),
        }
    }
}

impl<F: FileSystem, C: Clock, G: TempNameGenerator> OrphanSweeper<F, C, G> {
    /// 書き込み側と同じ名前生成器を渡す（suffix の形の判定に使う）
    pub fn with_names<H: TempNameGenerator>(self, names: H) -> OrphanSweeper<F, C, H> {
        OrphanSweeper {
            fs: self.fs,
            clock: self.clock,
            names,
            marker: self.marker,
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Result<Self, BuildError> {
        let marker = marker.into();
        validate_marker(&marker)?;
        self.marker = marker;
        Ok(self)
    }

    /// `directory` 内の `filename` 用 temp ファイルのうち、`min_age` 以上古いものを削除
    ///
    /// ディレクトリが存在しなければ空の結果を返す。
    pub fn sweep(
        &self,
        directory: &Path,
        filename: &str,
        min_age: Duration,
    ) -> Result<SweepReport, SweepError> {
        let target = TargetPath::new(directory, filename)
            .map_err(|_| SweepError::InvalidFileName(filename.to_string()))?;
        let prefix = target.temp_prefix(&self.marker);
        let mut report = SweepReport::default();

        let entries = match self.fs.read_dir(target.dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(report),
            Err(e) => {
                return Err(SweepError::ReadDir {
                    path: target.dir().to_path_buf(),
                    source: e,
                });
            }
        };

        let now: SystemTime = self.clock.now().into();
        for path in entries {
            let is_orphan = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix(prefix.as_str()))
                .is_some_and(|suffix| self.is_temp_suffix(suffix));
            if !is_orphan {
                continue;
            }

            let modified = match self.fs.modified(&path) {
                Ok(modified) => modified,
                // 持ち主がその間に rename / 削除した
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!(temp = %path.display(), error = %e, "cannot stat temp file");
                    report.failed.push(path);
                    continue;
                }
            };
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age < min_age {
                debug!(temp = %path.display(), ?age, "temp file too young to sweep");
                report.skipped.push(path);
                continue;
            }

            match self.fs.remove_file(&path) {
                Ok(()) => {
                    warn!(temp = %path.display(), ?age, "removed orphaned temp file");
                    report.removed.push(path);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(temp = %path.display(), error = %e, "failed to remove orphaned temp file");
                    report.failed.push(path);
                }
            }
        }

        report.removed.sort();
        report.skipped.sort();
        report.failed.sort();
        Ok(report)
    }

    fn is_temp_suffix(&self, suffix: &str) -> bool {
        !suffix.is_empty()
            && !suffix.contains('.')
            && !suffix.contains(self.marker.as_str())
            && self.names.matches(suffix)
    }
}
