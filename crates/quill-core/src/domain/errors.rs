//! Errors - save 操作のエラー型と分類
//!
//! # 分類
//! - Directory: 親ディレクトリを作成・確認できない
//! - Open: target / temp ファイルを開けない（exclusive create 違反を含む）
//! - Write: payload の書き込み失敗、または short write
//! - Sync: durability barrier（fsync）失敗
//! - Rename: 最後の atomic replace 失敗
//!
//! どのエラーも「どのファイルで失敗したか」を path として持つ。
//! cleanup の失敗は `suppressed` に載せるだけで、主エラーの kind は変えない。

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// SaveErrorKind は save が止まった段階を表す
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveErrorKind {
    Directory,
    Open,
    Write,
    Sync,
    Rename,
}

impl fmt::Display for SaveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaveErrorKind::Directory => "directory: path not created",
            SaveErrorKind::Open => "open: file not opened",
            SaveErrorKind::Write => "write: bytes not written",
            SaveErrorKind::Sync => "sync: data not persisted",
            SaveErrorKind::Rename => "rename: target not replaced",
        };
        f.write_str(s)
    }
}

/// SaveError は 1 回の save 呼び出しの失敗
///
/// `source` が主原因。`suppressed` は temp ファイル削除など後始末の失敗で、
/// 報告はするが主原因を上書きしない。
#[derive(Debug, thiserror::Error)]
#[error("{kind} ({}): {source}", .path.display())]
pub struct SaveError {
    kind: SaveErrorKind,
    path: PathBuf,
    #[source]
    source: io::Error,
    suppressed: Option<io::Error>,
}

impl SaveError {
    pub fn new(kind: SaveErrorKind, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            kind,
            path: path.into(),
            source,
            suppressed: None,
        }
    }

    /// Attach a secondary (cleanup) failure without touching the primary one.
    pub fn with_suppressed(mut self, suppressed: Option<io::Error>) -> Self {
        self.suppressed = suppressed;
        self
    }

    pub fn kind(&self) -> SaveErrorKind {
        self.kind
    }

    /// The file the failing step was operating on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn io_error(&self) -> &io::Error {
        &self.source
    }

    pub fn suppressed(&self) -> Option<&io::Error> {
        self.suppressed.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_kind_and_path() {
        let err = SaveError::new(
            SaveErrorKind::Sync,
            "/data/hello.txt.tmp.42",
            io::Error::other("disk on fire"),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("sync: data not persisted"));
        assert!(msg.contains("/data/hello.txt.tmp.42"));
        assert!(msg.contains("disk on fire"));
    }

    #[test]
    fn suppressed_error_keeps_primary_kind() {
        let err = SaveError::new(SaveErrorKind::Write, "a", io::Error::other("primary"))
            .with_suppressed(Some(io::Error::other("cleanup")));

        assert_eq!(err.kind(), SaveErrorKind::Write);
        assert_eq!(err.io_error().to_string(), "primary");
        assert_eq!(err.suppressed().unwrap().to_string(), "cleanup");
    }

    #[test]
    fn source_chain_points_at_io_error() {
        use std::error::Error;

        let err = SaveError::new(SaveErrorKind::Open, "a", io::Error::other("nope"));
        assert_eq!(err.source().unwrap().to_string(), "nope");
    }
}
