//! TargetPath - 保存先の論理 ID（directory, filename）
//!
//! 元データの場所と、その隣に作る temp ファイルの名前規則をここに集める。
//! 文字列連結（`dir + file`）ではなく `Path::join` で組み立てる。

use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::errors::{SaveError, SaveErrorKind};

/// temp ファイル名の既定の区切り（`hello.txt.tmp.<suffix>`）
pub const DEFAULT_TEMP_MARKER: &str = ".tmp.";

/// TargetPath は保存先 = (directory, filename)
///
/// # 不変条件
/// - `file_name` は単一の通常コンポーネント（空でない・区切り文字なし・`.`/`..` でない）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPath {
    dir: PathBuf,
    file_name: String,
}

impl TargetPath {
    /// filename を検証して TargetPath を作る
    ///
    /// 不正な filename は `Open` エラー（InvalidInput）になる。
    /// ファイルシステムには一切触らない。
    pub fn new(dir: impl Into<PathBuf>, file_name: &str) -> Result<Self, SaveError> {
        let dir = dir.into();
        if !is_plain_file_name(file_name) {
            return Err(SaveError::new(
                SaveErrorKind::Open,
                dir.join(file_name),
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid file name {file_name:?}"),
                ),
            ));
        }
        Ok(Self {
            dir,
            file_name: file_name.to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// `directory/filename`
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// temp ファイル名の共通プレフィックス（`filename + marker`）
    pub fn temp_prefix(&self, marker: &str) -> String {
        format!("{}{}", self.file_name, marker)
    }

    /// 同じディレクトリ内の temp ファイルパス
    pub fn temp_path(&self, marker: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}", self.temp_prefix(marker), suffix))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(first)), None) => first == OsStr::new(name),
        _ => false,
    }
}
