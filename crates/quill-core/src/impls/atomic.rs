//! AtomicReplaceWriter - temp に書いてから rename で置き換える
//!
//! 旧ファイルには一切触らない。
//! 1. 途中で失敗しても旧ファイルはそのまま残る
//! 2. 並行 reader は書きかけのデータを見ない（旧か新のどちらか全体を見る）
//!
//! # Atomicity
//! - rename は並行 reader に対して atomic（開けるのは旧 inode か新 inode のどちらか）
//! - rename は電源断に対しては atomic でも durable でもない。親ディレクトリを
//!   fsync しないので、rename 直後の電源断でディレクトリエントリが戻ることがある
//!
//! # 学習ポイント
//! - RAII ガード（TempGuard）で「失敗したら temp を消す」を全ての出口で保証
//! - cleanup の失敗は主エラーを上書きせず suppressed として添える

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{OsFileSystem, write_payload};
use crate::domain::{DEFAULT_TEMP_MARKER, SaveError, SaveErrorKind, SaveState, TargetPath};
use crate::ports::{FileSystem, OpenMode, RandomSuffix, Saver, TempNameGenerator};

pub struct AtomicReplaceWriter<F = OsFileSystem, G = RandomSuffix> {
    fs: F,
    names: G,
    marker: String,
}

impl AtomicReplaceWriter<OsFileSystem, RandomSuffix> {
    pub fn new() -> Self {
        Self::with_parts(OsFileSystem, RandomSuffix)
    }
}

impl Default for AtomicReplaceWriter<OsFileSystem, RandomSuffix> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem, G: TempNameGenerator> AtomicReplaceWriter<F, G> {
    pub fn with_parts(fs: F, names: G) -> Self {
        Self {
            fs,
            names,
            marker: DEFAULT_TEMP_MARKER.to_string(),
        }
    }

    /// temp 名の区切りを変える。検証は `SaverBuilder` 側で行う。
    pub(crate) fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }
}

impl<F: FileSystem, G: TempNameGenerator> Saver for AtomicReplaceWriter<F, G> {
    fn save(&self, directory: &Path, filename: &str, payload: &[u8]) -> Result<(), SaveError> {
        let target = TargetPath::new(directory, filename)?;
        let target_path = target.path();
        let mut state = SaveState::Init;

        self.fs
            .create_dir_all(target.dir())
            .map_err(|e| failed(state, target.dir(), e))?;
        state = state.advance();

        let temp_path = target.temp_path(&self.marker, &self.names.suffix());
        let mut temp = TempGuard::create(&self.fs, temp_path.clone())
            .map_err(|e| failed(state, &temp_path, e))?;
        state = state.advance();
        debug!(?state, temp = %temp_path.display(), "temp file created");

        if let Err(e) = temp.write(payload) {
            return Err(abort(state, temp, &temp_path, e));
        }
        state = state.advance();

        if let Err(e) = temp.sync() {
            return Err(abort(state, temp, &temp_path, e));
        }
        state = state.advance();
        debug!(?state, temp = %temp_path.display(), "temp file synced");

        if let Err(e) = temp.persist(&target_path) {
            return Err(abort(state, temp, &target_path, e));
        }
        state = state.advance();
        debug_assert!(state.is_terminal());

        info!(path = %target_path.display(), bytes = payload.len(), "saved atomically");
        Ok(())
    }

    fn strategy_name(&self) -> &'static str {
        "atomic_replace"
    }
}

/// 今の状態に対応するエラー出口で SaveError を作る
fn failed(state: SaveState, path: &Path, source: io::Error) -> SaveError {
    // Renamed からは失敗しないので fallback には来ない
    let kind = state.failure_kind().unwrap_or(SaveErrorKind::Rename);
    debug!(?state, %kind, path = %path.display(), "save failed");
    SaveError::new(kind, path, source)
}

/// temp を作った後の失敗。temp を消してから主エラーを返す。
fn abort<F: FileSystem>(
    state: SaveState,
    temp: TempGuard<'_, F>,
    path: &Path,
    source: io::Error,
) -> SaveError {
    debug_assert!(state.owns_temp());
    let suppressed = temp.discard();
    failed(state, path, source).with_suppressed(suppressed)
}

/// TempGuard は temp ファイルのハンドルと後始末の責任を持つ
///
/// - `persist` が成功するまでは armed（Drop で削除される）
/// - `discard` は削除の失敗を呼び出し元に返す
/// - target は決して削除しない
struct TempGuard<'a, F: FileSystem> {
    fs: &'a F,
    path: PathBuf,
    handle: Option<F::Handle>,
    armed: bool,
}

impl<'a, F: FileSystem> TempGuard<'a, F> {
    /// exclusive create。同名ファイルが既にあれば失敗し、それには触らない。
    fn create(fs: &'a F, path: PathBuf) -> io::Result<Self> {
        let handle = fs.open(&path, OpenMode::CreateNew)?;
        Ok(Self {
            fs,
            path,
            handle: Some(handle),
            armed: true,
        })
    }

    fn handle(&mut self) -> io::Result<&mut F::Handle> {
        self.handle
            .as_mut()
            .ok_or_else(|| io::Error::other("temp file already closed"))
    }

    fn write(&mut self, payload: &[u8]) -> io::Result<()> {
        let fs = self.fs;
        write_payload(fs, self.handle()?, payload)
    }

    fn sync(&mut self) -> io::Result<()> {
        let fs = self.fs;
        fs.sync(self.handle()?)
    }

    fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.fs.close(handle);
        }
    }

    /// handle を閉じて target に rename する。成功したら disarm。
    fn persist(&mut self, to: &Path) -> io::Result<()> {
        self.close();
        self.fs.rename(&self.path, to)?;
        self.armed = false;
        Ok(())
    }

    fn discard(mut self) -> Option<io::Error> {
        self.armed = false;
        self.remove()
    }

    fn remove(&mut self) -> Option<io::Error> {
        self.close();
        match self.fs.remove_file(&self.path) {
            Ok(()) => {
                debug!(temp = %self.path.display(), "temp file removed");
                None
            }
            Err(e) => {
                warn!(temp = %self.path.display(), error = %e, "failed to remove temp file");
                Some(e)
            }
        }
    }
}

impl<F: FileSystem> Drop for TempGuard<'_, F> {
    fn drop(&mut self) {
        if self.armed {
            self.armed = false;
            let _ = self.remove();
        }
    }
}
