//! テスト用の FileSystem / TempNameGenerator
//!
//! FaultyFs は OsFileSystem に委譲しつつ、指定した段階で失敗を注入する。
//! rename の回数や rename 直前のフックで「reader から何が見えるか」を確認できる。
//! open / sync したパスも記録するので、何が fsync されたか（されなかったか）を検証できる。

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;

use crate::impls::OsFileSystem;
use crate::ports::{FileSystem, OpenMode, TempNameGenerator};

type RenameHook = Box<dyn Fn(&Path, &Path) + Send + Sync>;

/// どのパスを開いたハンドルかを覚えておく
pub(crate) struct FaultyHandle {
    file: File,
    path: PathBuf,
}

#[derive(Default)]
pub(crate) struct FaultyFs {
    inner: OsFileSystem,
    write_limit: Option<usize>,
    silent_short_write: bool,
    fail_sync: bool,
    fail_rename: bool,
    fail_remove: bool,
    before_rename: Option<RenameHook>,
    opened: Mutex<Vec<PathBuf>>,
    synced: Mutex<Vec<PathBuf>>,
    renames: AtomicUsize,
    removals: AtomicUsize,
}

impl FaultyFs {
    /// 先頭 `n` バイトだけ書いてから I/O エラーを返す
    pub(crate) fn fail_write_after(mut self, n: usize) -> Self {
        self.write_limit = Some(n);
        self
    }

    /// 先頭 `n` バイトだけ書いて、エラーにせず `Ok(n)` を返す
    pub(crate) fn short_write(mut self, n: usize) -> Self {
        self.write_limit = Some(n);
        self.silent_short_write = true;
        self
    }

    pub(crate) fn fail_sync(mut self) -> Self {
        self.fail_sync = true;
        self
    }

    pub(crate) fn fail_rename(mut self) -> Self {
        self.fail_rename = true;
        self
    }

    pub(crate) fn fail_remove(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    pub(crate) fn before_rename(
        mut self,
        hook: impl Fn(&Path, &Path) + Send + Sync + 'static,
    ) -> Self {
        self.before_rename = Some(Box::new(hook));
        self
    }

    pub(crate) fn opened(&self) -> usize {
        self.opened_paths().len()
    }

    pub(crate) fn opened_paths(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }

    pub(crate) fn syncs(&self) -> usize {
        self.synced_paths().len()
    }

    /// sync が成功したハンドルのパス（呼ばれた順）
    pub(crate) fn synced_paths(&self) -> Vec<PathBuf> {
        self.synced.lock().unwrap().clone()
    }

    pub(crate) fn renames(&self) -> usize {
        self.renames.load(Ordering::SeqCst)
    }

    pub(crate) fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

impl FileSystem for FaultyFs {
    type Handle = FaultyHandle;

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir_all(path)
    }

    fn open(&self, path: &Path, mode: OpenMode) -> io::Result<FaultyHandle> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        let file = self.inner.open(path, mode)?;
        Ok(FaultyHandle {
            file,
            path: path.to_path_buf(),
        })
    }

    fn write(&self, handle: &mut FaultyHandle, bytes: &[u8]) -> io::Result<usize> {
        match self.write_limit {
            Some(limit) if limit < bytes.len() => {
                let written = self.inner.write(&mut handle.file, &bytes[..limit])?;
                if self.silent_short_write {
                    Ok(written)
                } else {
                    Err(io::Error::other("injected write failure"))
                }
            }
            _ => self.inner.write(&mut handle.file, bytes),
        }
    }

    fn sync(&self, handle: &mut FaultyHandle) -> io::Result<()> {
        if self.fail_sync {
            return Err(io::Error::other("injected sync failure"));
        }
        self.inner.sync(&mut handle.file)?;
        self.synced.lock().unwrap().push(handle.path.clone());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.removals.fetch_add(1, Ordering::SeqCst);
        if self.fail_remove {
            return Err(io::Error::other("injected remove failure"));
        }
        self.inner.remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if let Some(hook) = &self.before_rename {
            hook(from, to);
        }
        if self.fail_rename {
            return Err(io::Error::other("injected rename failure"));
        }
        self.renames.fetch_add(1, Ordering::SeqCst);
        self.inner.rename(from, to)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.inner.read_dir(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.inner.modified(path)
    }
}

/// 常に同じ suffix を返す（衝突の再現用）
pub(crate) struct FixedSuffix(pub(crate) &'static str);

impl TempNameGenerator for FixedSuffix {
    fn suffix(&self) -> String {
        self.0.to_string()
    }

    fn matches(&self, suffix: &str) -> bool {
        suffix == self.0
    }
}

/// `dir` の中の `<file>.tmp.*` を列挙する
pub(crate) fn temp_files(dir: &Path, file: &str) -> Vec<PathBuf> {
    let prefix = format!("{file}.tmp.");
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
        .map(|e| e.path())
        .collect()
}
