//! OsFileSystem - `std::fs` による FileSystem 実装
//!
//! # 対応関係
//! - Truncate  -> `OpenOptions::write + create + truncate`
//! - CreateNew -> `OpenOptions::write + create_new`（exclusive create）
//! - sync      -> `File::sync_all`
//!
//! permission bits は OS の既定に任せる。

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::ports::{FileSystem, OpenMode};

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    type Handle = File;

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn open(&self, path: &Path, mode: OpenMode) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.write(true);
        match mode {
            OpenMode::Truncate => {
                options.create(true).truncate(true);
            }
            OpenMode::CreateNew => {
                options.create_new(true);
            }
        }
        options.open(path)
    }

    fn write(&self, handle: &mut File, bytes: &[u8]) -> io::Result<usize> {
        handle.write_all(bytes)?;
        Ok(bytes.len())
    }

    fn sync(&self, handle: &mut File) -> io::Result<()> {
        handle.sync_all()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }
}
