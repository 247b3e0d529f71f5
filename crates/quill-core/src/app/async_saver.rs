//! AsyncSaver - async コンテキストから blocking な Saver を呼ぶ
//!
//! # 学習ポイント
//! - Async での blocking 処理の扱い（spawn_blocking）
//! - 'static にするため引数は所有型で受け取る
//!
//! retry もキャンセルも追加しない。save 自体の意味は同期版と同じ。

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::SaveError;
use crate::ports::Saver;

#[derive(Debug, thiserror::Error)]
pub enum AsyncSaveError {
    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("blocking save task failed: {0}")]
    Join(String),
}

#[async_trait]
pub trait AsyncSaver: Send + Sync {
    async fn save(
        &self,
        directory: PathBuf,
        filename: String,
        payload: Vec<u8>,
    ) -> Result<(), AsyncSaveError>;
}

/// BlockingSaver は Saver を tokio の blocking pool で実行する
pub struct BlockingSaver<S: ?Sized> {
    inner: Arc<S>,
}

impl<S: Saver + 'static> BlockingSaver<S> {
    pub fn new(saver: S) -> Self {
        Self {
            inner: Arc::new(saver),
        }
    }
}

impl<S: Saver + ?Sized + 'static> BlockingSaver<S> {
    pub fn from_arc(saver: Arc<S>) -> Self {
        Self { inner: saver }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: Saver + ?Sized + 'static> AsyncSaver for BlockingSaver<S> {
    async fn save(
        &self,
        directory: PathBuf,
        filename: String,
        payload: Vec<u8>,
    ) -> Result<(), AsyncSaveError> {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || inner.save(&directory, &filename, &payload))
            .await
            .map_err(|e| AsyncSaveError::Join(e.to_string()))??;
        Ok(())
    }
}
