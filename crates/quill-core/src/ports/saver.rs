//! Saver port - 「bytes を論理パスに保存する」共通の契約
//!
//! InPlaceWriter と AtomicReplaceWriter はこの trait を通してだけ合成される。

use std::path::Path;

use crate::domain::SaveError;

/// Saver は payload 全体を `directory/filename` に保存する
///
/// # 契約
/// - 同期・blocking（キャンセル・タイムアウト・リトライなし）
/// - 失敗はすべて呼び出し元に返す
pub trait Saver: Send + Sync {
    fn save(&self, directory: &Path, filename: &str, payload: &[u8]) -> Result<(), SaveError>;

    /// ログや CLI 出力に使う戦略名
    fn strategy_name(&self) -> &'static str;
}

impl<S: Saver + ?Sized> Saver for Box<S> {
    fn save(&self, directory: &Path, filename: &str, payload: &[u8]) -> Result<(), SaveError> {
        (**self).save(directory, filename, payload)
    }

    fn strategy_name(&self) -> &'static str {
        (**self).strategy_name()
    }
}

impl<S: Saver + ?Sized> Saver for std::sync::Arc<S> {
    fn save(&self, directory: &Path, filename: &str, payload: &[u8]) -> Result<(), SaveError> {
        (**self).save(directory, filename, payload)
    }

    fn strategy_name(&self) -> &'static str {
        (**self).strategy_name()
    }
}
