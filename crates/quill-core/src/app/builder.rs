//! SaverBuilder - 設定から Saver を組み立てる
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）：save を呼ぶ前に temp marker の不正を弾く

use crate::app::config::{Strategy, SuffixKind, WriterConfig};
use crate::impls::{AtomicReplaceWriter, InPlaceWriter, OsFileSystem};
use crate::ports::{RandomSuffix, Saver, SystemClock, TempNameGenerator, UlidSuffix};

/// SaverBuilder は `Box<dyn Saver>` を構築
///
/// # 使用例
/// ```ignore
/// let saver = SaverBuilder::new()
///     .strategy(Strategy::AtomicReplace)
///     .temp_marker(".tmp.")
///     .build()?;
/// saver.save(Path::new("./data"), "hello.txt", b"Hello, World!")?;
/// ```
pub struct SaverBuilder {
    config: WriterConfig,
    names: Option<Box<dyn TempNameGenerator>>,
}

/// BuildError は Saver 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("temp marker must not be empty")]
    EmptyTempMarker,

    #[error("temp marker {0:?} must not contain a path separator")]
    SeparatorInTempMarker(String),
}

impl SaverBuilder {
    pub fn new() -> Self {
        Self::from_config(WriterConfig::default())
    }

    pub fn from_config(config: WriterConfig) -> Self {
        Self {
            config,
            names: None,
        }
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn temp_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.temp_marker = marker.into();
        self
    }

    /// 設定の `suffix` より優先される
    pub fn name_generator(mut self, names: impl TempNameGenerator + 'static) -> Self {
        self.names = Some(Box::new(names));
        self
    }

    pub fn build(self) -> Result<Box<dyn Saver>, BuildError> {
        validate_marker(&self.config.temp_marker)?;

        let saver: Box<dyn Saver> = match self.config.strategy {
            Strategy::InPlace => Box::new(InPlaceWriter::new()),
            Strategy::AtomicReplace => {
                let names = match self.names {
                    Some(names) => names,
                    None => suffix_generator(self.config.suffix),
                };
                Box::new(
                    AtomicReplaceWriter::with_parts(OsFileSystem, names)
                        .with_marker(self.config.temp_marker),
                )
            }
        };
        Ok(saver)
    }
}

impl Default for SaverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 設定の suffix 種別に対応する生成器（sweeper も同じものを使う）
pub(crate) fn suffix_generator(kind: SuffixKind) -> Box<dyn TempNameGenerator> {
    match kind {
        SuffixKind::Random => Box::new(RandomSuffix),
        SuffixKind::Ulid => Box::new(UlidSuffix::new(SystemClock)),
    }
}

/// marker は temp 名の一部になるので、空やパス区切りは許さない
pub(crate) fn validate_marker(marker: &str) -> Result<(), BuildError> {
    if marker.is_empty() {
        return Err(BuildError::EmptyTempMarker);
    }
    if marker.contains(['/', '\\']) {
        return Err(BuildError::SeparatorInTempMarker(marker.to_string()));
    }
    Ok(())
}
