//! App - アプリケーション層
//!
//! このモジュールは、ports と impls を組み合わせて使う側の道具を提供します。
//!
//! # 主要コンポーネント
//! - **SaverBuilder**: 設定から Saver を構築（起動時検証）
//! - **WriterConfig**: JSON で読める設定
//! - **BlockingSaver**: async から blocking な Saver を呼ぶアダプタ
//! - **OrphanSweeper**: クラッシュで残った temp ファイルの回収

pub mod builder;
pub mod config;
pub mod async_saver;
pub mod sweeper;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, SaverBuilder};
pub use self::config::{ConfigError, Strategy, SuffixKind, WriterConfig};
pub use self::async_saver::{AsyncSaveError, AsyncSaver, BlockingSaver};
pub use self::sweeper::{OrphanSweeper, SweepError, SweepReport};
