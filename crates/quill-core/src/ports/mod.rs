//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! Writer は OS ファイル API・temp 名の生成・時刻をすべて trait 経由で使うので、
//! テストでは故障注入や決定的な名前に差し替えられます。

pub mod saver;
pub mod file_system;
pub mod name_generator;
pub mod clock;

// 主要な trait を再エクスポート
pub use self::saver::Saver;
pub use self::file_system::{FileSystem, OpenMode};
pub use self::name_generator::{RandomSuffix, TempNameGenerator, UlidSuffix};
pub use self::clock::{Clock, FixedClock, SystemClock};
