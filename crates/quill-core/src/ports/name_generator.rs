//! TempNameGenerator port - temp ファイル名 suffix 生成の抽象化
//!
//! temp ファイルは `filename + marker + suffix` という名前で作る。
//! suffix の衝突は exclusive create で検出されるので、ここは「まず衝突しない」
//! ことだけを保証すればよい。テストでは固定 suffix を注入して衝突を再現する。
//!
//! # 実装
//! - **RandomSuffix**: プロセス乱数の u64（既定）
//! - **UlidSuffix**: 時刻順に並ぶ ULID（sweeper で古さが読める）
//!
//! `matches` は「この生成器が作りうる suffix か」を判定する。sweeper は
//! これで `f.tmp.backup` のような別ファイルを temp と取り違えないようにする。

use crate::ports::Clock;
use ulid::Ulid;

/// TempNameGenerator は temp ファイル名の suffix を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（並行 save から共有される）
pub trait TempNameGenerator: Send + Sync {
    fn suffix(&self) -> String;

    /// `suffix` がこの生成器の出力の形をしているか
    fn matches(&self, suffix: &str) -> bool;
}

impl<G: TempNameGenerator + ?Sized> TempNameGenerator for Box<G> {
    fn suffix(&self) -> String {
        (**self).suffix()
    }

    fn matches(&self, suffix: &str) -> bool {
        (**self).matches(suffix)
    }
}

/// 64-bit 乱数の 10 進表記を suffix にする
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSuffix;

impl TempNameGenerator for RandomSuffix {
    fn suffix(&self) -> String {
        rand::random::<u64>().to_string()
    }

    fn matches(&self, suffix: &str) -> bool {
        suffix.bytes().all(|b| b.is_ascii_digit()) && suffix.parse::<u64>().is_ok()
    }
}

/// UlidSuffix は ULID ベースの suffix 生成器
///
/// Clock を使って timestamp 部分を決めるので、FixedClock を渡せば
/// 時刻部分が決定的になる（ランダム部分は毎回変わる）。
pub struct UlidSuffix<C> {
    clock: C,
}

impl<C: Clock> UlidSuffix<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> TempNameGenerator for UlidSuffix<C> {
    fn suffix(&self) -> String {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random()).to_string()
    }

    fn matches(&self, suffix: &str) -> bool {
        suffix.parse::<Ulid>().is_ok()
    }
}
