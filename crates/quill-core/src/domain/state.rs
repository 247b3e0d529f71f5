//! State - atomic save 1 回分の状態遷移
//!
//! ```text
//! Init -> DirEnsured -> TempCreated -> Written -> Synced -> Renamed
//!   |         |             |             |          |
//!  Dir       Open         Write*        Sync*     Rename*     (* = temp cleanup)
//! ```
//!
//! `Renamed` とすべてのエラー出口は終端。

use super::errors::SaveErrorKind;

/// SaveState は AtomicReplaceWriter が今どこまで進んだかを表す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Init,
    DirEnsured,
    TempCreated,
    Written,
    Synced,
    Renamed,
}

impl SaveState {
    /// 成功時の次の状態（Renamed は終端なのでそのまま）
    pub fn advance(self) -> Self {
        match self {
            SaveState::Init => SaveState::DirEnsured,
            SaveState::DirEnsured => SaveState::TempCreated,
            SaveState::TempCreated => SaveState::Written,
            SaveState::Written => SaveState::Synced,
            SaveState::Synced => SaveState::Renamed,
            SaveState::Renamed => SaveState::Renamed,
        }
    }

    /// この状態から次へ進む操作が失敗したときのエラー出口
    ///
    /// `Renamed` からはもう失敗しない。
    pub fn failure_kind(self) -> Option<SaveErrorKind> {
        match self {
            SaveState::Init => Some(SaveErrorKind::Directory),
            SaveState::DirEnsured => Some(SaveErrorKind::Open),
            SaveState::TempCreated => Some(SaveErrorKind::Write),
            SaveState::Written => Some(SaveErrorKind::Sync),
            SaveState::Synced => Some(SaveErrorKind::Rename),
            SaveState::Renamed => None,
        }
    }

    /// temp ファイルが存在していて、失敗時に削除が必要か
    pub fn owns_temp(self) -> bool {
        matches!(
            self,
            SaveState::TempCreated | SaveState::Written | SaveState::Synced
        )
    }

    pub fn is_terminal(self) -> bool {
        self == SaveState::Renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn happy_path_walks_every_state_once() {
        let mut state = SaveState::Init;
        let mut seen = vec![state];
        while !state.is_terminal() {
            state = state.advance();
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                SaveState::Init,
                SaveState::DirEnsured,
                SaveState::TempCreated,
                SaveState::Written,
                SaveState::Synced,
                SaveState::Renamed,
            ]
        );
    }

    #[rstest]
    #[case::dir(SaveState::Init, SaveErrorKind::Directory, false)]
    #[case::open(SaveState::DirEnsured, SaveErrorKind::Open, false)]
    #[case::write(SaveState::TempCreated, SaveErrorKind::Write, true)]
    #[case::sync(SaveState::Written, SaveErrorKind::Sync, true)]
    #[case::rename(SaveState::Synced, SaveErrorKind::Rename, true)]
    fn error_exits_match_state(
        #[case] state: SaveState,
        #[case] kind: SaveErrorKind,
        #[case] needs_cleanup: bool,
    ) {
        assert_eq!(state.failure_kind(), Some(kind));
        assert_eq!(state.owns_temp(), needs_cleanup);
    }

    #[test]
    fn renamed_is_terminal() {
        assert!(SaveState::Renamed.is_terminal());
        assert_eq!(SaveState::Renamed.advance(), SaveState::Renamed);
        assert_eq!(SaveState::Renamed.failure_kind(), None);
        assert!(!SaveState::Renamed.owns_temp());
    }
}
