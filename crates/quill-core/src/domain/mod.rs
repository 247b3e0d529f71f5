//! Domain model (target path, save state machine, errors).

pub mod target;
pub mod state;
pub mod errors;

pub use self::target::{DEFAULT_TEMP_MARKER, TargetPath};
pub use self::state::SaveState;
pub use self::errors::{SaveError, SaveErrorKind};
