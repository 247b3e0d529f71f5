//! WriterConfig - Saver の設定（JSON から読める）
//!
//! ```json
//! { "strategy": "atomic_replace", "temp_marker": ".tmp.", "suffix": "random" }
//! ```
//!
//! すべて省略可能。省略時は atomic_replace / `.tmp.` / random。

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_TEMP_MARKER;

/// 保存戦略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    InPlace,
    #[default]
    AtomicReplace,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::InPlace => f.write_str("in_place"),
            Strategy::AtomicReplace => f.write_str("atomic_replace"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_place" | "in-place" => Ok(Strategy::InPlace),
            "atomic_replace" | "atomic-replace" | "atomic" => Ok(Strategy::AtomicReplace),
            other => Err(format!("unknown strategy {other:?} (expected in_place or atomic_replace)")),
        }
    }
}

/// temp suffix の生成方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixKind {
    #[default]
    Random,
    Ulid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub strategy: Strategy,
    pub temp_marker: String,
    pub suffix: SuffixKind,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            temp_marker: DEFAULT_TEMP_MARKER.to_string(),
            suffix: SuffixKind::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl WriterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_object_gives_defaults() {
        let config = WriterConfig::from_json_str("{}").unwrap();
        assert_eq!(config, WriterConfig::default());
        assert_eq!(config.strategy, Strategy::AtomicReplace);
        assert_eq!(config.temp_marker, ".tmp.");
        assert_eq!(config.suffix, SuffixKind::Random);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let json = r#"{ "strategy": "in_place" }"#;
        let config = WriterConfig::from_json_str(json).unwrap();
        assert_eq!(config.strategy, Strategy::InPlace);
        assert_eq!(config.temp_marker, ".tmp.");
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let json = r#"{ "strategy": "yolo" }"#;
        assert!(WriterConfig::from_json_str(json).is_err());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.json");
        std::fs::write(&path, r#"{ "suffix": "ulid", "temp_marker": ".part." }"#).unwrap();

        let config = WriterConfig::from_json_file(&path).unwrap();
        assert_eq!(config.suffix, SuffixKind::Ulid);
        assert_eq!(config.temp_marker, ".part.");
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WriterConfig::from_json_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_config_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = WriterConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[rstest]
    #[case::snake("in_place", Strategy::InPlace)]
    #[case::kebab("in-place", Strategy::InPlace)]
    #[case::short("atomic", Strategy::AtomicReplace)]
    #[case::full("atomic_replace", Strategy::AtomicReplace)]
    fn parses_strategy_names(#[case] raw: &str, #[case] expected: Strategy) {
        assert_eq!(raw.parse::<Strategy>().unwrap(), expected);
    }

    #[test]
    fn strategy_display_matches_serde_name() {
        for strategy in [Strategy::InPlace, Strategy::AtomicReplace] {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{strategy}\""));
        }
    }
}
