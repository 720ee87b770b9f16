//! Pipeline configuration. Deserializable so callers can load it from a
//! JSON/TOML fragment, but every field has a usable default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Platform id strings in canonical `<platform>:<id>` form.
    pub platform_ids: Vec<String>,
    /// Display names, matched casefolded.
    pub display_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub reports_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// IANA timezone name used to compute the play-date directory.
    pub timezone: Option<String>,
}

/// Which parser adapter variant to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserMode {
    /// Full network decode, falling back to header-only on recoverable
    /// failure.
    #[default]
    Auto,
    /// Header-only analysis, skipping the network stream entirely.
    HeaderOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestLimits {
    pub max_bytes: u64,
    pub min_bytes: u64,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_REPLAY_BYTES,
            min_bytes: MIN_REPLAY_BYTES,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub identity: IdentityConfig,
    pub paths: PathsConfig,
    pub preferences: Preferences,
    /// Display names whose replays are refused outright.
    pub excluded_names: Vec<String>,
    pub parser: ParserMode,
    pub limits: IngestLimits,
}
