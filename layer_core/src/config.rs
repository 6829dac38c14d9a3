use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

pub const STRICT_VERSION_CHECK_VAR: &str = "GL_CONTEXT_FIX_STRICT_VERSION_CHECK";
pub const LOG_LEVEL_VAR: &str = "GL_CONTEXT_FIX_LOG";
pub const LOG_FILE_VAR: &str = "GL_CONTEXT_FIX_LOG_FILE";

/// Settings that can be changed without rebuilding the layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConfig {
    /// Reject loaders whose version ranges do not contain ours instead of
    /// echoing whatever maximum the loader advertises.
    pub strict_version_check: bool,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            strict_version_check: false,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl LayerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let strict_version_check = lookup(STRICT_VERSION_CHECK_VAR)
            .map(|value| parse_flag(&value))
            .unwrap_or(default.strict_version_check);

        let log_level = lookup(LOG_LEVEL_VAR)
            .and_then(|value| LevelFilter::from_str(value.trim()).ok())
            .unwrap_or(default.log_level);

        let log_file = lookup(LOG_FILE_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Self {
            strict_version_check,
            log_level,
            log_file,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}
