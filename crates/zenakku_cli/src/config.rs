//! Runtime configuration resolved from flags and environment.
//!
//! # Invariants
//! - Flags win over environment variables; both are read by clap.
//! - Blank values are treated as unset.

use std::path::PathBuf;
use zenakku_core::default_log_level;

pub const DB_FILE_NAME: &str = "zenakku.sqlite3";

/// Effective settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    /// Logging stays disabled when `None`.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl CliConfig {
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        let db_path = db_path
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME));
        let log_dir = log_dir.filter(|path| !path.as_os_str().is_empty());
        let log_level = log_level
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| default_log_level().to_string());

        Self {
            db_path,
            log_dir,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliConfig, DB_FILE_NAME};
    use std::path::PathBuf;

    #[test]
    fn resolve_falls_back_to_temp_db_and_default_level() {
        let config = CliConfig::resolve(None, None, Some("  ".to_string()));

        assert_eq!(config.db_path, std::env::temp_dir().join(DB_FILE_NAME));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, zenakku_core::default_log_level());
    }

    #[test]
    fn resolve_keeps_explicit_values() {
        let config = CliConfig::resolve(
            Some(PathBuf::from("/data/items.db")),
            Some(PathBuf::from("/var/log/zenakku")),
            Some(" warn ".to_string()),
        );

        assert_eq!(config.db_path, PathBuf::from("/data/items.db"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/zenakku")));
        assert_eq!(config.log_level, "warn");
    }
}
