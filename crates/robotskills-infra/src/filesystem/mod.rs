//! Data directory layout for RobotSkills.
//!
//! Everything the server owns lives under one directory:
//! `config.toml` and `robotskills.db`.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ROBOTSKILLS_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `ROBOTSKILLS_DATA_DIR` environment variable
/// 2. `~/.robotskills`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".robotskills");
    }

    // Last resort: current directory
    PathBuf::from(".robotskills")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_data_dir_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("robotskills");
        ensure_data_dir(&nested).await.unwrap();
        assert!(tokio::fs::try_exists(&nested).await.unwrap());
        // Idempotent
        ensure_data_dir(&nested).await.unwrap();
    }

    #[test]
    fn test_resolve_data_dir_is_absolute_or_named() {
        let dir = resolve_data_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
