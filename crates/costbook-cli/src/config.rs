//! Data directory resolution.
//!
//! Precedence (highest wins):
//! 1. `--data-dir` flag
//! 2. `COSTBOOK_DATA_DIR` env var
//! 3. `data_dir` in the user config (`costbook/config.toml` under the
//!    platform config directory)
//! 4. `./data` relative to the current directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "COSTBOOK_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("costbook/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the data directory from the flag, environment, and user config.
pub fn resolve_data_dir(flag: Option<&Path>) -> Result<PathBuf> {
    let env_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    let user = load_user_config()?;
    let dir = resolve_data_dir_inner(flag, env_dir, user.data_dir);
    tracing::debug!(dir = %dir.display(), "resolved data directory");
    Ok(dir)
}

fn resolve_data_dir_inner(
    flag: Option<&Path>,
    env_dir: Option<PathBuf>,
    user_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    if let Some(dir) = env_dir {
        return dir;
    }
    if let Some(dir) = user_dir {
        return dir;
    }
    PathBuf::from("data")
}

#[cfg(test)]
mod tests {
    use super::{resolve_data_dir_inner, UserConfig};
    use std::path::{Path, PathBuf};

    #[test]
    fn flag_wins_over_env_and_config() {
        let dir = resolve_data_dir_inner(
            Some(Path::new("/from/flag")),
            Some(PathBuf::from("/from/env")),
            Some(PathBuf::from("/from/config")),
        );
        assert_eq!(dir, PathBuf::from("/from/flag"));
    }

    #[test]
    fn env_wins_over_config() {
        let dir = resolve_data_dir_inner(
            None,
            Some(PathBuf::from("/from/env")),
            Some(PathBuf::from("/from/config")),
        );
        assert_eq!(dir, PathBuf::from("/from/env"));
    }

    #[test]
    fn default_is_local_data_directory() {
        assert_eq!(resolve_data_dir_inner(None, None, None), PathBuf::from("data"));
    }

    #[test]
    fn resolve_with_flag_returns_the_flag_path() {
        let dir = super::resolve_data_dir(Some(Path::new("/from/flag"))).unwrap();
        assert_eq!(dir, PathBuf::from("/from/flag"));
    }

    #[test]
    fn user_config_parses_data_dir() {
        let cfg: UserConfig = toml::from_str("data_dir = \"/srv/costbook\"").unwrap();
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/srv/costbook")));
        let empty: UserConfig = toml::from_str("").unwrap();
        assert!(empty.data_dir.is_none());
    }
}
