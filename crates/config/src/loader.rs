use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::FanpostConfig;

/// Standard config file name.
const CONFIG_FILENAME: &str = "fanpost.toml";

/// Load config from an explicit path.
pub fn load_config(path: &Path) -> anyhow::Result<FanpostConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./fanpost.toml` (project-local)
/// 2. `~/.config/fanpost/fanpost.toml` (user-global)
///
/// Returns `FanpostConfig::default()` if no config file is found or the file
/// cannot be parsed.
pub fn discover_and_load() -> FanpostConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    FanpostConfig::default()
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "fanpost") {
        let global = dirs.config_dir().join(CONFIG_FILENAME);
        if global.exists() {
            return Some(global);
        }
    }

    None
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_config_reads_toml() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[server]\nport = 9999").unwrap();
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.server.port, 9999);
    }

    #[test]
    fn load_config_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[server").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn load_config_rejects_missing_file() {
        assert!(load_config(Path::new("/nonexistent/fanpost.toml")).is_err());
    }
}
