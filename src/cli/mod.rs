pub mod check;
pub mod config_check;
pub mod generate;
pub mod list;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::discover;

/// Root directory and effective configuration shared by every subcommand.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    /// File the config was read from; `None` when defaults are in use.
    pub config_source: Option<PathBuf>,
}

impl Workspace {
    pub fn load(root: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let root = match root {
            Some(path) => discover::resolve_root(path)?,
            None => discover::default_root()?,
        };
        debug!("Root: {}", root.display());

        let config = Config::load(config_path, &root)?;
        let config_source = Config::locate(config_path, &root);
        Ok(Self {
            root,
            config,
            config_source,
        })
    }

    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_timeout(&mut self, timeout_override: Option<u64>) -> Result<()> {
        if let Some(timeout) = timeout_override {
            info!("CLI override: timeout = {}s", timeout);
            self.config.tool.timeout_secs = Some(timeout);
            self.config.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_explicit_root() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::load(Some(tmp.path()), None).unwrap();
        assert_eq!(ws.root, tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_load_records_explicit_config_source() {
        let tmp = TempDir::new().unwrap();
        let custom = tmp.path().join("custom.toml");
        std::fs::write(&custom, "[tool]\nprogram = \"sh\"\n").unwrap();

        let ws = Workspace::load(Some(tmp.path()), Some(&custom)).unwrap();
        assert_eq!(ws.config_source, Some(custom));
        assert_eq!(ws.config.tool.program, "sh");
    }

    #[test]
    fn test_apply_timeout() {
        let tmp = TempDir::new().unwrap();
        let mut ws = Workspace::load(Some(tmp.path()), None).unwrap();
        ws.apply_timeout(Some(42)).unwrap();
        assert_eq!(ws.config.tool.timeout_secs, Some(42));

        assert!(ws.apply_timeout(Some(0)).is_err());
    }
}
