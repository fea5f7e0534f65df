use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Name of the per-repository config file, looked up in the root.
pub const REPO_CONFIG_FILE: &str = "readmes.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub tool: ToolConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Marker file that makes a subdirectory a candidate (default: "Cargo.toml")
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// File written in each candidate (default: "README.md")
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Executable looked up on PATH (default: "cargo")
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments passed to the program (default: ["readme"])
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Kill the tool after this many seconds. Absent means wait forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            timeout_secs: None,
        }
    }
}

impl ToolConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The command line as it would be typed in a shell, for logs.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn default_manifest() -> String {
    "Cargo.toml".to_string()
}

fn default_output() -> String {
    "README.md".to_string()
}

fn default_program() -> String {
    "cargo".to_string()
}

fn default_args() -> Vec<String> {
    vec!["readme".to_string()]
}

impl Config {
    /// Load configuration from an explicit path, or search the repository
    /// root and then the user config directory. Falls back to defaults.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        match Self::locate(explicit, root) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::load_from_path(&path)
            }
            None => {
                debug!("Using default config");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// The file `load` reads: the explicit path if given, else the first
    /// existing file in the search path. `None` means defaults.
    pub fn locate(explicit: Option<&Path>, root: &Path) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        Self::search_paths(root).into_iter().find(|p| p.is_file())
    }

    /// Locations searched when no explicit config is given, in order.
    pub fn search_paths(root: &Path) -> Vec<PathBuf> {
        let mut paths = vec![root.join(REPO_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("readmes").join("config.toml"));
        }
        paths
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_file_name("discovery.manifest", &self.discovery.manifest)?;
        check_file_name("discovery.output", &self.discovery.output)?;
        if self.tool.program.trim().is_empty() {
            bail!("tool.program must not be empty");
        }
        if self.tool.timeout_secs == Some(0) {
            bail!("tool.timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Manifest and output names are joined onto each candidate directory, so
/// they must name a file directly inside it.
fn check_file_name(key: &str, name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => bail!(
            "{} must be a plain file name, got {:?}",
            key,
            name
        ),
    }
}
