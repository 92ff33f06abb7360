use anyhow::{Context, Result};
use blobb::graph::DEFAULT_LOCK_STRIPES;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the CLI configuration, relative to the project root.
pub const CONFIG_DIR: &str = ".blobb";
const CONFIG_FILE: &str = "config.toml";

/// Resolved configuration for a CLI invocation.
pub struct ProjectContext {
    /// Path the configuration was read from, if any
    pub config_path: Option<PathBuf>,
    /// Directory relative paths in the configuration resolve against
    pub base_dir: PathBuf,
    /// Loaded configuration (defaults when no file was found)
    pub config: BlobbConfig,
}

/// Configuration stored in .blobb/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlobbConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub redis: RedisSettings,
    #[serde(default)]
    pub fixture: FixtureSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_lock_stripes")]
    pub lock_stripes: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            lock_stripes: default_lock_stripes(),
        }
    }
}

fn default_lock_stripes() -> usize {
    DEFAULT_LOCK_STRIPES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_service")]
    pub service: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            prefix: default_prefix(),
            service: default_service(),
        }
    }
}

fn default_redis_url() -> String {
    "${REDIS_URL}".to_string()
}

fn default_prefix() -> String {
    "blobb".to_string()
}

fn default_service() -> String {
    "social".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSettings {
    /// Fixture loaded into the memory backend on start
    #[serde(default)]
    pub path: Option<String>,
}

impl ProjectContext {
    /// Load the explicit config file, or search from the current directory upwards
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let current_dir = std::env::current_dir().context("Failed to get current directory")?;
                Self::find_from(&current_dir)
            }
        }
    }

    /// Find `.blobb/config.toml` in `start` or its ancestors, falling back to defaults
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_DIR).join(CONFIG_FILE);
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
            if !current.pop() {
                return Ok(Self {
                    config_path: None,
                    base_dir: start.to_path_buf(),
                    config: BlobbConfig::default(),
                });
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: BlobbConfig =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

        // Paths in .blobb/config.toml are relative to the directory containing .blobb
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let base_dir = if parent.file_name().is_some_and(|name| name == CONFIG_DIR) {
            parent.parent().unwrap_or(parent).to_path_buf()
        } else {
            parent.to_path_buf()
        };

        Ok(Self {
            config_path: Some(path.to_path_buf()),
            base_dir,
            config,
        })
    }

    /// Get the Redis URL, expanding environment variables
    pub fn redis_url(&self) -> Result<String> {
        let url = self.config.redis.url.as_str();
        if url.starts_with("${") && url.ends_with('}') {
            let var_name = &url[2..url.len() - 1];
            std::env::var(var_name).with_context(|| format!("Environment variable {var_name} not set"))
        } else {
            Ok(url.to_string())
        }
    }

    pub fn fixture_path(&self) -> Option<PathBuf> {
        self.config.fixture.path.as_ref().map(|path| self.base_dir.join(path))
    }
}
