use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use sequelize_erd::{CONFIG_FILE, ErdConfig};

/// Marker for the root of a Node project.
const PACKAGE_MANIFEST: &str = "package.json";

/// Project context for sequelize-erd operations
pub struct ProjectContext {
    /// Root directory of the project (where package.json or the config file is)
    pub project_root: PathBuf,
    /// Path to sequelize-erd.toml
    pub config_path: PathBuf,
    /// Loaded configuration, defaults when no config file exists
    pub config: ErdConfig,
}

impl ProjectContext {
    /// Find and load project context from current directory or ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find project context starting from the given directory
    pub fn find_from(start: &Path) -> Result<Self> {
        let project_root = Self::find_project_root(start);
        Self::from_root(project_root)
    }

    /// Create context from a known project root
    pub fn from_root(project_root: PathBuf) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            toml::from_str::<ErdConfig>(&content).with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            ErdConfig::default()
        };

        Ok(Self {
            project_root,
            config_path,
            config,
        })
    }

    /// Walk up until a directory holds the config file or a package.json.
    /// Falls back to `start` itself.
    fn find_project_root(start: &Path) -> PathBuf {
        start
            .ancestors()
            .find(|dir| dir.join(CONFIG_FILE).exists() || dir.join(PACKAGE_MANIFEST).exists())
            .unwrap_or(start)
            .to_path_buf()
    }

    /// Check if a config file has been written for this project
    pub fn is_initialized(&self) -> bool {
        self.config_path.exists()
    }

    /// Resolve a path against the project root unless it is absolute.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Models directory, from the override or the config.
    pub fn models_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        match override_dir {
            Some(dir) => self.resolve(dir),
            None => self.resolve(&self.config.scan.models_dir),
        }
    }

    /// Diagram output file, from the override or the config.
    pub fn output_file(&self, override_file: Option<&Path>) -> PathBuf {
        match override_file {
            Some(file) => self.resolve(file),
            None => self.resolve(&self.config.output.file),
        }
    }
}
