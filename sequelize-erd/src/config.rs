//! Configuration stored in `sequelize-erd.toml`.

use serde::{Deserialize, Serialize};

/// File name looked up at the project root.
pub const CONFIG_FILE: &str = "sequelize-erd.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErdConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which files are read as model sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub recursive: bool,
    /// Allow-list of file names. Empty means every discovered file.
    #[serde(default)]
    pub only: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            extensions: default_extensions(),
            recursive: false,
            only: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Whether `file_name` passes the allow-list.
    pub fn allows(&self, file_name: &str) -> bool {
        self.only.is_empty() || self.only.iter().any(|name| name == file_name)
    }

    /// Whether `extension` is one of the configured source extensions.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_file")]
    pub file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
        }
    }
}

fn default_models_dir() -> String {
    "src/models".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["ts".to_string(), "js".to_string()]
}

fn default_output_file() -> String {
    "mermaid-diagram.mmd".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ErdConfig::default();
        assert_eq!(config.scan.models_dir, "src/models");
        assert_eq!(config.scan.extensions, ["ts", "js"]);
        assert!(!config.scan.recursive);
        assert!(config.scan.only.is_empty());
        assert_eq!(config.output.file, "mermaid-diagram.mmd");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ErdConfig = toml::from_str("[scan]\nrecursive = true\n").unwrap();
        assert!(config.scan.recursive);
        assert_eq!(config.scan.models_dir, "src/models");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: ErdConfig = toml::from_str("").unwrap();
        assert_eq!(config, ErdConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string_pretty(&ErdConfig::default()).unwrap();
        assert!(toml_str.contains("models_dir"));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_allow_list() {
        let mut scan = ScanConfig::default();
        assert!(scan.allows("user.ts"));

        scan.only = vec!["user.ts".to_string()];
        assert!(scan.allows("user.ts"));
        assert!(!scan.allows("post.ts"));
    }

    #[test]
    fn test_extension_matching() {
        let scan = ScanConfig {
            extensions: vec![".mjs".to_string(), "TS".to_string()],
            ..ScanConfig::default()
        };
        assert!(scan.accepts_extension("mjs"));
        assert!(scan.accepts_extension("ts"));
        assert!(!scan.accepts_extension("js"));
    }
}
