use crate::core::models::{BuildMode, EntrySpec, ProjectLayout};
use crate::utils::{KumiError, Logger, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file.
pub const CONFIG_FILE_NAME: &str = "kumi.config.json";

/// Configuration file format (kumi.config.json)
///
/// Every field is optional; anything absent falls back to the conventional
/// layout. Values the CLI can also set are overridden by flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KumiConfig {
    /// Build mode ("development" or "production")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Source directory relative to the project root (default: "src")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<String>,

    /// Output directory relative to the project root (default: "dist")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,

    /// HTML template relative to the source dir (default: "./index.html")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Favicon relative to the source dir (default: "assets/favicon.ico")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,

    /// Dev server port (default: 3000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Entry points (default: main + analytics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<BTreeMap<String, EntrySpec>>,

    /// Import aliases, each relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<BTreeMap<String, String>>,

    /// Resolvable extensions (default: [".js", ".json", ".jsx"])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

impl Default for KumiConfig {
    fn default() -> Self {
        Self {
            mode: None,
            source_dir: Some("src".to_string()),
            out_dir: Some("dist".to_string()),
            template: Some("./index.html".to_string()),
            favicon: Some("assets/favicon.ico".to_string()),
            port: Some(3000),
            entry: None,
            alias: None,
            extensions: None,
        }
    }
}

/// Config loader that supports config files with CLI override
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file if it exists
    /// Searches for kumi.config.json in the project root
    pub fn load_from_file(root: &Path) -> Result<Option<KumiConfig>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            Logger::no_config_file();
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: KumiConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Logger::config_file_loaded(&config_path.to_string_lossy());
        Ok(Some(config))
    }

    /// Merge file config with CLI arguments (CLI takes precedence)
    ///
    /// `mode_hint` carries a mode the caller already resolved from a flag or
    /// the environment; when it is None the file's mode applies, and when
    /// that is absent or unrecognized the build falls back to development.
    pub fn merge_with_cli(
        file_config: Option<KumiConfig>,
        root: PathBuf,
        mode_hint: Option<BuildMode>,
        out_dir: Option<&str>,
        port: Option<u16>,
    ) -> (BuildMode, ProjectLayout) {
        let base = file_config.unwrap_or_default();

        let file_mode = match base.mode.as_deref() {
            Some(raw) => match BuildMode::recognize(raw) {
                Some(mode) => Some(mode),
                None => {
                    Logger::warn(&format!(
                        "Unrecognized mode {:?} in {}, treating as development",
                        raw, CONFIG_FILE_NAME
                    ));
                    None
                }
            },
            None => None,
        };

        let mode = match mode_hint {
            Some(mode) => mode,
            None => match file_mode {
                Some(mode) => {
                    Logger::mode_resolved(mode, "config file");
                    mode
                }
                None => {
                    let mode = BuildMode::default();
                    Logger::mode_resolved(mode, "default");
                    mode
                }
            },
        };

        let defaults = ProjectLayout::for_root(root.clone());
        let source_dir = base.source_dir.unwrap_or(defaults.source_dir);

        // Aliases follow the source dir unless the file pins its own.
        let alias = base
            .alias
            .unwrap_or_else(|| ProjectLayout::default_aliases(&source_dir));

        let layout = ProjectLayout {
            root,
            out_dir: out_dir
                .map(str::to_string)
                .or(base.out_dir)
                .unwrap_or(defaults.out_dir),
            template: base.template.unwrap_or(defaults.template),
            favicon: base.favicon.unwrap_or(defaults.favicon),
            port: port.or(base.port).unwrap_or(defaults.port),
            entry: base.entry.unwrap_or(defaults.entry),
            extensions: base.extensions.unwrap_or(defaults.extensions),
            source_dir,
            alias,
        };

        (mode, layout)
    }

    /// Generate example config file
    pub fn generate_example() -> String {
        let example = KumiConfig::default();
        serde_json::to_string_pretty(&example).unwrap_or_else(|_| {
            r#"{
  "sourceDir": "src",
  "outDir": "dist",
  "template": "./index.html",
  "favicon": "assets/favicon.ico",
  "port": 3000
}"#
            .to_string()
        })
    }

    /// Write a starter kumi.config.json into the project root.
    /// Refuses to clobber an existing file unless `force` is set.
    pub fn write_starter(root: &Path, force: bool) -> Result<PathBuf> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if config_path.exists() && !force {
            return Err(KumiError::config(format!(
                "{} already exists (use --force to overwrite)",
                config_path.display()
            )));
        }

        std::fs::write(&config_path, format!("{}\n", Self::generate_example()))?;
        Ok(config_path)
    }
}
