//! Configuration loading and root folder resolution
//!
//! The root folder holds `recetario.db`. It is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. `RECETARIO_ROOT` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or malformed config file never stops startup; it is logged and
//! the compiled defaults apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_ENV_VAR: &str = "RECETARIO_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "recetario.db";

/// Optional settings read from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub log_level: Option<String>,
    pub seed_demo_data: Option<bool>,
}

impl TomlConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Read a config file, falling back to an empty config on any problem
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config file {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring unreadable config file: {}", e);
                Self::default()
            }
        }
    }
}

/// Platform config file location: `<config dir>/recetario/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("recetario").join("config.toml"))
}

/// Values used when neither CLI, environment nor config file say otherwise
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub seed_demo_data: bool,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        // ~/.local/share/recetario, ~/Library/Application Support/recetario,
        // %LOCALAPPDATA%\recetario
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("recetario"))
            .unwrap_or_else(|| PathBuf::from("./recetario_data"));

        Self {
            root_folder,
            log_level: "info".to_string(),
            seed_demo_data: true,
        }
    }
}

/// Resolves the root folder from the four configuration tiers
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    config: TomlConfig,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, config: TomlConfig) -> Self {
        Self { cli_arg, config }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.config.root_folder {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and names the files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }
}

/// Fully resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub log_level: String,
    pub seed_demo_data: bool,
}

impl AppConfig {
    /// Resolve every setting from CLI argument, environment, config file and defaults
    pub fn resolve(cli_root: Option<PathBuf>, config_file: Option<&Path>) -> Self {
        let toml_config = TomlConfig::load_or_default(config_file);
        let defaults = CompiledDefaults::for_current_platform();

        let root_folder = RootFolderResolver::new(cli_root, toml_config.clone()).resolve();
        let database_path = RootFolderInitializer::new(root_folder.clone()).database_path();

        Self {
            root_folder,
            database_path,
            log_level: toml_config.log_level.unwrap_or(defaults.log_level),
            seed_demo_data: toml_config.seed_demo_data.unwrap_or(defaults.seed_demo_data),
        }
    }
}
