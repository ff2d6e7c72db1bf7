//! Tests for configuration loading and root folder resolution
//!
//! Uses serial_test: tests that touch RECETARIO_ROOT are marked #[serial]
//! so they never run in parallel with each other.

use recetario_common::config::{
    AppConfig, CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig,
    DATABASE_FILE, ROOT_ENV_VAR,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
fn test_compiled_defaults() {
    let defaults = CompiledDefaults::for_current_platform();
    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert!(defaults.root_folder.ends_with("recetario") || defaults.root_folder.ends_with("recetario_data"));
    assert_eq!(defaults.log_level, "info");
    assert!(defaults.seed_demo_data);
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_ENV_VAR);

    let resolver = RootFolderResolver::new(None, TomlConfig::default());
    assert_eq!(resolver.resolve(), CompiledDefaults::for_current_platform().root_folder);
}

#[test]
#[serial]
fn test_resolver_priority_order() {
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/recetario-from-toml")),
        ..Default::default()
    };

    env::remove_var(ROOT_ENV_VAR);
    let resolver = RootFolderResolver::new(None, toml.clone());
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/recetario-from-toml"));

    env::set_var(ROOT_ENV_VAR, "/tmp/recetario-from-env");
    let resolver = RootFolderResolver::new(None, toml.clone());
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/recetario-from-env"));

    let resolver = RootFolderResolver::new(Some(PathBuf::from("/tmp/recetario-from-cli")), toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/recetario-from-cli"));

    env::remove_var(ROOT_ENV_VAR);
}

#[test]
fn test_toml_config_parses_known_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "root_folder = \"/srv/recetas\"\nlog_level = \"debug\"\nseed_demo_data = false\n",
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/recetas")));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert_eq!(config.seed_demo_data, Some(false));
}

#[test]
fn test_malformed_or_missing_config_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "root_folder = [not toml").unwrap();

    assert!(TomlConfig::load(&path).is_err());
    assert_eq!(TomlConfig::load_or_default(Some(&path)), TomlConfig::default());

    let missing = dir.path().join("absent.toml");
    assert_eq!(TomlConfig::load_or_default(Some(&missing)), TomlConfig::default());
    assert_eq!(TomlConfig::load_or_default(None), TomlConfig::default());
}

#[test]
#[serial]
fn test_app_config_combines_sources() {
    env::remove_var(ROOT_ENV_VAR);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "seed_demo_data = false\n").unwrap();

    let root = dir.path().join("data");
    let config = AppConfig::resolve(Some(root.clone()), Some(&path));

    assert_eq!(config.root_folder, root);
    assert_eq!(config.database_path, root.join(DATABASE_FILE));
    assert_eq!(config.log_level, "info");
    assert!(!config.seed_demo_data);
}

#[test]
fn test_initializer_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("recetario");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();
    // second call is a no-op
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("recetario.db"));
}
