//! Tests for configuration loading and resolution
//!
//! Covers:
//! - Missing TOML file degrades to compiled defaults
//! - Root folder priority: CLI → ENV → TOML → default
//! - Store/webhook settings: ENV overrides TOML
//! - Atomic TOML writes
//!
//! Note: Uses serial_test to prevent ENV variable race conditions. Tests that
//! touch MENON_* variables are marked #[serial].

use menon_common::config::{
    default_root_folder, ensure_directory_exists, load_toml_config, resolve_root_folder,
    write_toml_config, StoreConfig, TomlConfig, WebhookConfig, ENV_ROOT, ENV_ROOT_FOLDER,
    ENV_STORE_KEY, ENV_STORE_URL, ENV_WEBHOOK_URL,
};
use menon_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    for name in [ENV_ROOT_FOLDER, ENV_ROOT, ENV_STORE_URL, ENV_STORE_KEY, ENV_WEBHOOK_URL] {
        env::remove_var(name);
    }
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_toml_config(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_config_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[store\nurl = ").unwrap();

    let err = load_toml_config(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/menon"

[logging]
level = "debug"

[server]
bind = "0.0.0.0:8080"

[store]
url = "https://demo.supabase.co"
api_key = "anon-key"
products_table = "products"

[webhook]
url = "https://hooks.example.com/new-product"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/menon")));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.store.products_table, "products");
    assert_eq!(config.store.offers_table, "offers_menon");
    assert_eq!(
        config.webhook.url.as_deref(),
        Some("https://hooks.example.com/new-product")
    );
}

#[test]
#[serial]
fn test_root_folder_default_when_nothing_set() {
    clear_env();
    let resolved = resolve_root_folder(None, &TomlConfig::default());
    assert_eq!(resolved, default_root_folder());
}

#[test]
#[serial]
fn test_root_folder_env_beats_toml() {
    clear_env();
    env::set_var(ENV_ROOT, "/tmp/menon-env-root");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/menon-toml-root")),
        ..Default::default()
    };

    assert_eq!(
        resolve_root_folder(None, &config),
        PathBuf::from("/tmp/menon-env-root")
    );

    env::set_var(ENV_ROOT_FOLDER, "/tmp/menon-env-root-folder");
    assert_eq!(
        resolve_root_folder(None, &config),
        PathBuf::from("/tmp/menon-env-root-folder")
    );

    clear_env();
    assert_eq!(
        resolve_root_folder(None, &config),
        PathBuf::from("/tmp/menon-toml-root")
    );
}

#[test]
#[serial]
fn test_store_credentials_from_toml() {
    clear_env();
    let store = StoreConfig {
        url: Some("https://demo.supabase.co".to_string()),
        api_key: Some("toml-key".to_string()),
        ..Default::default()
    };

    let creds = store.resolve_credentials().unwrap();
    assert_eq!(creds.url, "https://demo.supabase.co");
    assert_eq!(creds.api_key, "toml-key");
    assert_eq!(creds.timeout.as_secs(), 30);
}

#[test]
#[serial]
fn test_store_credentials_env_overrides_toml() {
    clear_env();
    env::set_var(ENV_STORE_KEY, "env-key");
    let store = StoreConfig {
        url: Some("https://demo.supabase.co".to_string()),
        api_key: Some("toml-key".to_string()),
        ..Default::default()
    };

    let creds = store.resolve_credentials().unwrap();
    assert_eq!(creds.api_key, "env-key");
    clear_env();
}

#[test]
#[serial]
fn test_store_credentials_missing_is_config_error() {
    clear_env();
    let store = StoreConfig {
        url: Some("https://demo.supabase.co".to_string()),
        api_key: Some("   ".to_string()),
        ..Default::default()
    };

    let err = store.resolve_credentials().unwrap_err();
    assert!(matches!(err, Error::Config(msg) if msg.contains(ENV_STORE_KEY)));
}

#[test]
#[serial]
fn test_webhook_url_resolution() {
    clear_env();
    assert_eq!(WebhookConfig::default().resolve_url(), None);

    let webhook = WebhookConfig {
        url: Some("https://toml.example.com".to_string()),
        ..Default::default()
    };
    assert_eq!(webhook.resolve_url().as_deref(), Some("https://toml.example.com"));

    env::set_var(ENV_WEBHOOK_URL, "https://env.example.com");
    assert_eq!(webhook.resolve_url().as_deref(), Some("https://env.example.com"));
    clear_env();
}

#[test]
fn test_atomic_write_round_trip_and_cleans_temp() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("config.toml");

    let mut config = TomlConfig::default();
    config.store.url = Some("https://demo.supabase.co".to_string());
    write_toml_config(&config, &target).unwrap();

    assert!(target.exists());
    assert!(!dir.path().join("nested").join("config.toml.tmp").exists());
    assert_eq!(load_toml_config(&target).unwrap(), config);
}

#[cfg(unix)]
#[test]
fn test_atomic_write_sets_0600() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let target = dir.path().join("config.toml");
    write_toml_config(&TomlConfig::default(), &target).unwrap();

    let mode = std::fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_ensure_directory_exists_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("menon-root");

    ensure_directory_exists(&root).unwrap();
    ensure_directory_exists(&root).unwrap();
    assert!(root.is_dir());
}
