//! Config loading at process start
//!
//! Runs before the main subscriber exists, since the log level comes from the
//! config itself.

use std::path::Path;

use anyhow::{Context, Result};
use menon_common::config::{default_config_path, load_toml_config, TomlConfig};
use tracing::warn;

/// Load the TOML config under a plain bootstrap subscriber
///
/// Warnings such as a missing config file reach stderr even though the
/// configured subscriber is installed only afterwards.
pub fn load_config_logged(explicit: Option<&Path>) -> Result<TomlConfig> {
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::with_default(bootstrap, || load_config(explicit))
}

/// Load `explicit`, else the platform default path, else compiled defaults
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    match explicit.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_toml_config(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            warn!("No config directory available, using compiled defaults");
            Ok(TomlConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_missing_config_warning_is_logged() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("config.toml");

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            load_config(Some(&missing))
        })
        .unwrap();

        assert_eq!(config, TomlConfig::default());
        assert!(
            captured.text().contains("Config file not found"),
            "log: {}",
            captured.text()
        );
    }

    #[test]
    fn test_loaded_config_is_logged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let config =
            tracing::subscriber::with_default(subscriber, || load_config(Some(&path))).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(captured.text().contains("Loaded config"));
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nbind = ").unwrap();

        assert!(load_config_logged(Some(&path)).is_err());
    }
}
