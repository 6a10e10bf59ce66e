//! Persisted UI preferences
//!
//! The only preference is the dark-mode flag. It lives in
//! `<root_folder>/preferences.toml` and is rewritten atomically on change.

use menon_common::config::write_toml_config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const PREFERENCES_FILE: &str = "preferences.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

/// Preferences file plus its in-memory copy
pub struct PreferencesStore {
    path: Option<PathBuf>,
    current: Mutex<Preferences>,
}

impl PreferencesStore {
    /// Load from `root_folder`; a missing or unreadable file yields defaults
    pub fn load(root_folder: &Path) -> Self {
        let path = root_folder.join(PREFERENCES_FILE);
        let current = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", path.display(), e);
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        };

        Self {
            path: Some(path),
            current: Mutex::new(current),
        }
    }

    /// Preferences that are never written to disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: Mutex::new(Preferences::default()),
        }
    }

    pub async fn get(&self) -> Preferences {
        *self.current.lock().await
    }

    /// Persist then publish new preferences
    pub async fn set(&self, prefs: Preferences) -> menon_common::Result<Preferences> {
        let mut current = self.current.lock().await;
        if let Some(path) = &self.path {
            write_toml_config(&prefs, path)?;
        }
        *current = prefs;
        info!(dark_mode = prefs.dark_mode, "Preferences saved");
        Ok(prefs)
    }
}
