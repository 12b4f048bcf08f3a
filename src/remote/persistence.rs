//! Persisted attribute values, restored at boot.
//!
//! Writes happen on a background task that follows the published value, so
//! file I/O never runs on the controller's path.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedAttributes {
    pub on: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersistedAttributes {
    /// Load from file. Missing or unreadable files yield the defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<PersistedAttributes>(&bytes) {
                Ok(state) => {
                    info!("Restored on={} from {:?}", state.on, path);
                    state
                }
                Err(e) => {
                    warn!("Failed to parse attribute file: {}", e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No persisted attributes found (first boot)");
                Self::default()
            }
            Err(e) => {
                error!("Failed to read attribute file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}

/// File-backed store for the on/off attribute.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    path: PathBuf,
}

impl AttributeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Last persisted on/off value, `false` if none.
    pub fn restore_on(&self) -> bool {
        PersistedAttributes::load(&self.path).on
    }

    /// Persist `on`. Failures are logged; losing the value only affects the
    /// next boot.
    pub fn store_on(&self, on: bool) {
        let state = PersistedAttributes {
            on,
            updated_at: Some(Utc::now()),
        };
        if let Err(e) = state.save(&self.path) {
            error!("Failed to save attributes to {:?}: {}", self.path, e);
        }
    }
}

/// Spawn a task persisting every change of the published on/off value.
///
/// Values equal to the last one written are skipped. The task ends when the
/// publisher is dropped.
pub fn run_persistence(store: AttributeStore, mut rx: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = *rx.borrow_and_update();
        while rx.changed().await.is_ok() {
            let on = *rx.borrow_and_update();
            if on == last {
                continue;
            }
            let store = store.clone();
            if let Err(e) = tokio::task::spawn_blocking(move || store.store_on(on)).await {
                error!("Attribute save task failed: {}", e);
                continue;
            }
            last = on;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::publisher::{AttributePublisher, WatchPublisher};

    #[test]
    fn test_missing_file_restores_off() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttributeStore::new(dir.path().join("attributes.json"));
        assert!(!store.restore_on());
    }

    #[test]
    fn test_store_then_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("attributes.json");
        let store = AttributeStore::new(path.clone());

        store.store_on(true);
        assert!(store.restore_on());

        let saved = PersistedAttributes::load(&path);
        assert!(saved.updated_at.is_some());
    }

    #[test]
    fn test_corrupt_file_restores_off() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attributes.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(!AttributeStore::new(path).restore_on());
    }

    #[test]
    fn test_file_without_timestamp_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attributes.json");
        fs::write(&path, br#"{"on": true}"#).unwrap();
        let saved = PersistedAttributes::load(&path);
        assert!(saved.on);
        assert_eq!(saved.updated_at, None);
    }

    #[tokio::test]
    async fn test_changed_value_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attributes.json");
        let publisher = WatchPublisher::new(false);
        let task = run_persistence(AttributeStore::new(path.clone()), publisher.subscribe());

        publisher.publish_on(true);
        drop(publisher);
        task.await.unwrap();

        assert!(AttributeStore::new(path).restore_on());
    }

    #[tokio::test]
    async fn test_unchanged_value_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attributes.json");
        let publisher = WatchPublisher::new(false);
        let task = run_persistence(AttributeStore::new(path.clone()), publisher.subscribe());

        publisher.publish_on(false);
        drop(publisher);
        task.await.unwrap();

        assert!(!path.exists());
    }
}
