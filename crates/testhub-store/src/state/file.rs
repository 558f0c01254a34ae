//! File-backed state provider.
//!
//! Entries are mirrored in a `DashMap` and the whole map is rewritten as a
//! single JSON object on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use testhub_core::error::{AppError, ErrorKind};
use testhub_core::result::AppResult;
use testhub_core::traits::state::StateProvider;

/// State provider persisting to a JSON file.
#[derive(Debug)]
pub struct FileStateProvider {
    /// Location of the JSON file.
    path: PathBuf,
    /// In-memory mirror of the file contents.
    entries: DashMap<String, String>,
    /// Serializes file rewrites.
    write_lock: Mutex<()>,
}

impl FileStateProvider {
    /// Open the provider, loading existing entries.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is logged
    /// and also starts empty; it is overwritten on the next write.
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(saved) => {
                    debug!(path = %path.display(), entries = saved.len(), "Loaded state file");
                    for (key, value) in saved {
                        entries.insert(key, value);
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring corrupt state file");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read state file");
            }
        }

        Self {
            path,
            entries,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let json = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to create state directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StateProvider for FileStateProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist().await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        if self.entries.remove(key).is_some() {
            self.persist().await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                Ok(tokio::fs::metadata(parent).await.is_ok())
            }
            _ => Ok(true),
        }
    }
}
