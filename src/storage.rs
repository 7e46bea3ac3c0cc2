use crate::models::{MoodEntry, NewMoodEntry, StoreData};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode diary data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("data file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Access to mood entries keyed by calendar date.
#[async_trait]
pub trait MoodStore: Send + Sync {
    /// Inserts the entry, replacing any entry already saved on the same date.
    async fn upsert(&self, entry: NewMoodEntry) -> Result<MoodEntry, StorageError>;
    async fn get_by_date(&self, date: NaiveDate) -> Result<Option<MoodEntry>, StorageError>;
    /// Newest first.
    async fn get_recent(&self, limit: usize) -> Result<Vec<MoodEntry>, StorageError>;
    /// Inclusive on both ends, oldest first.
    async fn get_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoodEntry>, StorageError>;
    async fn delete_by_date(&self, date: NaiveDate) -> Result<bool, StorageError>;
    async fn delete_all(&self) -> Result<usize, StorageError>;
    /// Newest first.
    async fn get_all(&self) -> Result<Vec<MoodEntry>, StorageError>;
}

/// Keeps the diary in memory and rewrites a JSON file after every change.
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonFileStore {
    /// Loads the file at `path`. A missing file starts an empty diary.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let data = load_data(&path).await?;
        info!(path = %path.display(), entries = data.entries.len(), "opened mood store");
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }
}

#[async_trait]
impl MoodStore for JsonFileStore {
    async fn upsert(&self, entry: NewMoodEntry) -> Result<MoodEntry, StorageError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();

        next.next_id += 1;
        let saved = entry.into_entry(next.next_id);
        let replaced = next.entries.insert(saved.date, saved.clone()).is_some();

        persist_data(&self.path, &next).await?;
        *data = next;

        debug!(date = %saved.date, id = saved.id, replaced, "mood entry saved");
        Ok(saved)
    }

    async fn get_by_date(&self, date: NaiveDate) -> Result<Option<MoodEntry>, StorageError> {
        let data = self.data.lock().await;
        Ok(data.entries.get(&date).cloned())
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<MoodEntry>, StorageError> {
        let data = self.data.lock().await;
        Ok(data.entries.values().rev().take(limit).cloned().collect())
    }

    async fn get_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoodEntry>, StorageError> {
        if start > end {
            return Ok(Vec::new());
        }
        let data = self.data.lock().await;
        Ok(data.entries.range(start..=end).map(|(_, e)| e.clone()).collect())
    }

    async fn delete_by_date(&self, date: NaiveDate) -> Result<bool, StorageError> {
        let mut data = self.data.lock().await;
        if !data.entries.contains_key(&date) {
            return Ok(false);
        }

        let mut next = data.clone();
        next.entries.remove(&date);
        persist_data(&self.path, &next).await?;
        *data = next;

        debug!(%date, "mood entry deleted");
        Ok(true)
    }

    async fn delete_all(&self) -> Result<usize, StorageError> {
        let mut data = self.data.lock().await;
        let removed = data.entries.len();

        let next = StoreData {
            next_id: data.next_id,
            entries: Default::default(),
        };
        persist_data(&self.path, &next).await?;
        *data = next;

        info!(removed, "all mood entries deleted");
        Ok(removed)
    }

    async fn get_all(&self) -> Result<Vec<MoodEntry>, StorageError> {
        let data = self.data.lock().await;
        Ok(data.entries.values().rev().cloned().collect())
    }
}

pub fn resolve_data_path() -> PathBuf {
    std::env::var("MOOD_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/mood_entries.json"))
}

async fn load_data(path: &Path) -> Result<StoreData, StorageError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoreData::default()),
        Err(source) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes a sibling `.json.tmp` file, then renames it over `path`.
async fn persist_data(path: &Path, data: &StoreData) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, payload)
        .await
        .map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
}
