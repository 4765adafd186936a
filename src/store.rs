use crate::ticketmaster::model::EventRecord;
use crate::watcher::SnapshotStore;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

const INDENT: &[u8] = b"    ";

/// Keeps the last fetched events as an indented JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load_events(&self) -> Result<Vec<EventRecord>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("No previous events saved, starting with an empty history");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let events: Vec<EventRecord> =
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!("Loaded {} previous events", events.len());

        Ok(events)
    }

    /// Replaces whatever was saved before (never merges).
    /// Written to a sibling `.tmp` file first and then renamed over the target.
    #[instrument(skip(self, events), fields(path = %self.path.display(), event_count = events.len()))]
    pub async fn save_events(&self, events: &[EventRecord]) -> Result<(), StoreError> {
        let json = to_indented_json(events).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let tmp_path = self.tmp_path();

        fs::write(&tmp_path, json)
            .await
            .map_err(|source| StoreError::Write {
                path: tmp_path.clone(),
                source,
            })?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        debug!("Saved events");

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut file_name = self.path.file_name().unwrap_or_default().to_os_string();
        file_name.push(".tmp");

        self.path.with_file_name(file_name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<EventRecord>, StoreError> {
        self.load_events().await
    }

    async fn save(&self, events: &[EventRecord]) -> Result<(), StoreError> {
        self.save_events(events).await
    }
}

fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));

    value.serialize(&mut serializer)?;

    Ok(buffer)
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("couldn't read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("'{}' is not a valid events file: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("couldn't serialize events: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("couldn't write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}
