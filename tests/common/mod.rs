#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use concertalert::mail::api::NotifyError;
use concertalert::store::StoreError;
use concertalert::ticketmaster::api::FetchError;
use concertalert::ticketmaster::model::EventRecord;
use concertalert::watcher::{EventSource, Notifier, SnapshotStore};
use std::collections::VecDeque;
use std::env;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub fn event(id: &str) -> EventRecord {
    EventRecord::new(
        id.to_string(),
        format!("Show {id}"),
        "Hall 1".to_string(),
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        format!("http://x/{id}"),
    )
}

pub fn ids(events: &[EventRecord]) -> Vec<String> {
    events.iter().map(|event| event.id.clone()).collect()
}

pub fn temp_events_file() -> PathBuf {
    env::temp_dir()
        .join(format!("concertalert-{}", Uuid::new_v4()))
        .join("events.json")
}

/// Hands out the scripted results in order, then keeps returning the last fetch
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<EventRecord>, FetchError>>>,
    last: Mutex<Vec<EventRecord>>,
    calls: Mutex<usize>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Vec<EventRecord>, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn returning(events: Vec<EventRecord>) -> Self {
        Self::new(vec![Ok(events)])
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn fetch_events(&self) -> Result<Vec<EventRecord>, FetchError> {
        *self.calls.lock().unwrap() += 1;

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(events)) => {
                *self.last.lock().unwrap() = events.clone();
                Ok(events)
            }
            Some(Err(err)) => Err(err),
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

pub fn unavailable() -> FetchError {
    FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)
}

/// Records every attempt, failing for the ids it was told to
#[derive(Default)]
pub struct RecordingNotifier {
    failing_ids: Vec<String>,
    attempts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn failing_for(ids: &[&str]) -> Self {
        Self {
            failing_ids: ids.iter().map(|id| id.to_string()).collect(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &EventRecord) -> Result<(), NotifyError> {
        self.attempts.lock().unwrap().push(event.id.clone());

        if self.failing_ids.contains(&event.id) {
            return Err(NotifyError::Other("connection refused".to_string()));
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<Vec<EventRecord>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn with(events: Vec<EventRecord>) -> Self {
        Self {
            events: Mutex::new(events),
            saves: Mutex::new(0),
        }
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.events.lock().unwrap().clone()
    }

    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Vec<EventRecord>, StoreError> {
        Ok(self.events())
    }

    async fn save(&self, events: &[EventRecord]) -> Result<(), StoreError> {
        *self.events.lock().unwrap() = events.to_vec();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

/// Lets a test keep a handle on a source after moving it into a watcher
pub struct SharedSource(pub Arc<ScriptedSource>);

#[async_trait]
impl EventSource for SharedSource {
    async fn fetch_events(&self) -> Result<Vec<EventRecord>, FetchError> {
        self.0.fetch_events().await
    }
}

pub struct SharedNotifier(pub Arc<RecordingNotifier>);

#[async_trait]
impl Notifier for SharedNotifier {
    async fn notify(&self, event: &EventRecord) -> Result<(), NotifyError> {
        self.0.notify(event).await
    }
}
