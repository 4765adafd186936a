//! The fetch → diff → notify → persist loop.
//!
//! Every collaborator sits behind a trait so the loop can be driven with fakes.

use crate::mail::api::NotifyError;
use crate::store::StoreError;
use crate::ticketmaster::api::FetchError;
use crate::ticketmaster::model::EventRecord;
use async_trait::async_trait;
use itertools::Itertools;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, instrument};

#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self) -> Result<Vec<EventRecord>, FetchError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &EventRecord) -> Result<(), NotifyError>;
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Empty when nothing was ever saved
    async fn load(&self) -> Result<Vec<EventRecord>, StoreError>;
    async fn save(&self, events: &[EventRecord]) -> Result<(), StoreError>;
}

/// What happened during one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub fetch_failed: bool,
    pub new_events: Vec<EventRecord>,
    pub notified: usize,
    pub failed_notifications: usize,
    pub snapshot_saved: bool,
}

pub struct Watcher<S, N, P> {
    source: S,
    notifier: N,
    store: P,
    interval: Duration,
}

impl<S, N, P> Watcher<S, N, P>
where
    S: EventSource,
    N: Notifier,
    P: SnapshotStore,
{
    pub fn new(source: S, notifier: N, store: P, interval: Duration) -> Self {
        Self {
            source,
            notifier,
            store,
            interval,
        }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Runs cycles until `shutdown` resolves, waiting `interval` after each one.
    ///
    /// The snapshot is loaded once before the first fetch so a corrupt file is reported
    /// up front. Shutdown is only observed while waiting, a running cycle always completes.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), WatchError>
    where
        F: Future<Output = ()>,
    {
        let previous = self.store.load().await?;
        info!("Watching for new events ({} already known)", previous.len());

        tokio::pin!(shutdown);

        loop {
            self.run_cycle().await?;

            info!("Waiting {:?} before checking again...", self.interval);

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> Result<CycleReport, WatchError> {
        info!("Checking for new events...");

        let (fetched, fetch_failed) = match self.source.fetch_events().await {
            Ok(events) => (events, false),
            Err(err) => {
                error!("Error fetching events: {}", err);
                (Vec::new(), true)
            }
        };

        let previous = self.store.load().await?;
        let new_events = find_new_events(&fetched, &previous);

        let mut report = CycleReport {
            fetched: fetched.len(),
            fetch_failed,
            ..Default::default()
        };

        if new_events.is_empty() {
            info!("No new events found.");
            return Ok(report);
        }

        info!(
            "Found {} new event(s)! [{}]",
            new_events.len(),
            new_events.iter().map(|event| event.id.as_str()).join(",")
        );

        for event in &new_events {
            match self.notifier.notify(event).await {
                Ok(()) => report.notified += 1,
                Err(err) => {
                    error!("Failed to notify about '{}': {}", event.name, err);
                    report.failed_notifications += 1;
                }
            }
        }

        self.store.save(&fetched).await?;
        report.snapshot_saved = true;
        report.new_events = new_events;

        Ok(report)
    }
}

/// Events in `fetched` whose id isn't in `previous`, keeping the fetch order
pub fn find_new_events(fetched: &[EventRecord], previous: &[EventRecord]) -> Vec<EventRecord> {
    let previous_ids: HashSet<&str> = previous.iter().map(|event| event.id.as_str()).collect();

    fetched
        .iter()
        .filter(|event| !previous_ids.contains(event.id.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("events snapshot unavailable: {0}")]
    Store(#[from] StoreError),
}
