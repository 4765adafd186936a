#![cfg(unix)]

mod common;

use async_trait::async_trait;
use common::*;
use concertalert::shutdown::ShutdownSignal;
use concertalert::ticketmaster::api::FetchError;
use concertalert::ticketmaster::model::EventRecord;
use concertalert::watcher::{EventSource, Watcher};
use std::process::{self, Command};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);
const GRACE: Duration = Duration::from_secs(10);

fn send_sigterm_to_self() {
    let status = Command::new("kill")
        .args(["-TERM", &process::id().to_string()])
        .status()
        .unwrap();

    assert!(status.success());
}

/// Gets a SIGTERM while the fetch is still running
struct InterruptedSource(Arc<ScriptedSource>);

#[async_trait]
impl EventSource for InterruptedSource {
    async fn fetch_events(&self) -> Result<Vec<EventRecord>, FetchError> {
        send_sigterm_to_self();
        tokio::time::sleep(Duration::from_millis(50)).await;

        self.0.fetch_events().await
    }
}

#[test_log::test(tokio::test)]
async fn should_keep_a_signal_sent_before_waiting() {
    let shutdown = ShutdownSignal::install().unwrap();

    send_sigterm_to_self();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(timeout(GRACE, shutdown.recv()).await.is_ok());
}

#[test_log::test(tokio::test)]
async fn when_a_signal_arrives_mid_cycle_should_finish_the_cycle_and_stop() {
    let source = Arc::new(ScriptedSource::returning(vec![event("E1"), event("E2")]));
    let notifier = Arc::new(RecordingNotifier::default());
    let watcher = Watcher::new(
        InterruptedSource(source.clone()),
        SharedNotifier(notifier.clone()),
        MemoryStore::default(),
        DAY,
    );
    let shutdown = ShutdownSignal::install().unwrap();

    let result = timeout(GRACE, watcher.run(shutdown.recv())).await;

    assert!(matches!(result, Ok(Ok(()))), "{:?}", result);
    assert_eq!(source.calls(), 1);
    assert_eq!(notifier.attempts(), vec!["E1", "E2"]);
    assert_eq!(watcher.store().events(), vec![event("E1"), event("E2")]);
}
