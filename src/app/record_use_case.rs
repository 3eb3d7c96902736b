use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

use crate::app::ports::EventSinkPort;
use crate::parser;
use crate::types::PlayerEvent;

/// Use case turning raw log lines into sink records
///
/// Writes are awaited one at a time, so records reach the sink in log order.
/// Sink failures are logged and dropped; nothing is retried or deduplicated.
pub struct RecordEventsUseCase {
    sink: Arc<dyn EventSinkPort>,
}

impl RecordEventsUseCase {
    pub fn new(sink: Arc<dyn EventSinkPort>) -> Self {
        Self { sink }
    }

    /// Consume lines until the follower side of the channel goes away.
    pub async fn run(&self, mut lines: UnboundedReceiver<String>) {
        while let Some(line) = lines.recv().await {
            self.process_line(&line).await;
        }
        warn!("Line stream closed; recorder stopping");
    }

    /// Parse a single line and record every event it yields.
    pub async fn process_line(&self, line: &str) -> Vec<PlayerEvent> {
        let events = parser::parse_line(line);
        if events.is_empty() {
            return events;
        }

        for event in &events {
            crate::metrics::recorder::event_parsed(event.kind);
            debug!(player = %event.player, kind = %event.kind, "Parsed session event");
            self.record(event).await;
        }
        events
    }

    /// Create one sink record for `event`, logging the outcome.
    pub async fn record(&self, event: &PlayerEvent) {
        match self.sink.create_record(event).await {
            Ok(()) => {
                crate::metrics::recorder::write_succeeded();
                info!(
                    player = %event.player,
                    kind = %event.kind,
                    timestamp = %event.iso_timestamp(),
                    sink = self.sink.name(),
                    "Event saved"
                );
            }
            Err(e) => {
                crate::metrics::recorder::write_failed();
                error!(
                    player = %event.player,
                    kind = %event.kind,
                    sink = self.sink.name(),
                    rate_limited = e.is_rate_limited(),
                    error = %e,
                    "Failed to save event"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use crate::types::EventKind;
    use async_trait::async_trait;

    struct MockSink {
        pub records: Arc<tokio::sync::Mutex<Vec<PlayerEvent>>>,
        fail: bool,
    }

    impl MockSink {
        pub fn new(fail: bool) -> Self {
            Self {
                records: Arc::new(tokio::sync::Mutex::new(Vec::new())),
                fail,
            }
        }
    }

    #[async_trait]
    impl EventSinkPort for MockSink {
        async fn create_record(&self, event: &PlayerEvent) -> Result<(), SinkError> {
            self.records.lock().await.push(event.clone());
            if self.fail {
                return Err(SinkError::Api {
                    status: 400,
                    code: "validation_error".to_string(),
                    message: "Event is not a property that exists.".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_join_line_is_recorded() {
        let sink = Arc::new(MockSink::new(false));
        let records = sink.records.clone();
        let use_case = RecordEventsUseCase::new(sink);

        let events = use_case
            .process_line("[12:34:56] [Server thread/INFO]: Alice joined the game")
            .await;

        assert_eq!(events.len(), 1);
        let records = records.lock().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].player, "Alice");
        assert_eq!(records[0].kind, EventKind::Join);
    }

    #[tokio::test]
    async fn test_non_matching_line_writes_nothing() {
        let sink = Arc::new(MockSink::new(false));
        let records = sink.records.clone();
        let use_case = RecordEventsUseCase::new(sink);

        let events = use_case
            .process_line("[12:34:56] [Server thread/INFO]: Done (3.2s)! For help, type \"help\"")
            .await;

        assert!(events.is_empty());
        assert!(records.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_stop_processing() {
        let sink = Arc::new(MockSink::new(true));
        let records = sink.records.clone();
        let use_case = RecordEventsUseCase::new(sink);

        use_case
            .process_line("[10:00:00] [Server thread/INFO]: Alice joined the game")
            .await;
        use_case
            .process_line("[10:05:00] [Server thread/INFO]: Alice left the game")
            .await;

        let records = records.lock().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].kind, EventKind::Left);
    }

    #[tokio::test]
    async fn test_replayed_line_is_recorded_twice() {
        let sink = Arc::new(MockSink::new(false));
        let records = sink.records.clone();
        let use_case = RecordEventsUseCase::new(sink);
        let line = "[12:34:56] [Server thread/INFO]: Alice joined the game";

        use_case.process_line(line).await;
        use_case.process_line(line).await;

        let records = records.lock().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[tokio::test]
    async fn test_run_preserves_line_order() {
        let sink = Arc::new(MockSink::new(false));
        let records = sink.records.clone();
        let use_case = RecordEventsUseCase::new(sink);

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        for line in [
            "[10:00:00] [Server thread/INFO]: Alice joined the game",
            "[10:00:01] [Server thread/INFO]: Bob joined the game",
            "[10:00:02] [Server thread/INFO]: Alice left the game",
        ] {
            tx.send(line.to_string()).unwrap();
        }
        drop(tx);

        use_case.run(rx).await;

        let records = records.lock().await;
        let seen: Vec<(&str, EventKind)> = records.iter().map(|e| (e.player.as_str(), e.kind)).collect();
        assert_eq!(
            seen,
            vec![
                ("Alice", EventKind::Join),
                ("Bob", EventKind::Join),
                ("Alice", EventKind::Left),
            ]
        );
    }
}
