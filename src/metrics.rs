//! Counters for the follower and recorder
//!
//! Metrics are recorded through the `metrics` facade. Without an installed
//! exporter every call is a no-op; `init_metrics` installs a Prometheus
//! exporter when a port is configured.

use std::fmt;
use std::net::SocketAddr;

use tracing::{info, warn};

/// Every metric name emitted by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    LinesRead,
    EventsParsed,
    SinkWritesSuccess,
    SinkWritesError,
    FollowerRestarts,
    FollowerStderrLines,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::LinesRead => "session_tracker_lines_read_total",
            MetricName::EventsParsed => "session_tracker_events_parsed_total",
            MetricName::SinkWritesSuccess => "session_tracker_sink_writes_success_total",
            MetricName::SinkWritesError => "session_tracker_sink_writes_error_total",
            MetricName::FollowerRestarts => "session_tracker_follower_restarts_total",
            MetricName::FollowerStderrLines => "session_tracker_follower_stderr_lines_total",
        }
    }

    pub fn all() -> [MetricName; 6] {
        [
            MetricName::LinesRead,
            MetricName::EventsParsed,
            MetricName::SinkWritesSuccess,
            MetricName::SinkWritesError,
            MetricName::FollowerRestarts,
            MetricName::FollowerStderrLines,
        ]
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus exporter on `0.0.0.0:<port>`.
pub fn init_metrics(port: u16) {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            info!(%addr, "Prometheus exporter listening on http://{}/metrics", addr);
            for name in MetricName::all() {
                ::metrics::describe_counter!(name.as_str(), "session tracker counter");
            }
        }
        Err(e) => {
            warn!(%addr, error = %e, "Prometheus exporter install failed");
        }
    }
}

pub mod follower {
    use super::MetricName;

    pub fn line_read() {
        ::metrics::counter!(MetricName::LinesRead.as_str()).increment(1);
    }

    pub fn restarted() {
        ::metrics::counter!(MetricName::FollowerRestarts.as_str()).increment(1);
    }

    pub fn stderr_line() {
        ::metrics::counter!(MetricName::FollowerStderrLines.as_str()).increment(1);
    }
}

pub mod recorder {
    use super::MetricName;
    use crate::types::EventKind;

    pub fn event_parsed(kind: EventKind) {
        ::metrics::counter!(MetricName::EventsParsed.as_str(), "kind" => kind.as_str()).increment(1);
    }

    pub fn write_succeeded() {
        ::metrics::counter!(MetricName::SinkWritesSuccess.as_str()).increment(1);
    }

    pub fn write_failed() {
        ::metrics::counter!(MetricName::SinkWritesError.as_str()).increment(1);
    }
}
