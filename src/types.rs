use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Kind of session event found in the server log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Join,
    Left,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Join => "join",
            EventKind::Left => "left",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player joining or leaving, parsed from a single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEvent {
    pub player: String,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

impl PlayerEvent {
    /// ISO-8601 instant with millisecond precision, e.g. `2026-10-16T03:34:56.000Z`
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
