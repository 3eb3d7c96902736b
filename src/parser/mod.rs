//! Server log line parsing
//!
//! Recognises the two session lines written by a Minecraft-style server:
//!
//! ```text
//! [12:34:56] [Server thread/INFO]: Alice joined the game
//! [12:40:02] [Server thread/INFO]: Alice left the game
//! ```
//!
//! The log only carries a time of day, so the calendar date is taken from the
//! clock at the moment the line is processed. Lines written on a previous day
//! (replayed history, or a line read just after midnight) get today's date.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::types::{EventKind, PlayerEvent};

static JOIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\] \[.*\]: (.+?) joined the game").expect("join pattern compiles"));

static LEFT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\] \[.*\]: (.+?) left the game").expect("left pattern compiles"));

/// Parse a line against both patterns using today's local date.
pub fn parse_line(line: &str) -> Vec<PlayerEvent> {
    let now = Local::now();
    parse_line_on(line, now.date_naive(), &Local)
}

/// Parse a line, anchoring the captured time of day to `date` in `tz`.
///
/// The join and left patterns are checked independently, so a line can yield
/// zero, one or two events (join first).
pub fn parse_line_on<Tz: TimeZone>(line: &str, date: NaiveDate, tz: &Tz) -> Vec<PlayerEvent> {
    [(EventKind::Join, &*JOIN_PATTERN), (EventKind::Left, &*LEFT_PATTERN)]
        .into_iter()
        .filter_map(|(kind, pattern)| {
            let captures = pattern.captures(line)?;
            let token = captures.get(1)?.as_str();
            let player = captures.get(2)?.as_str();

            match resolve_timestamp(token, date, tz) {
                Some(timestamp) => Some(PlayerEvent {
                    player: player.to_string(),
                    kind,
                    timestamp,
                }),
                None => {
                    debug!(token, %kind, player, "Skipping line with unusable time of day");
                    None
                }
            }
        })
        .collect()
}

/// Combine an `HH:MM:SS` token with `date` and convert the local wall-clock time to UTC.
fn resolve_timestamp<Tz: TimeZone>(token: &str, date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(token.trim(), "%H:%M:%S").ok()?;
    // chrono reads `:60` as a leap second, which renders as an invalid `:60.000Z`
    if time.nanosecond() >= 1_000_000_000 {
        return None;
    }
    // Ambiguous wall-clock times (DST fall-back) resolve to the earlier instant;
    // times inside a spring-forward gap do not exist and yield None.
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
