/// Environment variable names and fixed values shared across the codebase

use std::time::Duration;

// Required environment variables
pub const LOG_PATH_ENV: &str = "LATEST_LOG_PATH";
pub const NOTION_API_KEY_ENV: &str = "NOTION_API_KEY";
pub const NOTION_DATABASE_ENV: &str = "NOTION_SESSIONS_DB_ID";

// Optional environment variables
pub const METRICS_PORT_ENV: &str = "SESSION_TRACKER_METRICS_PORT";

/// Delay between a follow process exiting and the next one being spawned
pub const RESTART_DELAY: Duration = Duration::from_secs(5);

/// Program used to follow the log file
pub const TAIL_PROGRAM: &str = "tail";

// Notion API
pub const NOTION_API_BASE: &str = "https://api.notion.com";
pub const NOTION_VERSION: &str = "2022-06-28";
pub const NOTION_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Property names in the sessions database
pub const PROPERTY_NAME: &str = "Name";
pub const PROPERTY_EVENT: &str = "Event";
pub const PROPERTY_TIMESTAMP: &str = "Timestamp";

// Log output
pub const LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "session_tracker.log";
pub const DEFAULT_LOG_FILTER: &str = "session_tracker=info,warn";
