use thiserror::Error;

/// Fatal startup errors. Any of these stops the process before a file is watched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Failures writing to the external sink. Logged and discarded by the recorder.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

impl SinkError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SinkError::Api { status: 429, .. })
    }
}

/// Failures of a single follow process run. The follower restarts after any of these.
#[derive(Error, Debug)]
pub enum FollowError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("follow process has no {0} pipe")]
    MissingPipe(&'static str),

    #[error("line consumer closed")]
    ConsumerClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lists_every_variable() {
        let err = ConfigError::Missing(vec!["LATEST_LOG_PATH", "NOTION_API_KEY"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: LATEST_LOG_PATH, NOTION_API_KEY"
        );
    }

    #[test]
    fn rate_limit_is_detected_by_status() {
        let err = SinkError::Api {
            status: 429,
            code: "rate_limited".to_string(),
            message: "slow down".to_string(),
        };
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "API error (429 rate_limited): slow down");
    }
}
