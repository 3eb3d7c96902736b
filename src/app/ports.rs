use async_trait::async_trait;

use crate::error::SinkError;
use crate::types::PlayerEvent;

/// Destination for parsed session events
#[async_trait]
pub trait EventSinkPort: Send + Sync {
    /// Create one record for `event`. Implementations do not retry.
    async fn create_record(&self, event: &PlayerEvent) -> Result<(), SinkError>;

    /// Short name used in log lines
    fn name(&self) -> &'static str {
        "sink"
    }
}
