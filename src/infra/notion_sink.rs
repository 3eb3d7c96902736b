use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::app::ports::EventSinkPort;
use crate::config::Config;
use crate::constants::{
    NOTION_API_BASE, NOTION_REQUEST_TIMEOUT, NOTION_VERSION, PROPERTY_EVENT, PROPERTY_NAME,
    PROPERTY_TIMESTAMP,
};
use crate::error::SinkError;
use crate::types::PlayerEvent;

/// Writes each event as a page in a Notion database
pub struct NotionSink {
    client: reqwest::Client,
    api_key: String,
    database_id: String,
    base_url: String,
}

impl NotionSink {
    pub fn new(api_key: impl Into<String>, database_id: impl Into<String>) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(NOTION_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            database_id: database_id.into(),
            base_url: NOTION_API_BASE.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SinkError> {
        Self::new(config.notion_api_key.clone(), config.sessions_database_id.clone())
    }

    /// Point the sink at another API host (a proxy, or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn pages_url(&self) -> String {
        format!("{}/v1/pages", self.base_url)
    }
}

/// Request body creating one sessions-database page for `event`.
pub fn page_payload(database_id: &str, event: &PlayerEvent) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": {
            PROPERTY_NAME: { "title": [ { "text": { "content": event.player } } ] },
            PROPERTY_EVENT: { "select": { "name": event.kind.as_str() } },
            PROPERTY_TIMESTAMP: { "date": { "start": event.iso_timestamp() } },
        }
    })
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    code: String,
    message: String,
}

/// Map a non-success response to a `SinkError`, keeping Notion's error code when present.
fn api_error(status: u16, body: &str) -> SinkError {
    match serde_json::from_str::<NotionErrorBody>(body) {
        Ok(parsed) => SinkError::Api {
            status,
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => SinkError::Api {
            status,
            code: "unknown".to_string(),
            message: body.trim().to_string(),
        },
    }
}

#[async_trait]
impl EventSinkPort for NotionSink {
    async fn create_record(&self, event: &PlayerEvent) -> Result<(), SinkError> {
        let payload = page_payload(&self.database_id, event);
        debug!(url = %self.pages_url(), player = %event.player, "Creating Notion page");

        let resp = self
            .client
            .post(self.pages_url())
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(api_error(status.as_u16(), &body))
    }

    fn name(&self) -> &'static str {
        "notion"
    }
}
