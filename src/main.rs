use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use session_tracker::app::record_use_case::RecordEventsUseCase;
use session_tracker::config::Config;
use session_tracker::follower::LogFollower;
use session_tracker::infra::NotionSink;
use session_tracker::logging;
use session_tracker::metrics::init_metrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env().context("failed to load configuration")?;

    let _log_guard = logging::init_logging();
    if let Some(port) = config.metrics_port {
        init_metrics(port);
    }

    let sink = NotionSink::from_config(&config).context("failed to build Notion client")?;
    let recorder = RecordEventsUseCase::new(Arc::new(sink));

    info!(path = %config.log_path.display(), "Watching log file using tail -F");
    let lines = LogFollower::new(&config.log_path).watch();

    tokio::select! {
        _ = recorder.run(lines) => {
            warn!("Recorder finished unexpectedly");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received; shutting down");
        }
    }

    Ok(())
}
