use std::process::Command;

use anyhow::Result;
use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_session_tracker");

#[test]
fn test_exits_with_status_1_when_nothing_is_configured() -> Result<()> {
    let workdir = tempdir()?;
    let output = Command::new(BIN).env_clear().current_dir(workdir.path()).output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LATEST_LOG_PATH"), "stderr: {stderr}");
    assert!(stderr.contains("NOTION_API_KEY"), "stderr: {stderr}");
    assert!(stderr.contains("NOTION_SESSIONS_DB_ID"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn test_exits_before_watching_when_one_variable_is_missing() -> Result<()> {
    let workdir = tempdir()?;
    let output = Command::new(BIN)
        .env_clear()
        .env("LATEST_LOG_PATH", workdir.path().join("latest.log"))
        .env("NOTION_API_KEY", "secret_test")
        .current_dir(workdir.path())
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NOTION_SESSIONS_DB_ID"), "stderr: {stderr}");
    // Logging starts only after configuration loads
    assert!(!workdir.path().join("logs").exists());
    Ok(())
}
