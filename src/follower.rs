//! Log following through a supervised `tail -F` process
//!
//! The follower owns a child process that prints new lines appended to the log.
//! When the child exits for any reason, or cannot be spawned at all, the
//! follower waits a fixed delay and starts a fresh one. It never gives up; it
//! only stops once the receiving side of its line channel has been dropped.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::constants::{RESTART_DELAY, TAIL_PROGRAM};
use crate::error::FollowError;

/// Program and arguments of the line-follow process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl FollowCommand {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `tail -F <path>`: follows by name, so rotation and recreation are tolerated.
    pub fn tail(path: &Path) -> Self {
        Self::new(TAIL_PROGRAM, ["-F".to_string(), path.display().to_string()])
    }
}

pub struct LogFollower {
    command: FollowCommand,
    restart_delay: Duration,
}

impl LogFollower {
    pub fn new(path: &Path) -> Self {
        Self::with_command(FollowCommand::tail(path), RESTART_DELAY)
    }

    pub fn with_command(command: FollowCommand, restart_delay: Duration) -> Self {
        Self {
            command,
            restart_delay,
        }
    }

    /// Start following and return the never-ending stream of non-empty lines.
    ///
    /// Must be called inside a tokio runtime. Dropping the receiver kills the
    /// child process and ends the supervising task.
    pub fn watch(self) -> UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(self.supervise(tx));
        rx
    }

    async fn supervise(self, tx: UnboundedSender<String>) {
        let mut restarts: u64 = 0;
        loop {
            match self.run_once(&tx).await {
                Ok(status) => {
                    error!(
                        program = %self.command.program,
                        code = ?status.code(),
                        %status,
                        "Follow process exited, restarting"
                    );
                }
                Err(FollowError::ConsumerClosed) => {
                    info!("Line consumer dropped; follower stopping");
                    return;
                }
                Err(e) => {
                    error!(program = %self.command.program, error = %e, "Follow process failed, restarting");
                }
            }

            if tx.is_closed() {
                info!("Line consumer dropped; follower stopping");
                return;
            }

            restarts += 1;
            crate::metrics::follower::restarted();
            debug!(restarts, delay_ms = self.restart_delay.as_millis() as u64, "Waiting before restart");
            tokio::time::sleep(self.restart_delay).await;
        }
    }

    /// Run one child process to completion, forwarding its stdout lines.
    async fn run_once(&self, tx: &UnboundedSender<String>) -> Result<ExitStatus, FollowError> {
        let mut child = self.spawn()?;
        info!(
            program = %self.command.program,
            args = ?self.command.args,
            pid = ?child.id(),
            "Follow process started"
        );

        let stdout = child.stdout.take().ok_or(FollowError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(FollowError::MissingPipe("stderr"))?;
        let stderr_task = tokio::spawn(log_stderr(self.command.program.clone(), stderr));

        let mut segments = BufReader::new(stdout).split(b'\n');
        loop {
            let segment = tokio::select! {
                segment = segments.next_segment() => segment?,
                _ = tx.closed() => None,
            };
            if tx.is_closed() {
                stop_child(&mut child).await;
                stderr_task.abort();
                return Err(FollowError::ConsumerClosed);
            }
            let Some(segment) = segment else {
                break;
            };
            let Some(line) = decode_line(&segment) else {
                continue;
            };
            crate::metrics::follower::line_read();
            if tx.send(line).is_err() {
                stop_child(&mut child).await;
                stderr_task.abort();
                return Err(FollowError::ConsumerClosed);
            }
        }

        // stdout closed; the child is exiting or has exited
        let status = child.wait().await?;
        let _ = stderr_task.await;
        Ok(status)
    }

    fn spawn(&self) -> Result<Child, FollowError> {
        Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| FollowError::Spawn {
                program: self.command.program.clone(),
                source,
            })
    }
}

/// Turn one raw stdout segment into a line, dropping blank ones.
fn decode_line(segment: &[u8]) -> Option<String> {
    let segment = segment.strip_suffix(b"\r").unwrap_or(segment);
    let line = String::from_utf8_lossy(segment);
    if line.trim().is_empty() {
        None
    } else {
        Some(line.into_owned())
    }
}

async fn log_stderr<R: AsyncRead + Unpin>(program: String, stderr: R) {
    let mut lines = BufReader::new(stderr).split(b'\n');
    loop {
        match lines.next_segment().await {
            Ok(Some(segment)) => {
                if let Some(line) = decode_line(&segment) {
                    crate::metrics::follower::stderr_line();
                    error!(program = %program, stderr = %line, "Follow process error output");
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(program = %program, error = %e, "Failed reading follow process stderr");
                break;
            }
        }
    }
}

async fn stop_child(child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!(error = %e, "Failed to kill follow process");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_follower_uses_fixed_restart_delay() {
        let follower = LogFollower::new(&PathBuf::from("/srv/mc/logs/latest.log"));
        assert_eq!(follower.restart_delay, RESTART_DELAY);
        assert_eq!(follower.restart_delay, Duration::from_secs(5));
        assert_eq!(follower.command, FollowCommand::tail(&PathBuf::from("/srv/mc/logs/latest.log")));
    }

    #[test]
    fn test_tail_command() {
        let cmd = FollowCommand::tail(&PathBuf::from("/srv/mc/logs/latest.log"));
        assert_eq!(cmd.program, "tail");
        assert_eq!(cmd.args, vec!["-F", "/srv/mc/logs/latest.log"]);
    }

    #[test]
    fn test_decode_line_drops_blank_and_carriage_return() {
        assert_eq!(decode_line(b"hello\r"), Some("hello".to_string()));
        assert_eq!(decode_line(b""), None);
        assert_eq!(decode_line(b"   \t"), None);
        assert_eq!(decode_line(b"\r"), None);
    }

    #[test]
    fn test_decode_line_replaces_invalid_utf8() {
        let line = decode_line(b"caf\xff joined the game").unwrap();
        assert!(line.starts_with("caf"));
        assert!(line.ends_with(" joined the game"));
    }
}
