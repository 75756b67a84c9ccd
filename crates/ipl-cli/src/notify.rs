//! Post-load notification. Best effort: a failure here never fails the run.

use std::process::{Command, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to spawn notify command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("notify command '{command}' exited with {status}")]
    ExitStatus { command: String, status: ExitStatus },

    #[error("notify command '{command}' did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("failed to wait for notify command '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Default bound on how long a notify command may run.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What a notifier is told about a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub run_id: String,
    /// Rows written by the load stage, when it ran in this invocation.
    pub rows_loaded: Option<usize>,
}

pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes the message to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            run_id = %notification.run_id,
            rows_loaded = ?notification.rows_loaded,
            "{}",
            notification.message
        );
        Ok(())
    }
}

/// Runs a shell command with the run details in its environment:
/// `IPL_ETL_MESSAGE`, `IPL_ETL_RUN_ID` and, when known, `IPL_ETL_ROWS_LOADED`.
///
/// The command is killed if it outlives its timeout.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    command: String,
    timeout: Duration,
}

impl CommandNotifier {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn wait_err(&self) -> impl FnOnce(std::io::Error) -> NotifyError {
        let command = self.command.clone();
        move |source| NotifyError::Wait { command, source }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(&self.command)
            .env("IPL_ETL_MESSAGE", &notification.message)
            .env("IPL_ETL_RUN_ID", &notification.run_id);
        if let Some(rows) = notification.rows_loaded {
            command.env("IPL_ETL_ROWS_LOADED", rows.to_string());
        }
        let mut child = command.spawn().map_err(|source| NotifyError::Spawn {
            command: self.command.clone(),
            source,
        })?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait().map_err(self.wait_err())? {
                break status;
            }
            if Instant::now() >= deadline {
                child.kill().map_err(self.wait_err())?;
                child.wait().map_err(self.wait_err())?;
                return Err(NotifyError::Timeout {
                    command: self.command.clone(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };
        if !status.success() {
            return Err(NotifyError::ExitStatus {
                command: self.command.clone(),
                status,
            });
        }
        info!(command = %self.command, "notification sent");
        Ok(())
    }
}
