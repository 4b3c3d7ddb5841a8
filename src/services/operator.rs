// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Operator-facing capabilities: console input and opening a browser.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::process::{Command, Stdio};
use std::thread;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Something that can ask the operator for a line of text.
#[async_trait]
pub trait OperatorInput: Send + Sync {
    /// Show `message` and return the operator's reply (without trailing newline).
    async fn prompt(&self, message: &str) -> Result<String>;
}

/// Reads replies from stdin, writes prompts to stdout.
///
/// Create one at the top level and share it; stdin is buffered here.
pub struct ConsoleInput {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperatorInput for ConsoleInput {
    async fn prompt(&self, message: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(message.as_bytes()).await?;
        stdout.flush().await?;

        let mut lines = self.lines.lock().await;
        match lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stdin closed while waiting for operator input",
            ))),
        }
    }
}

/// Opens URLs for the operator.
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Launches the platform's default URL handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        let mut command = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut c = Command::new("rundll32");
            c.arg("url.dll,FileProtocolHandler");
            c
        } else {
            Command::new("xdg-open")
        };

        command.arg(url);
        spawn_reaped(&mut command).map(|_| ())
    }
}

/// Spawn `command` detached from our stdio, with a thread that waits on it
/// so the exited opener does not linger as a zombie.
fn spawn_reaped(command: &mut Command) -> std::io::Result<thread::JoinHandle<()>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(thread::spawn(move || {
        if let Err(e) = child.wait() {
            tracing::debug!(error = %e, "Browser opener wait failed");
        }
    }))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_opener_is_reaped() {
        let handle = spawn_reaped(&mut Command::new("true")).unwrap();
        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_missing_opener_is_error() {
        let result = spawn_reaped(&mut Command::new("/nonexistent/strava-rides-opener"));
        assert!(result.is_err());
    }
}
