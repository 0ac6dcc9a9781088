//! Supervised subprocess pair
//!
//! Owns the long-lived children (cloudflared and the app dev server) with
//! inherited stdio, and kills all of them when the parent receives SIGINT
//! or SIGTERM.

use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::signal::unix::{signal, SignalKind};

/// Split a command line on whitespace. Enough for the dev-server invocations
/// this tool launches; there is no shell quoting.
pub fn parse_command(line: &str) -> Option<(String, Vec<String>)> {
    let mut parts = line.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

#[derive(Default)]
pub struct Supervisor {
    children: Vec<(String, Child)>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a child with inherited stdio. A spawn failure is logged and the
    /// child simply isn't supervised; the run continues.
    pub fn spawn(&mut self, name: &str, program: &str, args: &[String]) {
        tracing::info!("Starting {}...", name);
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        match command.spawn() {
            Ok(child) => self.children.push((name.to_string(), child)),
            Err(e) => tracing::error!("Failed to start {}: {}", name, e),
        }
    }

    /// Block until SIGINT or SIGTERM arrives, then stop every child.
    pub async fn supervise(mut self) -> anyhow::Result<()> {
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("SIGINT received, shutting down");
            }
            _ = sigterm.recv() => {
                tracing::info!("SIGTERM received, shutting down");
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Kill all children, best-effort, and reap them.
    pub async fn shutdown(&mut self) {
        for (name, child) in &mut self.children {
            if let Err(e) = child.start_kill() {
                tracing::debug!("Could not kill {}: {}", name, e);
            }
        }
        for (name, child) in &mut self.children {
            match child.wait().await {
                Ok(status) => tracing::info!("{} exited with {}", name, status),
                Err(e) => tracing::debug!("Could not reap {}: {}", name, e),
            }
        }
    }
}
