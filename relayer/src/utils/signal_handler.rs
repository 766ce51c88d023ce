use anyhow::{anyhow, Context as _, Result};
use std::future::Future;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[cfg(unix)]
use signal::unix::{signal, SignalKind};

/// Signal types that can trigger shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGTERM - Docker/Kubernetes graceful shutdown
    Terminate,
    /// SIGINT - Ctrl+C interactive shutdown
    Interrupt,
    /// SIGQUIT - Quit signal
    Quit,
    /// Internal - a service stopped on its own (e.g. the Ping listener could not resubscribe)
    Internal,
}

impl std::fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
            ShutdownSignal::Quit => write!(f, "SIGQUIT"),
            ShutdownSignal::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Turns OS signals into the cancellation of a shared [`CancellationToken`].
pub struct SignalHandler {
    shutdown_signal: Option<ShutdownSignal>,
    token: CancellationToken,
}

impl SignalHandler {
    pub fn new(token: CancellationToken) -> Self {
        Self { shutdown_signal: None, token }
    }

    /// Token cancelled once shutdown starts. Cancelling it from the outside counts as an internal shutdown.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for any shutdown signal, cancel the token and return which signal was received
    pub async fn wait_for_shutdown(&mut self) -> Result<ShutdownSignal> {
        let signal = self.wait_for_signal().await?;
        self.shutdown_signal = Some(signal);
        self.token.cancel();
        info!("Received shutdown signal: {}", signal);
        Ok(signal)
    }

    pub fn shutdown_signal(&self) -> Option<ShutdownSignal> {
        self.shutdown_signal
    }

    #[cfg(unix)]
    async fn wait_for_signal(&self) -> Result<ShutdownSignal> {
        let mut sigterm = signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint = signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
        let mut sigquit = signal(SignalKind::quit()).context("Failed to create SIGQUIT handler")?;

        Ok(tokio::select! {
            _ = sigterm.recv() => ShutdownSignal::Terminate,
            _ = sigint.recv() => ShutdownSignal::Interrupt,
            _ = sigquit.recv() => {
                warn!("Force quit signal received (SIGQUIT)");
                ShutdownSignal::Quit
            }
            _ = self.token.cancelled() => ShutdownSignal::Internal,
        })
    }

    #[cfg(not(unix))]
    async fn wait_for_signal(&self) -> Result<ShutdownSignal> {
        Ok(tokio::select! {
            res = signal::ctrl_c() => {
                res.context("Failed to listen for Ctrl+C")?;
                ShutdownSignal::Interrupt
            }
            _ = self.token.cancelled() => ShutdownSignal::Internal,
        })
    }

    /// Run `shutdown_fn` with a deadline. SIGQUIT turns a missed deadline into an immediate exit.
    pub async fn handle_graceful_shutdown<F, Fut>(&self, shutdown_fn: F, timeout: Duration) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let signal = self.shutdown_signal.unwrap_or(ShutdownSignal::Interrupt);
        info!(timeout_secs = timeout.as_secs(), "Starting graceful shutdown (triggered by: {})", signal);

        match tokio::time::timeout(timeout, shutdown_fn()).await {
            Ok(Ok(())) => {
                info!("Graceful shutdown completed");
                Ok(())
            }
            Ok(Err(e)) => {
                error!(error = %e, "Graceful shutdown failed");
                Err(e)
            }
            Err(_) => {
                error!("Graceful shutdown timed out after {} seconds", timeout.as_secs());
                if signal == ShutdownSignal::Quit {
                    warn!("SIGQUIT received - forcing immediate exit");
                    std::process::exit(1);
                }
                Err(anyhow!("Shutdown timeout exceeded"))
            }
        }
    }
}
