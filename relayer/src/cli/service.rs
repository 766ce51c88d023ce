use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct ServiceCliArgs {
    /// Seconds granted to an in-flight submission to finish once a shutdown signal is received.
    #[arg(env = "PONG_RELAYER_GRACEFUL_SHUTDOWN_TIMEOUT_SECS", long, default_value_t = 30)]
    pub graceful_shutdown_timeout_secs: u64,
}
