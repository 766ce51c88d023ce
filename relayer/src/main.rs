use clap::Parser as _;
use dotenvy::dotenv;
use pong_relayer::cli::{Cli, Commands, RunCmd};
use pong_relayer::core::config::Config;
use pong_relayer::engine::Relayer;
use pong_relayer::utils::logging::init_logging;
use pong_relayer::utils::signal_handler::SignalHandler;
use pong_relayer::worker::PingListener;
use pong_relayer::{RelayerError, RelayerResult};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();
    info!("Starting pong relayer");
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { run_command } => {
            debug!("Executing run command with args: {:?}", run_command);
            if let Err(e) = run_relayer(run_command).await {
                error!(
                    error = %e,
                    error_chain = ?e,
                    "Pong relayer stopped with an error"
                );
                std::process::exit(1);
            }
            info!("Pong relayer stopped");
        }
    }
}

async fn run_relayer(run_cmd: &RunCmd) -> RelayerResult<()> {
    let config = Arc::new(Config::from_run_cmd(run_cmd).await?);
    debug!("Configuration initialized");

    let shutdown = CancellationToken::new();
    let mut signal_handler = SignalHandler::new(shutdown.clone());
    let relayer = Relayer::new(config, shutdown.clone());

    let startup = relayer.bootstrap().await?;
    info!(
        initialised = startup.initialised,
        requeued = startup.requeued,
        drain_started = startup.drain_started,
        "Startup reconciliation finished"
    );

    let listener = PingListener::new(Arc::clone(&relayer), shutdown.clone());
    let listener_token = shutdown.clone();
    let listener = tokio::spawn(async move {
        let result = listener.run().await;
        // The listener only returns on its own when it cannot go on, bring the process down with it.
        listener_token.cancel();
        result
    });

    signal_handler.wait_for_shutdown().await?;

    let timeout = Duration::from_secs(run_cmd.service_args.graceful_shutdown_timeout_secs);
    let draining = Arc::clone(&relayer);
    signal_handler
        .handle_graceful_shutdown(
            move || async move {
                draining.wait_idle(IDLE_POLL_INTERVAL).await;
                Ok(())
            },
            timeout,
        )
        .await?;

    match listener.await {
        Ok(result) => result.map_err(RelayerError::from),
        Err(join_error) => Err(RelayerError::Other(anyhow::Error::from(join_error))),
    }
}
