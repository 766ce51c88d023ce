use clap::{Parser, Subcommand};

pub mod database;
pub mod ethereum;
pub mod relayer;
pub mod service;

#[derive(Parser, Debug)]
#[command(
    name = "pong-relayer",
    about = "Pong Relayer - answers every Ping event of a PingPong contract with exactly one Pong",
    long_about = "Pong Relayer watches a PingPong contract for Ping events and submits one pong(bytes32) \
    transaction per Ping. Progress is persisted in MongoDB so that a restart resumes from where the \
    previous run stopped.",
    after_help = "Examples:\n  \
    pong-relayer run --ethereum-rpc-url https://eth-sepolia.g.alchemy.com/v2/<key> \\\n    \
    --contract-address 0x7D3a625977bFD7445466439E60C495bdc2855367"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the relayer service
    Run {
        #[command(flatten)]
        run_command: Box<RunCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct RunCmd {
    #[clap(flatten, next_help_heading = "Ethereum")]
    pub ethereum_args: ethereum::EthereumCliArgs,

    #[clap(flatten, next_help_heading = "MongoDB")]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,

    #[clap(flatten, next_help_heading = "Relayer")]
    pub relayer_args: relayer::RelayerCliArgs,

    #[clap(flatten, next_help_heading = "Service")]
    pub service_args: service::ServiceCliArgs,
}
