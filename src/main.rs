//! billed - expense report client
//!
//! Lists bills, uploads proofs and sends new expense reports against the
//! Billed API, and replays front-end scenarios against a mock store.

use billed::{cli, commands, common::logging};
use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "billed", about = "Employee expense report client")]
#[command(version, long_about = None)]
struct Cli {
    /// Use the in-process fixture store instead of the API
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Test { verbose: true, .. }) {
        logging::init_verbose();
    } else {
        logging::init_cli();
    }

    let options = cli::Options { mock: cli.mock };

    if let Err(e) = cli::dispatch(cli.command, options).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
