//! xq-runner - runs the XQ Keeper workflow tests

use clap::Parser;
use xq_keeper::commands::Commands;
use xq_keeper::common::logging;
use xq_keeper::testing;

#[derive(Parser)]
#[command(name = "xq-runner", about = "Workflow test runner for the xq-fitness services")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_runner();

    let cli = Cli::parse();

    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match testing::dispatch(cli.command, &root).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
