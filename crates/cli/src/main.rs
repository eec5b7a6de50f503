//! didapp CLI entry point.

use clap::Parser;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "didapp")]
#[command(about = "Deterministic ledger application for message destinations and verification requests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(cmd) => {
            if let Err(e) = commands::run(cmd) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("didapp - deterministic ledger application");
            println!("Run 'didapp --help' for usage information.");
        }
    }
}
