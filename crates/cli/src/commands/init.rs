//! Initialize data directory command.

use crate::config::{init_logging, NodeConfig};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use didapp_app::Application;
use didapp_storage::Storage;
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to store application data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Default log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Skip flushing storage after each commit
    #[arg(long)]
    no_flush: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    println!("{}", "Initializing didapp...".bold().cyan());
    println!();

    fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", args.data_dir))?;
    println!("{}  Created data directory", "✓".green().bold());

    let config = NodeConfig {
        log_level: args.log_level,
        flush_on_commit: !args.no_flush,
    };
    init_logging(&config.log_level);

    let config_file = config.save(&args.data_dir)?;
    println!(
        "{}  Saved config to: {}",
        "✓".green().bold(),
        config_file.display().to_string().bright_black()
    );

    let storage = Storage::open(NodeConfig::db_path(&args.data_dir))
        .with_context(|| "Failed to open storage")?;
    let app = Application::new(storage, config.app_config())?;
    let info = app.info();

    println!("{}  Opened storage", "✓".green().bold());
    println!("    Height: {}", info.last_block_height.to_string().bright_cyan());
    println!("    App hash: {}", info.last_block_app_hash.to_hex().bright_yellow());

    println!();
    println!("{}", "Data directory ready!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  • Use {} to build a transaction",
        "didapp encode".bright_cyan()
    );
    println!(
        "  • Use {} to apply and commit a block",
        "didapp block".bright_cyan()
    );
    println!("  • Use {} to read state", "didapp query".bright_cyan());

    Ok(())
}
