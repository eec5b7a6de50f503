//! Show committed node state.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// Directory to store application data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let app = super::open_app(&args.data_dir)?;
    let info = app.info();

    println!();
    println!("{}", "Node State:".bold().cyan());
    println!("  Data:     {}", info.data);
    println!(
        "  Height:   {}",
        info.last_block_height.to_string().bright_cyan()
    );
    println!(
        "  App hash: {}",
        info.last_block_app_hash.to_hex().bright_yellow()
    );
    println!();
    Ok(())
}
