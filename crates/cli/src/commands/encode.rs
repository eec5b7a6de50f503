//! Wire encoding and admission check commands.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use didapp_core::wire;
use std::path::PathBuf;

#[derive(Args)]
pub struct EncodeArgs {
    /// Method name, e.g. CreateRequest
    method: String,

    /// JSON params
    params: String,
}

pub fn run(args: EncodeArgs) -> Result<()> {
    serde_json::from_str::<serde_json::Value>(&args.params)
        .with_context(|| format!("Params are not valid JSON: {}", args.params))?;
    println!("{}", wire::encode(&args.method, &args.params));
    Ok(())
}

#[derive(Args)]
pub struct CheckArgs {
    /// Directory to store application data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Treat the input as `<method>|<json>` instead of base64
    #[arg(long)]
    plain: bool,

    /// Transaction to check
    tx: String,
}

pub fn check(args: CheckArgs) -> Result<()> {
    let app = super::open_app(&args.data_dir)?;
    let outcome = app.check_tx(&super::to_wire(&args.tx, args.plain));

    if outcome.is_ok() {
        println!("{}  Accepted", "✓".green().bold());
    } else {
        println!("{}  Rejected: {}", "✗".red().bold(), outcome.log);
    }
    Ok(())
}
