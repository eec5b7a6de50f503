//! Query committed state.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct QueryArgs {
    /// Directory to store application data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Treat the input as `<method>|<json>` instead of base64
    #[arg(long)]
    plain: bool,

    /// Query to run
    query: String,
}

pub fn run(args: QueryArgs) -> Result<()> {
    let app = super::open_app(&args.data_dir)?;
    let result = app.query(&super::to_wire(&args.query, args.plain))?;

    match result.value {
        Some(value) => match serde_json::from_slice::<serde_json::Value>(&value) {
            Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => println!("{}", String::from_utf8_lossy(&value)),
        },
        None => {
            println!(
                "{}  {} {}",
                "∅".yellow().bold(),
                result.code.to_string().yellow(),
                result.log
            );
        }
    }
    Ok(())
}
