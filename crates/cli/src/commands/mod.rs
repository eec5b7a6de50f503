//! CLI commands module.

use crate::config::{init_logging, NodeConfig};
use anyhow::{Context, Result};
use clap::Subcommand;
use didapp_app::Application;
use didapp_core::wire;
use didapp_storage::Storage;
use std::path::Path;

mod block;
mod encode;
mod info;
mod init;
mod query;

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a data directory
    Init(init::InitArgs),
    /// Show the committed node state
    Info(info::InfoArgs),
    /// Encode a transaction or query for the wire
    Encode(encode::EncodeArgs),
    /// Run the admission check on a transaction
    Check(encode::CheckArgs),
    /// Deliver transactions as one block and commit it
    Block(block::BlockArgs),
    /// Query committed state
    Query(query::QueryArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init(args) => init::run(args),
        Commands::Info(args) => info::run(args),
        Commands::Encode(args) => encode::run(args),
        Commands::Check(args) => encode::check(args),
        Commands::Block(args) => block::run(args),
        Commands::Query(args) => query::run(args),
    }
}

/// Open the application stored in `data_dir`, installing logging first.
fn open_app(data_dir: &Path) -> Result<Application> {
    let config = NodeConfig::load(data_dir)?;
    init_logging(&config.log_level);

    let storage = Storage::open(NodeConfig::db_path(data_dir))
        .with_context(|| "Failed to open storage. Did you run 'didapp init'?")?;
    Application::new(storage, config.app_config()).with_context(|| "Failed to load node state")
}

/// Raw wire bytes for `input`: as given, or base64-encoded first if `plain`.
fn to_wire(input: &str, plain: bool) -> Vec<u8> {
    if plain {
        wire::encode_text(input).into_bytes()
    } else {
        input.trim().as_bytes().to_vec()
    }
}
