//! Deliver a block of transactions and commit it.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct BlockArgs {
    /// Directory to store application data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Treat inputs as `<method>|<json>` instead of base64
    #[arg(long)]
    plain: bool,

    /// Read transactions from a file, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Transactions, in block order
    txs: Vec<String>,
}

pub fn run(args: BlockArgs) -> Result<()> {
    let mut txs = args.txs;
    if let Some(path) = &args.file {
        txs.extend(read_lines(path)?);
    }
    if txs.is_empty() {
        bail!("No transactions given. Pass them as arguments or with --file.");
    }

    let mut app = super::open_app(&args.data_dir)?;

    println!();
    println!("{}", "Delivering block:".bold().cyan());
    println!();

    let mut accepted = 0;
    for (i, tx) in txs.iter().enumerate() {
        let outcome = app.deliver_tx(&super::to_wire(tx, args.plain))?;
        if outcome.is_ok() {
            accepted += 1;
            println!(
                "  {} {}  {}",
                format!("#{}", i).bright_black(),
                "✓".green().bold(),
                outcome.log
            );
        } else {
            println!(
                "  {} {}  {} {}",
                format!("#{}", i).bright_black(),
                "✗".red().bold(),
                outcome.code.to_string().red(),
                outcome.log
            );
        }
    }

    let digest = app.commit().with_context(|| "Failed to commit block")?;
    let info = app.info();

    println!();
    println!(
        "{}  Committed block {} ({}/{} txs accepted)",
        "✓".green().bold(),
        info.last_block_height.to_string().bright_cyan(),
        accepted,
        txs.len()
    );
    println!("    App hash: {}", digest.to_hex().bright_yellow());
    println!("    {}", info.data.bright_black());
    println!();
    Ok(())
}

/// Non-empty, non-comment lines of a transaction file.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transactions: {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_lines_skips_blanks_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("txs.txt");
        fs::write(
            &path,
            "# block 1\nCreateRequest|{}\n\n  GetRequest|{}  \n",
        )
        .unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines, vec!["CreateRequest|{}", "GetRequest|{}"]);
    }
}
