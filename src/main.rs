use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};

use journalier::accounting::entries::piece_totals;
use journalier::config::JournalConfig;
use journalier::data;

#[derive(Parser, Debug)]
#[command(name = "journalier", version, about = "Turn an order export into daily sales journal entries")]
struct Cli {
    /// Order export (CSV)
    #[arg(default_value = "orders_export.csv")]
    input: PathBuf,

    /// Journal file, `<input>_journal.csv` next to the input by default
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// TOML file overriding journal code, accounts, rates or delimiters
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => JournalConfig::load(path).with_context(|| format!("invalid config {}", path.display()))?,
        None => JournalConfig::default(),
    };

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if !cli.input.exists() {
        bail!("file not found: {}", cli.input.display());
    }

    let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
    info!("journal {} into {}", config.journal_code, output.display());

    let journal = data::process_file(&cli.input, &output, &config)
        .with_context(|| format!("failed to convert {}", cli.input.display()))?;

    let summary = journal.summary;
    if summary.undated_orders > 0 {
        warn!("{} orders have no usable date and were left out", summary.undated_orders);
    }
    for (piece, totals) in piece_totals(&journal.entries) {
        if !totals.is_balanced() {
            warn!("piece {} is unbalanced: debit {} credit {}", piece, totals.debit, totals.credit);
        }
    }

    let name = cli.input.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    println!("✓ Read {} orders from {}", summary.orders, name);
    println!("✓ Generated {} entries for {} days", summary.entries, summary.days);
    println!("✓ Output: {}", output.display());

    Ok(())
}

/// `orders.csv` -> `orders_journal.csv`
fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    match input.extension() {
        Some(ext) => input.with_file_name(format!("{}_journal.{}", stem, ext.to_string_lossy())),
        None => input.with_file_name(format!("{}_journal", stem)),
    }
}
