//! `bibmarc` command line: convert the translations spreadsheet to MARC21.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bibmarc::{convert, Overrides, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "bibmarc",
    version,
    about = "Convert the Italian translations bibliography to MARC21 (ISO 2709)"
)]
struct Cli {
    /// Settings file (TOML); defaults to ./bibmarc.toml when present
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV export of the translations spreadsheet
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// ISO 2709 file to write
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Authority CSV with nkc_id and cz_dates columns
    #[arg(long, value_name = "FILE")]
    authority: Option<PathBuf>,

    /// Prior catalog (ISO 2709) holding known original-work identifiers
    #[arg(long, value_name = "FILE")]
    reference: Option<PathBuf>,

    /// Seed for reproducible identifier minting
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Overrides {
            config_file: cli.config,
            input: cli.input,
            output: cli.output,
            authority: cli.authority,
            reference: cli.reference,
            seed: cli.seed,
            log_level: cli.log_level,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let overrides = Overrides::from(Cli::parse());
    let settings = Settings::load(&overrides).context("Failed to load settings")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bibmarc={}", settings.log_level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting bibmarc v{}", env!("CARGO_PKG_VERSION"));
    let summary = convert(&settings).with_context(|| {
        format!(
            "Failed to convert {} to {}",
            settings.input.display(),
            settings.output.display()
        )
    })?;

    if summary.is_clean() {
        tracing::info!("{summary}");
    } else {
        tracing::warn!("{summary}");
    }
    Ok(())
}
