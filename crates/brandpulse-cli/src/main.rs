mod report;
mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "brandpulse-cli")]
#[command(about = "Brandpulse command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build an aggregate report from local row exports.
    Report {
        /// Directory holding `{slug}.{platform}.json` row exports.
        #[arg(long)]
        data_dir: PathBuf,
        /// Platform to report on: instagram or tiktok.
        #[arg(long)]
        platform: String,
        /// Report a single brand by slug; all brands when omitted.
        #[arg(long)]
        brand: Option<String>,
        /// Month selection, e.g. "March" or "All (Feb-May)".
        #[arg(long, default_value = "All")]
        month: String,
        /// Path to the brand roster.
        #[arg(long, default_value = "./config/brands.yaml")]
        brands: PathBuf,
    },
    /// Validate a brand roster file.
    Validate {
        /// Path to the brand roster.
        #[arg(long, default_value = "./config/brands.yaml")]
        brands: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Report {
            data_dir,
            platform,
            brand,
            month,
            brands,
        } => report::run_report(&data_dir, &platform, brand.as_deref(), &month, &brands).await,
        Commands::Validate { brands } => validate::run_validate(&brands),
    }
}
