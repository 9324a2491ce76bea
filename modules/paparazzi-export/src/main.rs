use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use paparazzi_export::export_screenshots;

#[derive(Parser)]
#[command(
    name = "paparazzi-export",
    about = "Export Paparazzi report images to stable, human-friendly filenames"
)]
struct Cli {
    /// Paparazzi report directory
    #[arg(long, default_value = "app/build/reports/paparazzi/debug")]
    report_dir: PathBuf,

    /// Output directory
    #[arg(long, default_value = "artifacts/screenshots/paparazzi")]
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let summary = export_screenshots(&cli.report_dir, &cli.out)?;

    println!(
        "Exported {} screenshot(s) to {}",
        summary.exported.len(),
        summary.out_dir.display()
    );
    Ok(())
}
