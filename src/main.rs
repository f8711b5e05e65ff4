use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aidan_eval::cli::{Cli, Command};
use aidan_eval::plot::density::{render_density, DENSITY_FIGURE};
use aidan_eval::plot::methods::{render_methods, METHODS_FIGURE};
use aidan_eval::plot::violin::{render_violin, VIOLIN_FIGURE};
use aidan_eval::stats::BootstrapConfig;
use aidan_eval::{archive, report};

/// Initialize the tracing subscriber.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let table = archive::load_results(&cli.archive)?;
    table.validate()?;
    info!("loaded {} result rows from {}", table.len(), cli.archive.display());

    std::fs::create_dir_all(&cli.out_dir)?;

    let mut boot = BootstrapConfig::new(cli.boot_samples);
    if let Some(seed) = cli.seed {
        boot = boot.with_seed(seed);
    }

    match cli.command {
        Command::Report => report::write_reports(&table, &cli.out_dir, &boot)?,
        Command::Density => render_density(&table, &cli.out_dir.join(DENSITY_FIGURE))?,
        Command::Violin => render_violin(&table, &cli.out_dir.join(VIOLIN_FIGURE))?,
        Command::Methods => render_methods(&table, &cli.out_dir.join(METHODS_FIGURE))?,
        Command::All => {
            report::write_reports(&table, &cli.out_dir, &boot)?;
            render_density(&table, &cli.out_dir.join(DENSITY_FIGURE))?;
            render_violin(&table, &cli.out_dir.join(VIOLIN_FIGURE))?;
            render_methods(&table, &cli.out_dir.join(METHODS_FIGURE))?;
        }
    }

    Ok(())
}
