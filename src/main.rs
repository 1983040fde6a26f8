//! cm6206ctl
//!
//! Reads and controls the registers of USB sound cards built on the CM6206.

use clap::Parser;
use tracing::debug;

use cm6206ctl::{Config, OutputOptions};

mod cli;
use cli::Cli;

mod commands;
use commands::Settings;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;
    debug!("Config: {:?}", config);

    let settings = Settings::resolve(&cli, &config);

    if cli.list {
        return commands::utility::list(&settings.discovery()?);
    }

    let intent = cli
        .intent(config.init_table()?)
        .map_err(anyhow::Error::msg)?;
    let options = OutputOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        json: cli.json,
        style: settings.style,
    };

    commands::session::run(&settings, &intent, options)
}
