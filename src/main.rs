mod api;
mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use api::AnalyticsClient;
use app::{CommandContext, run};
use cli::Cli;
use config::{Config, ConfigOrigin};
use error::AppError;
use output::NumberFormat;
use utils::Timezone;

fn init_logging(debug: bool) {
    let default_level = if debug { "shopstats=debug" } else { "shopstats=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_context(cli: &Cli) -> Result<CommandContext<'_>, AppError> {
    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    let number_format = NumberFormat::from_locale(cli.locale.as_deref())?;
    let client = AnalyticsClient::new(cli.base_url(), cli.token.clone(), cli.timeout())?;
    Ok(CommandContext {
        cli,
        client,
        timezone,
        number_format,
    })
}

fn main() {
    let loaded = Config::load();
    let cli = Cli::parse().with_config(&loaded.config);

    init_logging(cli.debug);
    match &loaded.origin {
        ConfigOrigin::File(path) => tracing::debug!(path = %path.display(), "loaded config"),
        ConfigOrigin::Defaults => tracing::debug!("no config file found, using defaults"),
    }
    for problem in &loaded.problems {
        tracing::warn!(path = %problem.path.display(), error = %problem.error, "failed to parse config");
    }

    let result = build_context(&cli).and_then(|ctx| run(&ctx));
    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
