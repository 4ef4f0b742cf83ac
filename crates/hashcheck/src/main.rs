use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::cli::{App, Commands};
use crate::config::Config;
use crate::logging::Verbosity;

mod cli;
mod config;
mod logging;
mod report;
mod scan;

#[tokio::main]
async fn main() -> ExitCode {
    let app = App::parse();
    logging::init(Verbosity::from_flags(app.verbose, app.quiet), app.no_color);

    match run(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", console::style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(app: App) -> Result<()> {
    let config = Config::load(app.config.as_deref())?;
    let colors = !app.no_color;

    match &app.cmd {
        Commands::Check(args) => cli::run_check(config, args, colors).await,
        Commands::Limit => cli::run_limit(config, colors).await,
    }
}
