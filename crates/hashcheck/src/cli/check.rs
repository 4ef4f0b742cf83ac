use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use hashcheck_lookup::{
    BatchVerifier, BudgetGovernor, Orchestrator, ProgressMonitor, ReqwestClient, StatusSink, TermSink, Tone,
};
use hashcheck_verify::DigestAlgorithm;

use crate::config::Config;
use crate::{report, scan};

#[derive(Clone, Debug, Args)]
pub struct CheckArgs {
    /// Directory whose files are checked (not recursive).
    pub dir: PathBuf,

    /// Files per lookup request, 1 to 100.
    #[arg(short, long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// One file per request.
    #[arg(long)]
    pub legacy: bool,

    /// Digest algorithm sent to the catalog.
    #[arg(short, long, value_name = "ALGO")]
    pub algorithm: Option<DigestAlgorithm>,

    /// Only check files with this extension; repeatable.
    #[arg(short, long, value_name = "EXT")]
    pub ext: Vec<String>,

    /// Retries after a 429 before the run stops.
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,
}

pub async fn run_check(mut config: Config, args: &CheckArgs, colors: bool) -> Result<()> {
    config.apply_check_args(args)?;
    let files = scan::candidates(&args.dir, &config.extensions)?;

    let sink = Arc::new(TermSink::stdout(colors));
    sink.write_line(Tone::Info, &format!("Checking: {}", args.dir.display()));
    sink.write_line(Tone::Plain, "");

    if files.is_empty() {
        sink.write_line(Tone::Warn, "No files to check.");
        return Ok(());
    }

    let client = ReqwestClient::new(config.client_options()).context("failed to build HTTP client")?;
    let mut monitor = ProgressMonitor::new(sink.clone());
    let verifier = BatchVerifier::new(
        client,
        Arc::new(BudgetGovernor::default()),
        monitor.handle(),
        config.verify_options(),
    );
    let mut orchestrator = Orchestrator::new(verifier);

    monitor.start();
    let report = orchestrator.run(&files).await;
    monitor.stop().await;

    report::render_summary(sink.as_ref(), &report);
    report.into_result().context("verification stopped early")?;
    Ok(())
}
