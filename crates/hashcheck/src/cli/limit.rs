use std::sync::Arc;

use anyhow::{Context, Result};
use hashcheck_lookup::{BatchVerifier, BudgetGovernor, ProgressMonitor, ReqwestClient, TermSink};

use crate::config::Config;
use crate::report;

/// Probe the service once and print its rate budget.
pub async fn run_limit(config: Config, colors: bool) -> Result<()> {
    let sink = Arc::new(TermSink::stdout(colors));
    let client = ReqwestClient::new(config.client_options()).context("failed to build HTTP client")?;
    let monitor = ProgressMonitor::new(sink.clone());
    let mut verifier = BatchVerifier::new(
        client,
        Arc::new(BudgetGovernor::default()),
        monitor.handle(),
        config.verify_options(),
    );

    let snapshot = verifier
        .refresh_rate_snapshot()
        .await
        .context("failed to query the rate budget")?;
    report::render_limit(sink.as_ref(), &snapshot);
    Ok(())
}
