use crate::aggregate::aggregate;
use crate::config::Config;
use crate::filter::qualify;
use crate::output;
use crate::record::CandidateRecord;
use crate::screener::{list_candidates, Screener};
use crate::stock::FinancialProvider;
use tracing::info;

/// Screen → fetch → filter → write; returns the table that was written.
///
/// Only the screener and the final write may fail the run. Nothing is written when the
/// candidate list cannot be fetched.
pub async fn run<S, P>(
    screener: &S,
    provider: &P,
    config: &Config,
    tui: bool,
) -> anyhow::Result<Vec<CandidateRecord>>
where
    S: Screener + ?Sized,
    P: FinancialProvider + ?Sized,
{
    let time = std::time::Instant::now();

    // 1. candidate list
    let tickers = list_candidates(screener, &config.screener).await?;

    // 2. & 3. per-ticker metrics, aggregated
    let table = aggregate(provider, tickers, tui).await;

    // 4. qualification predicate
    let table = qualify(table, &config.filter);

    // 5. persist
    output::write(&table, &config.output)?;

    info!(
        "screen finished with {} tickers, {}",
        table.len(),
        crate::time_elapsed(time)
    );

    Ok(table)
}
