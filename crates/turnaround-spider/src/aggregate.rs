use crate::metrics::{fetch_metrics, Outcome};
use crate::record::CandidateRecord;
use crate::stock::FinancialProvider;
use crate::tui::{self, Progress};
use tracing::{error, info};

/// Fetch every ticker, one at a time, and collect the successful records in input order.
///
/// Skipped tickers are reported and dropped; one bad ticker never aborts the batch.
pub async fn aggregate<P>(provider: &P, tickers: Vec<String>, tui: bool) -> Vec<CandidateRecord>
where
    P: FinancialProvider + ?Sized,
{
    let time = std::time::Instant::now();
    let total = tickers.len();

    // progress bar
    let progress = if tui {
        tui::multi_progress(total).unwrap_or_else(|err| {
            error!("failed to build progress bars, error({err})");
            Progress::hidden()
        })
    } else {
        Progress::hidden()
    };

    info!("pulling data for {total} tickers ...");
    let mut table = Vec::with_capacity(total);
    for (i, ticker) in tickers.into_iter().enumerate() {
        progress.total.set_message(ticker.clone());
        match fetch_metrics(provider, &ticker).await {
            Outcome::Record(record) => {
                progress.success.inc(1);
                table.push(record);
            }
            Outcome::Skip { ticker, reason } => {
                progress.fails.inc(1);
                progress.println(format!("skip {ticker} {reason}"));
            }
        }
        progress.total.inc(1);
        info!("[{}/{total}] processed {ticker}", i + 1);
    }
    progress.finish();

    info!(
        "{} of {total} tickers collected, {}",
        table.len(),
        crate::time_elapsed(time)
    );

    table
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
