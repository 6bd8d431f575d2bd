use turnaround_spider as spider;
use turnaround_spider::screener::finviz::Finviz;
use turnaround_spider::stock::yahoo_finance::YahooFinance;
use tracing::{debug, info};

/// Run the full screen and print the summary line.
pub(crate) async fn run(config: &spider::Config, tui: bool) -> anyhow::Result<()> {
    let time = std::time::Instant::now();

    // 1. build providers
    let http_client = spider::std_client_build(&config.api)?;
    let screener = Finviz::new(http_client.clone(), config.api.finviz_token.clone());
    let provider = YahooFinance::new(http_client);
    debug!("providers built");

    // 2. screen
    let table = spider::pipeline::run(&screener, &provider, config, tui).await?;

    let today = chrono::Utc::now().format("%Y-%m-%d");
    println!("Saved {} tickers on {today}", table.len());

    info!(
        "spider finished collecting data, time elapsed: {:?}",
        time.elapsed()
    );

    Ok(())
}
