mod spider;

// remote imports
use dotenv::var;
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;
use turnaround_spider::Config;

////////////////////////////////////////////////////////////////////////////

// preprocess the trace level
fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // set the trace level, e.g. `TRACE=DEBUG`
    let trace_level = match var("TRACE") {
        Ok(level) => Some(level.parse::<Level>()?),
        Err(_) => None,
    };
    if let Some(trace_level) = trace_level {
        preprocess(trace_level)?;
    }
    let config = Config::from_env()?;
    trace!("thresholds loaded: {:?}", config.filter);

    // if no trace level provided, use tui
    let tui = trace_level.is_none();

    spider::run(&config, tui).await
}
