use crate::config::ScreenerConfig;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// [Finviz Elite export](https://finviz.com/help/screener.ashx)
pub mod finviz;

/// An external stock screener: one query, one list of ticker symbols.
#[async_trait]
pub trait Screener: Send + Sync {
    async fn screen(&self, config: &ScreenerConfig) -> anyhow::Result<Vec<String>>;
}

/// List every ticker matching the static screen, in provider order.
///
/// Any failure here is fatal for the run; there is no partial candidate list.
pub async fn list_candidates<S>(screener: &S, config: &ScreenerConfig) -> anyhow::Result<Vec<String>>
where
    S: Screener + ?Sized,
{
    let time = std::time::Instant::now();

    info!("fetching screener candidates ...");
    let raw = screener.screen(config).await?;
    let found = raw.len();

    let tickers: Vec<String> = raw
        .into_iter()
        .map(|ticker| ticker.trim().to_string())
        .filter(|ticker| !ticker.is_empty())
        .collect();
    if tickers.len() < found {
        warn!("dropped {} blank ticker(s) from screener", found - tickers.len());
    }

    debug!(
        "{} screener candidates listed, {}",
        tickers.len(),
        crate::time_elapsed(time)
    );

    Ok(tickers)
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Vec<&'static str>);

    #[async_trait]
    impl Screener for Canned {
        async fn screen(&self, _config: &ScreenerConfig) -> anyhow::Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct Down;

    #[async_trait]
    impl Screener for Down {
        async fn screen(&self, _config: &ScreenerConfig) -> anyhow::Result<Vec<String>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn keeps_provider_order_and_drops_blanks() {
        let screener = Canned(vec!["ZETA", " ", "ACME", "", " BETA "]);
        let tickers = list_candidates(&screener, &ScreenerConfig::default())
            .await
            .unwrap();
        assert_eq!(tickers, vec!["ZETA", "ACME", "BETA"]);
    }

    #[tokio::test]
    async fn unreachable_screener_is_fatal() {
        let result = list_candidates(&Down, &ScreenerConfig::default()).await;
        assert!(result.is_err());
    }
}
