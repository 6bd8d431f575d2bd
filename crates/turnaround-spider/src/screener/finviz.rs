use super::Screener;
use crate::config::ScreenerConfig;
use crate::http::*;
use anyhow::Context;
use async_trait::async_trait;
use tracing::{error, trace};

// export = `https://elite.finviz.com/export.ashx?v=111&f={filters}&auth={token}`
//
// the export is a CSV table of the screener "Overview" view:
// "No.","Ticker","Company","Sector","Industry","Country","Market Cap","P/E","Price","Change","Volume"

pub struct Finviz {
    http_client: HttpClient,
    base_url: String,
    token: String,
}

impl Finviz {
    pub const BASE_URL: &'static str = "https://elite.finviz.com";

    pub fn new(http_client: HttpClient, token: impl Into<String>) -> Self {
        Self::with_base_url(http_client, token, Self::BASE_URL)
    }

    pub fn with_base_url(
        http_client: HttpClient,
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

/// Finviz filter codes for the screen, e.g. `fa_sales5years_o20`, `cap_smallover`,
/// `cap_megaunder`.
pub fn filter_codes(config: &ScreenerConfig) -> Vec<String> {
    vec![
        format!("fa_sales5years_o{}", config.min_sales_growth_5y),
        format!("cap_{}over", config.cap_floor.as_str()),
        format!("cap_{}under", config.cap_ceiling.as_str()),
    ]
}

#[async_trait]
impl Screener for Finviz {
    async fn screen(&self, config: &ScreenerConfig) -> anyhow::Result<Vec<String>> {
        let url = format!(
            "{base}/export.ashx?v=111&f={filters}&auth={token}",
            base = self.base_url,
            filters = filter_codes(config).join(","),
            token = self.token,
        );

        trace!("fetching Finviz screener export");
        let body = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|err| {
                // the url carries the auth token
                let err = err.without_url();
                error!("failed to fetch Finviz screener, error({err})");
                err
            })?
            .error_for_status()
            .map_err(|err| {
                let err = err.without_url();
                error!("Finviz screener refused the request, error({err})");
                err
            })?
            .text()
            .await
            .map_err(|err| err.without_url())?;

        parse_export(&body)
    }
}

/// Read the `Ticker` column out of a Finviz CSV export.
pub fn parse_export(body: &str) -> anyhow::Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let column = reader
        .headers()
        .context("failed to read Finviz export headers")?
        .iter()
        .position(|header| header == "Ticker")
        .ok_or_else(|| anyhow::anyhow!("Finviz export has no Ticker column"))?;

    let mut tickers = vec![];
    for record in reader.records() {
        let record = record.context("malformed Finviz export row")?;
        let ticker = record
            .get(column)
            .ok_or_else(|| anyhow::anyhow!("Finviz export row is missing its Ticker cell"))?;
        tickers.push(ticker.to_string());
    }

    Ok(tickers)
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_screen_filter_codes() {
        assert_eq!(
            filter_codes(&ScreenerConfig::default()),
            vec!["fa_sales5years_o20", "cap_smallover", "cap_megaunder"]
        );
    }

    #[test]
    fn export_without_ticker_column_is_rejected() {
        let body = "\"No.\",\"Company\"\n\"1\",\"Acme Corp\"\n";
        assert!(parse_export(body).is_err());
    }

    #[test]
    fn export_tickers_in_order() {
        let body = "\"No.\",\"Ticker\",\"Company\"\n\"1\",\"ZETA\",\"Zeta\"\n\"2\",\"ACME\",\"Acme\"\n";
        assert_eq!(parse_export(body).unwrap(), vec!["ZETA", "ACME"]);
    }
}
