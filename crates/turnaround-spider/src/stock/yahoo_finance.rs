use super::{Annual, FinancialProvider, Financials, LineItem};
use crate::error::FetchError;
use crate::http::*;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

// timeseries = `https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries/{ticker}`
//
// annual statement rows are requested as `annual{Row}`, the market cap as `trailingMarketCap`

const MARKET_CAP: &str = "trailingMarketCap";

// ten years comfortably covers the four annual statements Yahoo publishes
const LOOKBACK_SECS: i64 = 10 * 365 * 24 * 60 * 60;

// a market cap older than roughly one quarter is treated as missing
const MARKET_CAP_MAX_AGE_DAYS: i64 = 92;

/////////////////////////////////////////////////////////////////////////////////
// core
/////////////////////////////////////////////////////////////////////////////////

pub struct YahooFinance {
    http_client: HttpClient,
    base_url: String,
}

impl YahooFinance {
    pub const BASE_URL: &'static str = "https://query2.finance.yahoo.com";

    pub fn new(http_client: HttpClient) -> Self {
        Self::with_base_url(http_client, Self::BASE_URL)
    }

    pub fn with_base_url(http_client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl FinancialProvider for YahooFinance {
    async fn financials(&self, ticker: &str) -> Result<Financials, FetchError> {
        let time = std::time::Instant::now();

        let types = LineItem::ALL
            .iter()
            .map(|item| yahoo_type(*item))
            .chain(std::iter::once(MARKET_CAP))
            .collect::<Vec<_>>()
            .join(",");
        let now = chrono::Utc::now();
        let period2 = now.timestamp();
        let period1 = period2 - LOOKBACK_SECS;
        let url = format!(
            "{base}/ws/fundamentals-timeseries/v1/finance/timeseries/{ticker}?symbol={ticker}&type={types}&period1={period1}&period2={period2}",
            base = self.base_url
        );

        // fetch raw http response
        trace!("fetching Yahoo Finance timeseries for [{ticker}]");
        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        // deserialize the response to JSON
        let bytes = response.bytes().await?;
        let de: TimeseriesResponse = serde_json::from_slice(&bytes)?;

        // transform deserialized response
        let financials = de.into_financials(ticker, now.date_naive())?;
        debug!(
            "Yahoo Finance timeseries collected for [{ticker}], {}",
            crate::time_elapsed(time)
        );

        Ok(financials)
    }
}

/// Timeseries `type` for each statement row.
fn yahoo_type(item: LineItem) -> &'static str {
    match item {
        LineItem::TotalRevenue => "annualTotalRevenue",
        LineItem::NetIncome => "annualNetIncome",
        LineItem::OperatingCashFlow => "annualOperatingCashFlow",
        LineItem::TotalDebt => "annualTotalDebt",
        LineItem::StockholderEquity => "annualStockholdersEquity",
    }
}

// de
// ----------------------------------------------------------------------------

// {
//   "timeseries": {
//     "result": [
//       {
//         "meta": { "symbol": ["ACME"], "type": ["annualTotalRevenue"] },
//         "timestamp": [1672444800, ...],
//         "annualTotalRevenue": [
//           { "asOfDate": "2022-12-31", "periodType": "12M", "currencyCode": "USD",
//             "reportedValue": { "raw": 100000000, "fmt": "100M" } },
//           null,
//           ...
//         ]
//       },
//       ...
//     ],
//     "error": null
//   }
// }
#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: Timeseries,
}

#[derive(Debug, Deserialize)]
struct Timeseries {
    result: Option<Vec<Series>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Series {
    meta: Meta,
    // the data lives under a key named after `meta.type[0]`
    #[serde(flatten)]
    rest: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(rename = "type")]
    kind: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataPoint {
    as_of_date: String,
    reported_value: ReportedValue,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    raw: f64,
}

impl TimeseriesResponse {
    fn into_financials(self, ticker: &str, today: NaiveDate) -> Result<Financials, FetchError> {
        let results = match (self.timeseries.result, self.timeseries.error) {
            (_, Some(err)) => {
                return Err(FetchError::Decode(format!(
                    "{} ({})",
                    err.description, err.code
                )))
            }
            (Some(results), None) => results,
            (None, None) => {
                return Err(FetchError::Decode(
                    "no results found within http response".to_string(),
                ))
            }
        };

        let mut financials = Financials::default();
        for mut series in results {
            let Some(kind) = series.meta.kind.first().cloned() else {
                continue;
            };

            // a type with no data only carries its `meta`
            let annuals = match series.rest.remove(&kind) {
                Some(value) => to_annuals(value)?,
                None => vec![],
            };

            match LineItem::ALL.iter().find(|item| yahoo_type(**item) == kind) {
                Some(item) => *financials.line_mut(*item) = annuals,
                None if kind == MARKET_CAP => {
                    financials.market_cap = latest_market_cap(&annuals, today, ticker)
                }
                None => warn!("unexpected timeseries type {kind} for [{ticker}]"),
            }
        }

        Ok(financials)
    }
}

fn latest_market_cap(points: &[Annual], today: NaiveDate, ticker: &str) -> Option<f64> {
    let latest = points.last()?;
    let age = (today - latest.as_of).num_days();
    if age > MARKET_CAP_MAX_AGE_DAYS {
        warn!(
            "market cap for [{ticker}] is {age} days old (as of {}), ignoring",
            latest.as_of
        );
        return None;
    }
    Some(latest.value)
}

fn to_annuals(value: serde_json::Value) -> Result<Vec<Annual>, FetchError> {
    let points: Vec<Option<DataPoint>> = serde_json::from_value(value)?;
    let mut annuals = points
        .into_iter()
        .flatten()
        .map(|point| -> Result<Annual, FetchError> {
            let as_of = NaiveDate::parse_from_str(&point.as_of_date, "%Y-%m-%d").map_err(|err| {
                FetchError::Decode(format!("invalid asOfDate {}, {err}", point.as_of_date))
            })?;
            Ok(Annual {
                as_of,
                value: point.reported_value.raw,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    annuals.sort_by_key(|annual| annual.as_of);
    Ok(annuals)
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
