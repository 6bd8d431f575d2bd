use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use turnaround_spider::config::{Config, OutputConfig, ScreenerConfig};
use turnaround_spider::filter::qualify;
use turnaround_spider::metrics::{fetch_metrics, Outcome};
use turnaround_spider::screener::Screener;
use turnaround_spider::stock::{Annual, FinancialProvider, Financials};
use turnaround_spider::{pipeline, CandidateRecord, FetchError};

const MILLION: f64 = 1_000_000.0;

// -- IN-MEMORY PROVIDERS --

struct Canned(Vec<String>);

#[async_trait]
impl Screener for Canned {
    async fn screen(&self, _config: &ScreenerConfig) -> anyhow::Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

struct Unreachable;

#[async_trait]
impl Screener for Unreachable {
    async fn screen(&self, _config: &ScreenerConfig) -> anyhow::Result<Vec<String>> {
        Err(anyhow::anyhow!("failed to fetch Finviz screener"))
    }
}

#[derive(Default)]
struct Book(HashMap<String, Financials>);

impl Book {
    // figures in $M, fiscal years 2022..=2024
    fn with(mut self, ticker: &str, revenue: [f64; 3], net_income: [f64; 3], cap: f64) -> Self {
        let line = |values: &[f64]| -> Vec<Annual> {
            values
                .iter()
                .enumerate()
                .map(|(i, value)| Annual {
                    as_of: NaiveDate::from_ymd_opt(2022 + i as i32, 12, 31).unwrap(),
                    value: value * MILLION,
                })
                .collect()
        };
        self.0.insert(
            ticker.to_string(),
            Financials {
                revenue: line(&revenue),
                net_income: line(&net_income),
                operating_cash_flow: line(&[4.0, 8.0, 12.5]),
                total_debt: line(&[25.0, 28.0, 30.0]),
                stockholder_equity: line(&[100.0, 110.0, 120.0]),
                market_cap: Some(cap * MILLION),
            },
        );
        self
    }
}

#[async_trait]
impl FinancialProvider for Book {
    async fn financials(&self, ticker: &str) -> Result<Financials, FetchError> {
        self.0
            .get(ticker)
            .cloned()
            .ok_or_else(|| FetchError::Decode(format!("no timeseries for {ticker}")))
    }
}

fn scenarios() -> Book {
    Book::default()
        // 1. 40% CAGR, loss -> profit
        .with("TURN", [100.0, 140.0, 196.0], [-10.0, -2.0, 5.0], 5_000.0)
        // 2. ~8.6% CAGR
        .with("SLOW", [100.0, 110.0, 118.0], [10.0, 20.0, 30.0], 5_000.0)
        // 3. 25% CAGR, $500B
        .with("MEGA", [100.0, 125.0, 156.25], [10.0, 20.0, 30.0], 500_000.0)
        // 4. 30% CAGR, near break-even loss
        .with("NEAR", [100.0, 130.0, 169.0], [50.0, 40.0, -15.0], 5_000.0)
        // 5. 30% CAGR, loss below the break-even floor
        .with("DEEP", [100.0, 130.0, 169.0], [50.0, 40.0, -25.0], 5_000.0)
}

fn tickers(table: &[CandidateRecord]) -> Vec<&str> {
    table.iter().map(|record| record.ticker.as_str()).collect()
}

fn config_in(dir: &std::path::Path) -> Config {
    Config {
        output: OutputConfig {
            dir: dir.to_path_buf(),
            ..OutputConfig::default()
        },
        ..Config::default()
    }
}

// -- TESTS --

#[tokio::test]
async fn end_to_end_scenarios() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let screener = Canned(
        ["TURN", "SLOW", "GONE", "MEGA", "NEAR", "DEEP"]
            .iter()
            .map(|t| t.to_string())
            .collect(),
    );

    let table = pipeline::run(&screener, &scenarios(), &config, false)
        .await
        .unwrap();

    assert_eq!(tickers(&table), vec!["TURN", "NEAR"]);
    assert!(config.output.csv_path().exists());
    assert!(config.output.xlsx_path().exists());
}

#[tokio::test]
async fn fatal_screener_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let result = pipeline::run(&Unreachable, &scenarios(), &config, false).await;

    assert!(result.is_err());
    assert!(!config.output.csv_path().exists());
    assert!(!config.output.xlsx_path().exists());
}

#[tokio::test]
async fn unknown_ticker_is_skipped() {
    match fetch_metrics(&scenarios(), "GONE").await {
        Outcome::Skip { ticker, .. } => assert_eq!(ticker, "GONE"),
        Outcome::Record(record) => panic!("unexpected record {record:?}"),
    }
}

#[tokio::test]
async fn qualify_on_own_output_is_stable() {
    let book = scenarios();
    let mut table = vec![];
    for ticker in ["TURN", "SLOW", "MEGA", "NEAR", "DEEP"] {
        if let Outcome::Record(record) = fetch_metrics(&book, ticker).await {
            table.push(record);
        }
    }
    assert_eq!(table.len(), 5);

    let config = Config::default();
    let once = qualify(table, &config.filter);
    let twice = qualify(once.clone(), &config.filter);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let screener = Canned(vec!["TURN".to_string(), "NEAR".to_string()]);

    let table = pipeline::run(&screener, &scenarios(), &config, false)
        .await
        .unwrap();

    let mut reader = csv::Reader::from_path(config.output.csv_path()).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "Ticker");
    assert_eq!(&headers[1], "Rev_2022($M)");
    assert_eq!(&headers[12], "MarketCap($M)");

    let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
    assert_eq!(rows.len(), table.len());

    let number = |cell: &str| -> Option<f64> {
        if cell.is_empty() {
            None
        } else {
            Some(cell.parse().unwrap())
        }
    };
    let close = |a: Option<f64>, b: Option<f64>| match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() < 1e-9,
        (None, None) => true,
        _ => false,
    };

    for (row, record) in rows.iter().zip(&table) {
        assert_eq!(&row[0], record.ticker);
        for i in 0..3 {
            assert!(close(number(&row[1 + i]), Some(record.revenue[i])));
            assert!(close(number(&row[4 + i]), Some(record.net_income[i])));
        }
        assert!(close(number(&row[7]), Some(record.operating_cash_flow_latest)));
        assert!(close(number(&row[8]), record.debt_to_equity));
        assert!(close(number(&row[9]), record.revenue_cagr_3y));
        assert!(close(number(&row[10]), record.net_income_cagr_3y));
        assert_eq!(&row[11], if record.net_income_sign_change { "True" } else { "False" });
        assert!(close(number(&row[12]), record.market_cap));
    }
}

#[tokio::test]
async fn rerun_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let everything = Canned(vec!["TURN".to_string(), "NEAR".to_string()]);
    pipeline::run(&everything, &scenarios(), &config, false)
        .await
        .unwrap();

    let nothing = Canned(vec!["SLOW".to_string()]);
    let table = pipeline::run(&nothing, &scenarios(), &config, false)
        .await
        .unwrap();
    assert!(table.is_empty());

    let mut reader = csv::Reader::from_path(config.output.csv_path()).unwrap();
    assert_eq!(reader.records().count(), 0);
}
