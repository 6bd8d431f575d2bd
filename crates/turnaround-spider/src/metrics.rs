use crate::error::FetchError;
use crate::record::CandidateRecord;
use crate::stock::{FinancialProvider, Financials, LineItem};
use std::collections::BTreeMap;
use tracing::{debug, error, trace};

/// Providers report raw currency units; the table is in millions.
const MILLION: f64 = 1_000_000.0;

/// The result of fetching one ticker: a populated record, or the reason it was skipped.
#[derive(Debug)]
pub enum Outcome {
    Record(CandidateRecord),
    Skip { ticker: String, reason: FetchError },
}

/// Fetch and derive the metrics of a single ticker.
///
/// Never fails: every provider or data error is logged and turned into [`Outcome::Skip`].
pub async fn fetch_metrics<P>(provider: &P, ticker: &str) -> Outcome
where
    P: FinancialProvider + ?Sized,
{
    let time = std::time::Instant::now();

    trace!("fetching financials for [{ticker}]");
    let derived = match provider.financials(ticker).await {
        Ok(financials) => derive(ticker, &financials),
        Err(err) => Err(err),
    };

    match derived {
        Ok(record) => {
            debug!(
                "metrics derived for [{ticker}], {}",
                crate::time_elapsed(time)
            );
            Outcome::Record(record)
        }
        Err(reason) => {
            error!("skip [{ticker}], error({reason})");
            Outcome::Skip {
                ticker: ticker.to_string(),
                reason,
            }
        }
    }
}

/// Normalise a ticker's raw financials and compute its growth & leverage ratios.
///
/// Every figure is taken from the same three fiscal years: the latest three in which both
/// revenue and net income were reported. Cash flow and the balance sheet must cover the last.
pub fn derive(ticker: &str, financials: &Financials) -> Result<CandidateRecord, FetchError> {
    let (fiscal_years, revenue, net_income) = aligned_years(financials)?;
    let operating_cash_flow = in_year(financials, LineItem::OperatingCashFlow, fiscal_years[2])?;
    let debt = in_year(financials, LineItem::TotalDebt, fiscal_years[2])?;
    let equity = in_year(financials, LineItem::StockholderEquity, fiscal_years[2])?;

    let revenue = revenue.map(|value| value / MILLION);
    let net_income = net_income.map(|value| value / MILLION);

    Ok(CandidateRecord {
        ticker: ticker.to_string(),
        fiscal_years,
        revenue,
        net_income,
        operating_cash_flow_latest: operating_cash_flow / MILLION,
        debt_to_equity: ratio(debt / MILLION, equity / MILLION),
        revenue_cagr_3y: cagr(revenue[0], revenue[2]),
        net_income_cagr_3y: magnitude_cagr(net_income[0], net_income[2]),
        net_income_sign_change: sign_change(net_income[0], net_income[2]),
        market_cap: financials.market_cap.map(|cap| cap / MILLION),
    })
}

/// 2-period compound growth rate (%) from `first` to `last`; undefined unless `first > 0`.
pub fn cagr(first: f64, last: f64) -> Option<f64> {
    if first > 0.0 {
        finite(((last / first).sqrt() - 1.0) * 100.0)
    } else {
        None
    }
}

/// [`cagr`] over absolute values; undefined when `first` is zero.
///
/// A worsening loss (-10 -> -20) reads as growth, so this is a magnitude only.
pub fn magnitude_cagr(first: f64, last: f64) -> Option<f64> {
    if first != 0.0 {
        finite(((last.abs() / first.abs()).sqrt() - 1.0) * 100.0)
    } else {
        None
    }
}

/// `debt / equity`; undefined when equity is zero.
pub fn ratio(debt: f64, equity: f64) -> Option<f64> {
    if equity != 0.0 {
        finite(debt / equity)
    } else {
        None
    }
}

/// Loss in the first year, profit in the last.
pub fn sign_change(first: f64, last: f64) -> bool {
    first < 0.0 && last > 0.0
}

fn finite(value: f64) -> Option<f64> {
    Some(value).filter(|value| value.is_finite())
}

// the three most recent fiscal years reporting both revenue and net income, oldest first
fn aligned_years(financials: &Financials) -> Result<([i32; 3], [f64; 3], [f64; 3]), FetchError> {
    let revenue = by_year(financials, LineItem::TotalRevenue)?;
    let net_income = by_year(financials, LineItem::NetIncome)?;

    let shared: Vec<(i32, f64, f64)> = revenue
        .iter()
        .filter_map(|(year, rev)| net_income.get(year).map(|ni| (*year, *rev, *ni)))
        .collect();
    if shared.len() < 3 {
        return Err(FetchError::InsufficientHistory {
            item: LineItem::NetIncome,
            found: shared.len(),
        });
    }

    let window = &shared[shared.len() - 3..];
    Ok((
        [window[0].0, window[1].0, window[2].0],
        [window[0].1, window[1].1, window[2].1],
        [window[0].2, window[1].2, window[2].2],
    ))
}

// annual figures keyed (and ordered) by fiscal year; a later filing in the same year wins
fn by_year(financials: &Financials, item: LineItem) -> Result<BTreeMap<i32, f64>, FetchError> {
    let mut annuals = financials.line(item).to_vec();
    if annuals.len() < 3 {
        return Err(FetchError::InsufficientHistory {
            item,
            found: annuals.len(),
        });
    }
    annuals.sort_by_key(|annual| annual.as_of);

    Ok(annuals
        .into_iter()
        .map(|annual| (annual.fiscal_year(), annual.value))
        .collect())
}

fn in_year(financials: &Financials, item: LineItem, year: i32) -> Result<f64, FetchError> {
    financials
        .line(item)
        .iter()
        .filter(|annual| annual.fiscal_year() == year)
        .max_by_key(|annual| annual.as_of)
        .map(|annual| annual.value)
        .ok_or(FetchError::MissingLineItem(item))
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
