use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

/// Fundamentals collected from the Yahoo Finance timeseries API; inspiration from Python's
/// [yfinance] library.
///
/// [yfinance]: https://github.com/ranaroussi/yfinance/
pub mod yahoo_finance;

/// Annual statement rows the screen depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineItem {
    TotalRevenue,
    NetIncome,
    OperatingCashFlow,
    TotalDebt,
    StockholderEquity,
}

impl LineItem {
    pub const ALL: [LineItem; 5] = [
        LineItem::TotalRevenue,
        LineItem::NetIncome,
        LineItem::OperatingCashFlow,
        LineItem::TotalDebt,
        LineItem::StockholderEquity,
    ];

    /// Row label, as printed on the statement.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TotalRevenue => "Total Revenue",
            Self::NetIncome => "Net Income",
            Self::OperatingCashFlow => "Total Cash From Operating Activities",
            Self::TotalDebt => "Total Debt",
            Self::StockholderEquity => "Total Stockholder Equity",
        }
    }
}

impl std::fmt::Display for LineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single annual figure, in raw currency units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annual {
    pub as_of: NaiveDate,
    pub value: f64,
}

impl Annual {
    pub fn fiscal_year(&self) -> i32 {
        self.as_of.year()
    }
}

/// Raw, un-normalised financials for one ticker, as handed over by a provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Financials {
    pub revenue: Vec<Annual>,
    pub net_income: Vec<Annual>,
    pub operating_cash_flow: Vec<Annual>,
    pub total_debt: Vec<Annual>,
    pub stockholder_equity: Vec<Annual>,
    pub market_cap: Option<f64>,
}

impl Financials {
    pub fn line(&self, item: LineItem) -> &[Annual] {
        match item {
            LineItem::TotalRevenue => &self.revenue,
            LineItem::NetIncome => &self.net_income,
            LineItem::OperatingCashFlow => &self.operating_cash_flow,
            LineItem::TotalDebt => &self.total_debt,
            LineItem::StockholderEquity => &self.stockholder_equity,
        }
    }

    pub fn line_mut(&mut self, item: LineItem) -> &mut Vec<Annual> {
        match item {
            LineItem::TotalRevenue => &mut self.revenue,
            LineItem::NetIncome => &mut self.net_income,
            LineItem::OperatingCashFlow => &mut self.operating_cash_flow,
            LineItem::TotalDebt => &mut self.total_debt,
            LineItem::StockholderEquity => &mut self.stockholder_equity,
        }
    }
}

/// A source of per-ticker annual statements and a market capitalisation snapshot.
#[async_trait]
pub trait FinancialProvider: Send + Sync {
    async fn financials(&self, ticker: &str) -> Result<Financials, FetchError>;
}
