/// One row of the screening table: a ticker whose financials were fetched and derived.
///
/// Monetary values are in millions; yearly arrays run oldest (`[0]`) to newest (`[2]`).
/// Undefined ratios are `None` and never satisfy a threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateRecord {
    pub ticker: String,
    pub fiscal_years: [i32; 3],
    pub revenue: [f64; 3],
    pub net_income: [f64; 3],
    pub operating_cash_flow_latest: f64,
    pub debt_to_equity: Option<f64>,
    pub revenue_cagr_3y: Option<f64>,
    /// Growth of |net income|; reported only, never screened on.
    pub net_income_cagr_3y: Option<f64>,
    pub net_income_sign_change: bool,
    pub market_cap: Option<f64>,
}

impl CandidateRecord {
    pub fn net_income_latest(&self) -> f64 {
        self.net_income[2]
    }
}
