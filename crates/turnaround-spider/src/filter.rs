use crate::config::FilterConfig;
use crate::record::CandidateRecord;
use tracing::debug;

/// Keep only the rows passing [`passes`], preserving order.
///
/// Idempotent: qualifying an already qualified table changes nothing.
pub fn qualify(table: Vec<CandidateRecord>, config: &FilterConfig) -> Vec<CandidateRecord> {
    let before = table.len();
    let table: Vec<CandidateRecord> = table
        .into_iter()
        .filter(|record| passes(record, config))
        .collect();
    debug!("{} of {before} candidates qualified", table.len());
    table
}

/// Growing AND inside the market-cap band AND (just turned profitable OR profitable now OR
/// near break-even). Undefined values fail.
pub fn passes(record: &CandidateRecord, config: &FilterConfig) -> bool {
    let growing = record
        .revenue_cagr_3y
        .is_some_and(|cagr| cagr >= config.min_revenue_cagr);

    let sized = record
        .market_cap
        .is_some_and(|cap| cap >= config.min_market_cap && cap <= config.max_market_cap);

    let latest = record.net_income_latest();
    let profitable = record.net_income_sign_change
        || latest > 0.0
        || (latest >= config.break_even_floor && latest <= config.break_even_ceiling);

    growing && sized && profitable
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
