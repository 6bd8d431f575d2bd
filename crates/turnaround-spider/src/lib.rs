pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod screener;
pub mod stock;
mod tui;

pub use config::Config;
pub use error::FetchError;
pub use record::CandidateRecord;

/// Shortcut for required API elements.
pub mod http {
    pub use dotenv::var;
    pub use reqwest::Client as HttpClient;
}

/// Build the standard HTTP client used by every provider; Yahoo Finance rejects requests
/// without a browser-like `USER_AGENT`.
pub fn std_client_build(api: &config::ApiConfig) -> anyhow::Result<http::HttpClient> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(&api.user_agent)
        .timeout(api.timeout)
        .build()?;
    Ok(client)
}

pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:?}", time.elapsed())
}
