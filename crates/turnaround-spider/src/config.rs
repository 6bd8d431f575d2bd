use crate::http::var;
use std::path::PathBuf;
use std::time::Duration;

/// Minimum 5-year sales growth (%) requested from the screener.
pub const MIN_SALES_GROWTH_5Y: u32 = 20;

/// Minimum 3-year revenue CAGR (%) a candidate must reach.
pub const MIN_SALES_CAGR: f64 = 20.0;

/// Market capitalisation band, in $M.
pub const MIN_MARKET_CAP: f64 = 100.0;
pub const MAX_MARKET_CAP: f64 = 100_000.0;

/// Latest net income band (in $M) counted as "near break-even".
pub const BREAK_EVEN_FLOOR: f64 = -20.0;
pub const BREAK_EVEN_CEILING: f64 = 0.0;

/// File stem shared by the `.csv` and `.xlsx` outputs.
pub const OUTPUT_STEM: &str = "high_growth_turnaround_us_stocks";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a run needs, passed explicitly down the pipeline.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub screener: ScreenerConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Read the provider credentials from the environment (and `.env`); every threshold keeps
    /// its compiled-in default.
    pub fn from_env() -> anyhow::Result<Self> {
        let user_agent = var("USER_AGENT")
            .map_err(|err| anyhow::anyhow!("environment variable USER_AGENT, error({err})"))?;
        let finviz_token = var("FINVIZ_API")
            .map_err(|err| anyhow::anyhow!("environment variable FINVIZ_API, error({err})"))?;

        Ok(Self {
            api: ApiConfig {
                user_agent,
                finviz_token,
                ..ApiConfig::default()
            },
            ..Self::default()
        })
    }
}

/// HTTP credentials & limits shared by both providers.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub user_agent: String,
    pub finviz_token: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            finviz_token: String::new(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Finviz market capitalisation buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapBucket {
    Nano,
    Micro,
    Small,
    Mid,
    Large,
    Mega,
}

impl CapBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nano => "nano",
            Self::Micro => "micro",
            Self::Small => "small",
            Self::Mid => "mid",
            Self::Large => "large",
            Self::Mega => "mega",
        }
    }
}

/// The static screener query: all three predicates are conjunctive.
#[derive(Clone, Debug)]
pub struct ScreenerConfig {
    pub min_sales_growth_5y: u32,
    pub cap_floor: CapBucket,
    pub cap_ceiling: CapBucket,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            min_sales_growth_5y: MIN_SALES_GROWTH_5Y,
            cap_floor: CapBucket::Small,
            cap_ceiling: CapBucket::Mega,
        }
    }
}

/// Thresholds of the qualification predicate; all monetary bounds are in $M and inclusive.
#[derive(Clone, Debug)]
pub struct FilterConfig {
    pub min_revenue_cagr: f64,
    pub min_market_cap: f64,
    pub max_market_cap: f64,
    pub break_even_floor: f64,
    pub break_even_ceiling: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_revenue_cagr: MIN_SALES_CAGR,
            min_market_cap: MIN_MARKET_CAP,
            max_market_cap: MAX_MARKET_CAP,
            break_even_floor: BREAK_EVEN_FLOOR,
            break_even_ceiling: BREAK_EVEN_CEILING,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            stem: OUTPUT_STEM.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(format!("{}.csv", self.stem))
    }

    pub fn xlsx_path(&self) -> PathBuf {
        self.dir.join(format!("{}.xlsx", self.stem))
    }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
