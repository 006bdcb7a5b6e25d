use std::env;
use std::time::Duration;

use log::info;

/// Fixed per-probe timeout in seconds, applied to every tier.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Cap on simultaneous outbound connections shared by all tiers.
pub const DEFAULT_MAX_CONNECTIONS: usize = 100;

/// Cap on concurrent in-flight calls against the query API.
pub const DEFAULT_API_PERMITS: usize = 5;

/// Remote JSON document holding the link list.
pub const DEFAULT_SOURCE_URL: &str = "https://blog.xxfer.cn/flink.json";

/// Endpoint of the third-party query API.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.76.al/api/web/query";

/// Local CSV file holding the link list (`name,link` rows, no header).
pub const DEFAULT_CSV_PATH: &str = "./link.csv";

/// Report output path, fully overwritten each run.
pub const DEFAULT_OUTPUT_PATH: &str = "./result.json";

/// Browser-like identification header sent with every probe.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

const API_KEY_VAR: &str = "LIJIANGAPI_TOKEN";
const PROXY_URL_VAR: &str = "PROXY_URL";

/// Runtime configuration, resolved once at startup and passed down.
///
/// Tier availability is explicit here rather than read from the process
/// environment inside business logic: `proxy_base == None` disables the
/// proxy tier, `api_key == None` disables the API tier.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key for the query API; absence disables the API tier
    pub api_key: Option<String>,

    /// Proxy base URL, normalized to end with `/`; absence disables the
    /// proxy tier
    pub proxy_base: Option<String>,

    /// Per-probe timeout in seconds
    pub timeout: u64,

    /// Simultaneous outbound connections across all tiers
    pub max_connections: usize,

    /// Concurrent in-flight API calls
    pub api_permits: usize,

    /// Remote JSON link-list URL
    pub source_url: String,

    /// Query API endpoint
    pub api_endpoint: String,

    /// Local CSV link-list path
    pub csv_path: String,

    /// Report output path
    pub output_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            proxy_base: None,
            timeout: DEFAULT_TIMEOUT_SECONDS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            api_permits: DEFAULT_API_PERMITS,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            csv_path: DEFAULT_CSV_PATH.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// When the API token variable is unset the process is taken to be a
    /// local run and a `.env` file is loaded first; a deployed run gets
    /// both variables from the environment directly.
    pub fn from_env() -> Self {
        if env::var(API_KEY_VAR).is_err() {
            info!("{API_KEY_VAR} not set, loading .env for a local run");
            let _ = dotenvy::dotenv();
        } else {
            info!("{API_KEY_VAR} provided by the environment");
        }

        Self {
            api_key: non_empty(env::var(API_KEY_VAR).ok()),
            proxy_base: non_empty(env::var(PROXY_URL_VAR).ok())
                .map(|base| normalize_proxy_base(&base)),
            ..Self::default()
        }
    }

    /// Per-probe timeout as a Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Ensure the proxy base ends with a single path separator so the target
/// link can be appended directly.
pub fn normalize_proxy_base(base: &str) -> String {
    format!("{}/", base.trim_end_matches('/'))
}
