use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Search API endpoint, queried with `q` and `maxResults`
    #[serde(default = "default_search_api_url")]
    pub search_api_url: String,

    /// Downloader base URL; links take the form `<base>/<quality>/id=<id>`
    #[serde(default = "default_downloader_base_url")]
    pub downloader_base_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Max results used when the form value is missing or unparsable
    #[serde(default = "default_max_results")]
    pub default_max_results: u32,

    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,

    /// Delay between a download click and the link being opened
    #[serde(default = "default_download_open_delay_ms")]
    pub download_open_delay_ms: u64,

    /// Delay after which a download button returns to idle, counted from the click
    #[serde(default = "default_download_reset_ms")]
    pub download_reset_ms: u64,

    #[serde(default = "default_notice_ttl_ms")]
    pub notice_ttl_ms: u64,

    #[serde(default = "default_error_notice_ttl_ms")]
    pub error_notice_ttl_ms: u64,
}

fn default_search_api_url() -> String {
    "https://maytmsapi.onrender.com/search".to_string()
}

fn default_downloader_base_url() -> String {
    "https://88a114a8-1092-43f7-aa2e-391c2f3e4a2e-00-3jf34ufwuohjt.pike.replit.dev:3000"
        .to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_results() -> u32 {
    10
}

fn default_search_timeout_secs() -> u64 {
    20
}

fn default_download_open_delay_ms() -> u64 {
    300
}

fn default_download_reset_ms() -> u64 {
    2200
}

fn default_notice_ttl_ms() -> u64 {
    2200
}

fn default_error_notice_ttl_ms() -> u64 {
    2600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_api_url: default_search_api_url(),
            downloader_base_url: default_downloader_base_url(),
            host: default_host(),
            port: default_port(),
            default_max_results: default_max_results(),
            search_timeout_secs: default_search_timeout_secs(),
            download_open_delay_ms: default_download_open_delay_ms(),
            download_reset_ms: default_download_reset_ms(),
            notice_ttl_ms: default_notice_ttl_ms(),
            error_notice_ttl_ms: default_error_notice_ttl_ms(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn download_open_delay(&self) -> Duration {
        Duration::from_millis(self.download_open_delay_ms)
    }

    pub fn download_reset(&self) -> Duration {
        Duration::from_millis(self.download_reset_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn error_notice_ttl(&self) -> Duration {
        Duration::from_millis(self.error_notice_ttl_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
