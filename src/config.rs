use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REPORT_BASE_URL: &str = "https://api.rugcheck.xyz/v1";
pub const DEFAULT_NFT_BASE_URL: &str = "https://api.degencdn.com/v1";

/// Settings are read from `RUGSCAN_*` environment variables on top of the defaults below.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub report_base_url: String,
    pub nft_base_url: String,

    /// Per-request timeout applied to both providers
    pub request_timeout_secs: u64,
    /// Number of creator-token enrichment calls issued together
    pub enrichment_window: usize,
    /// How many creator tokens the view projects
    pub creator_tokens_preview: usize,

    pub api_host: String,
    pub api_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_base_url: DEFAULT_REPORT_BASE_URL.to_string(),
            nft_base_url: DEFAULT_NFT_BASE_URL.to_string(),
            request_timeout_secs: 20,
            enrichment_window: 5,
            creator_tokens_preview: 6,
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let defaults = Config::default();

        let settings = config::Config::builder()
            .set_default("report_base_url", defaults.report_base_url)?
            .set_default("nft_base_url", defaults.nft_base_url)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("enrichment_window", defaults.enrichment_window as u64)?
            .set_default("creator_tokens_preview", defaults.creator_tokens_preview as u64)?
            .set_default("api_host", defaults.api_host)?
            .set_default("api_port", defaults.api_port as u64)?
            .add_source(config::Environment::with_prefix("RUGSCAN").try_parsing(true))
            .build()
            .context("Failed to read RUGSCAN_* settings")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to parse RUGSCAN_* settings")?;

        if config.enrichment_window == 0 {
            anyhow::bail!("RUGSCAN_ENRICHMENT_WINDOW must be at least 1");
        }

        Ok(config)
    }

    /// Config pointing both providers at custom base URLs (fakes, staging).
    pub fn with_endpoints(report_base_url: &str, nft_base_url: &str) -> Self {
        Self {
            report_base_url: report_base_url.to_string(),
            nft_base_url: nft_base_url.to_string(),
            ..Self::default()
        }
    }
}
