use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub company_id: Option<String>,
    pub timeout: Duration,
    pub page_size: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_or(None)
    }

    /// Load configuration, preferring an explicitly given API URL
    pub fn from_env_or(api_url: Option<String>) -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let api_url = match api_url {
            Some(url) => url,
            None => env::var("INVOICING_API_URL").context("INVOICING_API_URL must be set")?,
        };

        let config = Self {
            api_url,
            api_token: env::var("INVOICING_API_TOKEN").ok(),
            company_id: env::var("INVOICING_COMPANY_ID").ok(),
            timeout: Duration::from_secs(
                env::var("INVOICING_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("INVOICING_TIMEOUT_SECS must be a number of seconds")?,
            ),
            page_size: env::var("INVOICING_PAGE_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("INVOICING_PAGE_SIZE must be a positive number")?,
        };

        if config.page_size == 0 {
            bail!("INVOICING_PAGE_SIZE must be a positive number");
        }
        Ok(config)
    }

    /// Trimmed API base URL.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
