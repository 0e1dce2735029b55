use crate::error::{CompanyInsightError, Result};
use crate::format::DEFAULT_CURRENCY_SYMBOL;
use crate::pager::DEFAULT_PAGE_SIZE;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_API_URL: &str = "COMPANY_INSIGHT_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "COMPANY_INSIGHT_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "COMPANY_INSIGHT_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub page_size: u32,
    pub currency_symbol: String,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            page_size: DEFAULT_PAGE_SIZE,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl InsightConfig {
    /// Defaults overridden by whichever environment variables are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CompanyInsightError::InvalidConfig(format!("{} must be an integer, got '{}'", ENV_TIMEOUT_SECS, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            config.page_size = raw.trim().parse().map_err(|_| {
                CompanyInsightError::InvalidConfig(format!("{} must be an integer, got '{}'", ENV_PAGE_SIZE, raw))
            })?;
        }

        config.validate()?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(CompanyInsightError::InvalidConfig(
                "api_base_url must not be empty".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(CompanyInsightError::InvalidConfig(
                "page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
