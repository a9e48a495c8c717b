use std::time::Duration;

use anyhow::{Context, Result};
use platform_import::{DEFAULT_BASE_URL, DEFAULT_NATIONALITY, check_count};
use url::Url;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    pub import: ImportConfig,
}

/// Settings for the randomuser.me import source.
#[derive(Clone, Debug)]
pub struct ImportConfig {
    pub base_url: Url,
    pub nationality: String,
    pub timeout: Duration,
    pub default_count: i64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        let raw_url = lookup("RANDOMUSER_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let base_url = Url::parse(raw_url.trim())
            .with_context(|| format!("invalid RANDOMUSER_URL {raw_url:?}"))?;

        let nationality =
            lookup("RANDOMUSER_NAT").unwrap_or_else(|| DEFAULT_NATIONALITY.into());

        let timeout_secs = match lookup("IMPORT_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid IMPORT_TIMEOUT_SECS {raw:?}"))?,
            None => 10,
        };

        let default_count = match lookup("IMPORT_DEFAULT_COUNT") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("invalid IMPORT_DEFAULT_COUNT {raw:?}"))?,
            None => 5,
        };
        check_count(default_count).context("invalid IMPORT_DEFAULT_COUNT")?;

        Ok(Self {
            cors_allowed_origins,
            import: ImportConfig {
                base_url,
                nationality,
                timeout: Duration::from_secs(timeout_secs),
                default_count,
            },
        })
    }
}
