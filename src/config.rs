use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub(crate) const DEFAULT_CURRENCY: &str = "USD";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub(crate) api_url: String,
    /// ISO 4217 code, upper-case.
    pub(crate) currency: String,
    pub(crate) token: Option<String>,
    pub(crate) timeout_secs: u64,
    pub(crate) log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            currency: DEFAULT_CURRENCY.into(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_path: None,
        }
    }
}

/// Optional `config.json` in the platform config directory.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    currency: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

/// Global flags lifted off the command line before dispatch.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) api_url: Option<String>,
    pub(crate) currency: Option<String>,
}

impl Overrides {
    /// Remove `--api-url <url>` and `--currency <code>` from `args`.
    pub(crate) fn take_from(args: &mut Vec<String>) -> Result<Self> {
        let mut overrides = Self::default();
        let mut i = 1;
        while i < args.len() {
            let slot = match args[i].as_str() {
                "--api-url" => &mut overrides.api_url,
                "--currency" => &mut overrides.currency,
                _ => {
                    i += 1;
                    continue;
                }
            };
            if i + 1 >= args.len() {
                anyhow::bail!("Missing value for {}", args[i]);
            }
            let value = args.remove(i + 1);
            args.remove(i);
            *slot = Some(value);
        }
        Ok(overrides)
    }
}

impl Config {
    /// Defaults, then `config.json`, then `BUDGETVIEW_*` env vars, then flags.
    pub(crate) fn load(overrides: Overrides) -> Result<Self> {
        let dirs = directories::ProjectDirs::from("com", "budgetview", "budgetview");
        let file = dirs.as_ref().map(|d| d.config_dir().join("config.json"));
        let mut config = Self::resolve(file.as_deref(), |key| std::env::var(key).ok(), overrides)?;
        config.log_path = dirs.map(|d| d.data_dir().join("budgetview.log"));
        Ok(config)
    }

    pub(crate) fn resolve(
        file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        overrides: Overrides,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = file.filter(|p| p.exists()) {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let parsed: FileConfig = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid config file: {}", path.display()))?;
            if let Some(url) = parsed.api_url {
                config.api_url = url;
            }
            if let Some(code) = parsed.currency {
                config.currency = code;
            }
            if parsed.token.is_some() {
                config.token = parsed.token;
            }
            if let Some(secs) = parsed.timeout_secs {
                config.timeout_secs = secs;
            }
        }

        if let Some(url) = env("BUDGETVIEW_API_URL") {
            config.api_url = url;
        }
        if let Some(code) = env("BUDGETVIEW_CURRENCY") {
            config.currency = code;
        }
        if let Some(token) = env("BUDGETVIEW_TOKEN").filter(|t| !t.is_empty()) {
            config.token = Some(token);
        }
        if let Some(secs) = env("BUDGETVIEW_TIMEOUT") {
            config.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("BUDGETVIEW_TIMEOUT must be whole seconds, got '{secs}'"))?;
        }

        if let Some(url) = overrides.api_url {
            config.api_url = url;
        }
        if let Some(code) = overrides.currency {
            config.currency = code;
        }

        config.api_url = validate_api_url(&config.api_url)?;
        config.currency = normalize_currency(&config.currency)?;
        if config.timeout_secs == 0 {
            anyhow::bail!("Request timeout must be at least one second");
        }
        Ok(config)
    }
}

fn validate_api_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        anyhow::bail!("API URL must start with http:// or https://, got '{url}'");
    }
    Ok(trimmed.to_string())
}

/// Upper-case a 3-letter ISO currency code.
pub(crate) fn normalize_currency(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        anyhow::bail!("Currency must be a 3-letter ISO code, got '{code}'");
    }
    Ok(code.to_ascii_uppercase())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
