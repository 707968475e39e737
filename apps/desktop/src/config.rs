use std::{collections::HashMap, fs};

use anyhow::Context;
use url::Url;

#[derive(Debug, Clone)]
pub struct Settings {
    pub webhook_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webhook_url: "http://127.0.0.1:8787/estimate".into(),
            request_timeout_seconds: 30,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("estimator.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("webhook_url") {
                settings.webhook_url = v.clone();
            }
            if let Some(v) = file_cfg.get("request_timeout_seconds") {
                if let Ok(parsed) = v.parse::<u64>() {
                    settings.request_timeout_seconds = parsed;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("ESTIMATOR_WEBHOOK_URL") {
        settings.webhook_url = v;
    }
    if let Ok(v) = std::env::var("APP__WEBHOOK_URL") {
        settings.webhook_url = v;
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }

    settings
}

pub fn parse_webhook_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid webhook url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("webhook url '{raw}' must use http or https");
    }
    Ok(url)
}
