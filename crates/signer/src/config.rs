use std::{collections::HashMap, fs};

use shared::protocol::{DEFAULT_SIGN_BUCKET, DEFAULT_SIGN_EXPIRES_IN_SECS};

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub storage_url: String,
    pub service_key: String,
    pub default_bucket: String,
    pub default_expiry_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8788".into(),
            storage_url: "http://127.0.0.1:54321".into(),
            service_key: "dev-service-key".into(),
            default_bucket: DEFAULT_SIGN_BUCKET.into(),
            default_expiry_secs: DEFAULT_SIGN_EXPIRES_IN_SECS,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("signer.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind") {
                settings.bind = v.clone();
            }
            if let Some(v) = file_cfg.get("storage_url") {
                settings.storage_url = v.clone();
            }
            if let Some(v) = file_cfg.get("service_key") {
                settings.service_key = v.clone();
            }
            if let Some(v) = file_cfg.get("default_bucket") {
                settings.default_bucket = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("SIGNER_BIND") {
        settings.bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND") {
        settings.bind = v;
    }

    if let Ok(v) = std::env::var("SIGNER_STORAGE_URL") {
        settings.storage_url = v;
    }
    if let Ok(v) = std::env::var("APP__STORAGE_URL") {
        settings.storage_url = v;
    }

    if let Ok(v) = std::env::var("SIGNER_SERVICE_KEY") {
        settings.service_key = v;
    }
    if let Ok(v) = std::env::var("APP__SERVICE_KEY") {
        settings.service_key = v;
    }

    if let Ok(v) = std::env::var("SIGNER_DEFAULT_BUCKET") {
        settings.default_bucket = v;
    }

    if let Ok(v) = std::env::var("SIGNER_DEFAULT_EXPIRY_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.default_expiry_secs = parsed;
        }
    }

    settings.storage_url = normalize_base_url(&settings.storage_url);
    settings
}

/// Base URLs are joined with API paths later, so a trailing slash would
/// produce double slashes. Empty input falls back to the default.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Settings::default().storage_url;
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slashes_from_base_url() {
        assert_eq!(
            normalize_base_url("http://127.0.0.1:54321/"),
            "http://127.0.0.1:54321"
        );
        assert_eq!(
            normalize_base_url("https://storage.example///"),
            "https://storage.example"
        );
    }

    #[test]
    fn empty_base_url_falls_back_to_default() {
        assert_eq!(normalize_base_url("  "), Settings::default().storage_url);
        assert_eq!(normalize_base_url(""), Settings::default().storage_url);
    }

    #[test]
    fn untouched_base_url_passes_through() {
        assert_eq!(
            normalize_base_url("http://storage.internal:9000"),
            "http://storage.internal:9000"
        );
    }
}
