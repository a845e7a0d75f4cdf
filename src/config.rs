use std::time::Duration;

use crate::campaign::credential::Credential;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://backend.aisensy.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_BASE_URL: &str = "AISENSY_BASE_URL";
const ENV_TIMEOUT: &str = "AISENSY_TIMEOUT_SECS";
const ENV_API_KEY: &str = "AISENSY_API_KEY";

/// Runtime configuration for the AiSensy client.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AdapterConfig {
    /// Load from the process environment, reading `.env` first when present.
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AppError::Configuration(format!("{ENV_TIMEOUT} must be a whole number of seconds, got '{raw}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            AppError::Configuration(format!("Invalid AiSensy base URL '{}': {e}", self.base_url))
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::Configuration(format!(
                    "AiSensy base URL scheme '{scheme}' is not allowed (only http/https)"
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(AppError::Configuration(
                "Request timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Resolve the API key: environment first, then the OS keyring (desktop builds).
pub fn resolve_credential() -> Result<Credential, AppError> {
    let _ = dotenvy::dotenv();
    if let Some(key) = std::env::var(ENV_API_KEY).ok().filter(|k| !k.trim().is_empty()) {
        return Credential::new(key);
    }

    #[cfg(feature = "desktop")]
    if let Some(key) = keyring_store::load_api_key() {
        tracing::debug!("API key loaded from OS keyring");
        return Credential::new(key);
    }

    Err(AppError::Configuration(format!(
        "No AiSensy API key configured. Set {ENV_API_KEY} or store one in the keyring."
    )))
}

#[cfg(feature = "desktop")]
pub mod keyring_store {
    use keyring::Entry;

    use crate::error::AppError;

    const SERVICE: &str = "aisensy-adapter";
    const KEY_API: &str = "aisensy-api-key";

    fn keyring_err(e: impl std::fmt::Display) -> AppError {
        AppError::Keyring(e.to_string())
    }

    /// Store the AiSensy API key in the OS keyring.
    pub fn store_api_key(api_key: &str) -> Result<(), AppError> {
        Entry::new(SERVICE, KEY_API)
            .map_err(keyring_err)?
            .set_password(api_key)
            .map_err(|e| AppError::Keyring(format!("Failed to store API key: {e}")))
    }

    /// Load the API key from the OS keyring. Returns None if not configured.
    pub fn load_api_key() -> Option<String> {
        let key = Entry::new(SERVICE, KEY_API).ok()?.get_password().ok()?;
        if key.is_empty() {
            return None;
        }
        Some(key)
    }

    /// Remove the API key from the OS keyring.
    pub fn clear_api_key() {
        if let Ok(entry) = Entry::new(SERVICE, KEY_API) {
            let _ = entry.delete_credential();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AdapterConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_and_trims_trailing_slash() {
        let config = AdapterConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://127.0.0.1:9000/"),
            (ENV_TIMEOUT, "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        let err = AdapterConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT, "soon")])).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));

        let err = AdapterConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT, "0")])).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err =
            AdapterConfig::from_lookup(lookup_from(&[(ENV_BASE_URL, "ftp://backend.aisensy.com")]))
                .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));

        let err = AdapterConfig::from_lookup(lookup_from(&[(ENV_BASE_URL, "not a url")])).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
