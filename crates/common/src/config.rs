use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_BASE_URL: &str = "https://www.okx.com";
pub const DEFAULT_ORDER_FILE: &str = "current_order.json";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Credentials and endpoint settings for the OKX REST API.
#[derive(Clone)]
pub struct ExchangeSettings {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: String,
    pub base_url: String,
    /// Sends `x-simulated-trading: 1` so orders hit the demo account.
    pub simulated: bool,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ExchangeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeSettings")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("simulated", &self.simulated)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct Settings {
    pub exchange: ExchangeSettings,
    pub webhook_secret: String,
    pub port: u16,
    pub order_file: PathBuf,
    pub order_db: Option<PathBuf>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("exchange", &self.exchange)
            .field("webhook_secret", &"<redacted>")
            .field("port", &self.port)
            .field("order_file", &self.order_file)
            .field("order_db", &self.order_db)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        let port = match optional("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let simulated = match optional("OKX_SIMULATED") {
            Some(raw) => parse_flag("OKX_SIMULATED", &raw)?,
            None => false,
        };

        let timeout = match optional("OKX_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    key: "OKX_HTTP_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            exchange: ExchangeSettings {
                api_key: required("OKX_API_KEY")?,
                api_secret: required("OKX_API_SECRET")?,
                passphrase: required("OKX_PASSPHRASE")?,
                base_url: optional("OKX_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                simulated,
                timeout,
            },
            webhook_secret: required("WEBHOOK_SECRET")?,
            port,
            order_file: optional("ORDER_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ORDER_FILE)),
            order_db: optional("ORDER_DB").map(PathBuf::from),
        })
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected true/false or 1/0".to_string(),
        }),
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

    const REQUIRED: &[(&str, &str)] = &[
        ("OKX_API_KEY", "k-1111"),
        ("OKX_API_SECRET", "s-2222"),
        ("OKX_PASSPHRASE", "p-3333"),
        ("WEBHOOK_SECRET", "w-4444"),
    ];

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(REQUIRED)).unwrap();

        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.exchange.base_url, DEFAULT_BASE_URL);
        assert!(!settings.exchange.simulated);
        assert_eq!(settings.exchange.timeout, None);
        assert_eq!(settings.order_file, PathBuf::from(DEFAULT_ORDER_FILE));
        assert_eq!(settings.order_db, None);
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend_from_slice(&[
            ("PORT", "8080"),
            ("OKX_SIMULATED", "1"),
            ("OKX_HTTP_TIMEOUT_SECS", "15"),
            ("ORDER_DB", "/tmp/orders.db"),
        ]);
        let settings = Settings::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(settings.port, 8080);
        assert!(settings.exchange.simulated);
        assert_eq!(settings.exchange.timeout, Some(Duration::from_secs(15)));
        assert_eq!(settings.order_db, Some(PathBuf::from("/tmp/orders.db")));
    }

    #[test]
    fn test_missing_or_empty_required_fails() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "OKX_PASSPHRASE")
            .collect();
        assert_eq!(
            Settings::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::Missing("OKX_PASSPHRASE")
        );

        let mut pairs = REQUIRED.to_vec();
        pairs.retain(|(k, _)| *k != "WEBHOOK_SECRET");
        pairs.push(("WEBHOOK_SECRET", ""));
        assert_eq!(
            Settings::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::Missing("WEBHOOK_SECRET")
        );
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "http"));
        assert!(matches!(
            Settings::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let settings = Settings::from_lookup(lookup_from(REQUIRED)).unwrap();
        let printed = format!("{:?}", settings);
        for value in ["k-1111", "s-2222", "p-3333", "w-4444"] {
            assert!(!printed.contains(value));
        }
    }
}
