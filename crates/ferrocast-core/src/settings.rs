//! Runtime configuration read from the environment.
//!
//! Variables (a `.env` file in the working directory is honoured):
//!
//! | Variable                    | Default                                    |
//! |-----------------------------|--------------------------------------------|
//! | `FERROCAST_BIND`            | `127.0.0.1:8080`                           |
//! | `FERROCAST_YAHOO_BASE_URL`  | `https://query1.finance.yahoo.com`         |
//! | `FERROCAST_HTTP_TIMEOUT_MS` | `10000`                                    |
//! | `FERROCAST_ADJUST_PRICES`   | `true`                                     |
//! | `FERROCAST_OFFLINE`         | `false`                                    |

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::adapters::{SyntheticAdapter, YahooAdapter, DEFAULT_BASE_URL};
use crate::data_source::DataSource;
use crate::ValidationError;

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind: SocketAddr,
    pub yahoo_base_url: String,
    pub http_timeout_ms: u64,
    pub adjust_prices: bool,
    /// Serve synthetic data instead of calling Yahoo.
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            yahoo_base_url: DEFAULT_BASE_URL.to_owned(),
            http_timeout_ms: DEFAULT_TIMEOUT_MS,
            adjust_prices: true,
            offline: false,
        }
    }
}

impl Settings {
    /// Load settings from the process environment after applying `.env`.
    pub fn from_env() -> Result<Self, ValidationError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("FERROCAST_BIND").unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ValidationError::InvalidSetting {
                key: "FERROCAST_BIND",
                value: bind_raw.clone(),
            })?;

        let yahoo_base_url = lookup("FERROCAST_YAHOO_BASE_URL")
            .map(|value| value.trim().trim_end_matches('/').to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let http_timeout_ms = match lookup("FERROCAST_HTTP_TIMEOUT_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ValidationError::InvalidSetting {
                        key: "FERROCAST_HTTP_TIMEOUT_MS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TIMEOUT_MS,
        };

        let adjust_prices = parse_flag(&lookup, "FERROCAST_ADJUST_PRICES", true)?;
        let offline = parse_flag(&lookup, "FERROCAST_OFFLINE", false)?;

        Ok(Self {
            bind,
            yahoo_base_url,
            http_timeout_ms,
            adjust_prices,
            offline,
        })
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Build the configured history source.
    pub fn data_source(&self) -> Arc<dyn DataSource> {
        if self.offline {
            Arc::new(SyntheticAdapter::default())
        } else {
            Arc::new(YahooAdapter::from_settings(self))
        }
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ValidationError::InvalidSetting { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::ProviderId;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.data_source().id(), ProviderId::Yahoo);
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("FERROCAST_BIND", "0.0.0.0:9000"),
            ("FERROCAST_YAHOO_BASE_URL", "http://localhost:4010/"),
            ("FERROCAST_HTTP_TIMEOUT_MS", "2500"),
            ("FERROCAST_ADJUST_PRICES", "no"),
            ("FERROCAST_OFFLINE", "1"),
        ]))
        .expect("overrides");

        assert_eq!(settings.bind.port(), 9000);
        assert_eq!(settings.yahoo_base_url, "http://localhost:4010");
        assert_eq!(settings.http_timeout_ms, 2500);
        assert!(!settings.adjust_prices);
        assert_eq!(settings.data_source().id(), ProviderId::Synthetic);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = Settings::from_lookup(lookup(&[("FERROCAST_HTTP_TIMEOUT_MS", "0")]))
            .expect_err("zero timeout");
        assert!(matches!(
            err,
            ValidationError::InvalidSetting {
                key: "FERROCAST_HTTP_TIMEOUT_MS",
                ..
            }
        ));

        let err = Settings::from_lookup(lookup(&[("FERROCAST_OFFLINE", "maybe")]))
            .expect_err("bad flag");
        assert!(matches!(
            err,
            ValidationError::InvalidSetting {
                key: "FERROCAST_OFFLINE",
                ..
            }
        ));
    }
}
