use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::models::PricingPolicy;
use crate::partners::{PartnerProtocol, PartnerSettings, PartnersConfig};

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/checkout";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_PARTNER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PARTNER_1_URL: &str = "http://localhost:9080/api1";
const DEFAULT_PARTNER_2_URL: &str = "http://localhost:9080/api2";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub partners: PartnersConfig,
    pub pricing: PricingPolicy,
    pub cors_allowed_origins: Option<String>,
    /// Enables production-only headers such as HSTS.
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = parse(&lookup, "PARTNER_TIMEOUT_SECS", DEFAULT_PARTNER_TIMEOUT_SECS)?;

        let partners = PartnersConfig {
            partners: vec![
                PartnerSettings {
                    id: 1,
                    protocol: PartnerProtocol::Standard,
                    base_url: lookup("PARTNER_1_URL")
                        .unwrap_or_else(|| DEFAULT_PARTNER_1_URL.to_string()),
                    api_token: lookup("PARTNER_1_TOKEN").filter(|t| !t.is_empty()),
                },
                PartnerSettings {
                    id: 2,
                    protocol: PartnerProtocol::Localized,
                    base_url: lookup("PARTNER_2_URL")
                        .unwrap_or_else(|| DEFAULT_PARTNER_2_URL.to_string()),
                    api_token: lookup("PARTNER_2_TOKEN").filter(|t| !t.is_empty()),
                },
            ],
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parse(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            port: parse(&lookup, "PORT", DEFAULT_PORT)?,
            partners,
            pricing: PricingPolicy::from_allow_free(flag(&lookup, "ALLOW_FREE_TICKETS")?),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS"),
            production: lookup("RUST_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn flag<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(false),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" | "" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.pricing, PricingPolicy::Strict);
        assert_eq!(config.partners.timeout, Duration::from_secs(10));
        assert_eq!(config.partners.partners.len(), 2);
        assert_eq!(config.partners.partners[0].protocol, PartnerProtocol::Standard);
        assert_eq!(config.partners.partners[1].protocol, PartnerProtocol::Localized);
        assert!(!config.production);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("PARTNER_TIMEOUT_SECS", "3"),
            ("PARTNER_2_URL", "https://partner-two.test"),
            ("PARTNER_2_TOKEN", "secret"),
            ("ALLOW_FREE_TICKETS", "true"),
            ("RUST_ENV", "Production"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.partners.timeout, Duration::from_secs(3));
        assert_eq!(config.partners.partners[1].base_url, "https://partner-two.test");
        assert_eq!(config.partners.partners[1].api_token.as_deref(), Some("secret"));
        assert_eq!(config.partners.partners[0].api_token, None);
        assert_eq!(config.pricing, PricingPolicy::AllowFree);
        assert!(config.production);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let result = config_from(&[("PORT", "eighty")]);
        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));

        let result = config_from(&[("ALLOW_FREE_TICKETS", "maybe")]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "ALLOW_FREE_TICKETS", .. })
        ));
    }
}
