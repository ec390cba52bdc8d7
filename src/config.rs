//! Runtime configuration, read from `TRACKER_*` environment variables.
//!
//! A `.env` file in the working directory is loaded first if present. Every setting has a
//! default, so an empty environment is a valid configuration.

use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// How often a tracking session re-derives status.
    pub status_refresh: Duration,
    /// How often the simulated courier moves one waypoint.
    pub courier_step: Duration,
    /// Request channel capacity for each store actor.
    pub actor_buffer: usize,
    pub email_sender: String,
    /// Mail domain used to address customers who only gave a phone number.
    pub phone_email_domain: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            status_refresh: Duration::from_millis(5_000),
            courier_step: Duration::from_millis(12_000),
            actor_buffer: 32,
            email_sender: "SmartBasket <orders@smartbasket.app>".to_string(),
            phone_email_domain: "smartbasket.app".to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let config = Self::from_lookup(|var| env::var(var).ok())?;
        tracing::info!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let millis = |var: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(raw) => {
                    let ms = parse_positive(var, &raw)?;
                    Ok(Duration::from_millis(ms as u64))
                }
            }
        };

        let status_refresh = millis("TRACKER_STATUS_REFRESH_MS", defaults.status_refresh)?;
        let courier_step = millis("TRACKER_COURIER_STEP_MS", defaults.courier_step)?;
        let actor_buffer = match lookup("TRACKER_ACTOR_BUFFER") {
            None => defaults.actor_buffer,
            Some(raw) => parse_positive("TRACKER_ACTOR_BUFFER", &raw)?,
        };
        let email_sender = lookup("TRACKER_EMAIL_SENDER").unwrap_or(defaults.email_sender);
        let phone_email_domain =
            lookup("TRACKER_PHONE_EMAIL_DOMAIN").unwrap_or(defaults.phone_email_domain);

        Ok(Self {
            status_refresh,
            courier_step,
            actor_buffer,
            email_sender,
            phone_email_domain,
        })
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    let value = raw.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })?;
    if value == 0 {
        return Err(ConfigError::Invalid {
            var,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = TrackerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.status_refresh, Duration::from_secs(5));
        assert_eq!(config.courier_step, Duration::from_secs(12));
    }

    #[test]
    fn overrides_are_applied() {
        let config = TrackerConfig::from_lookup(lookup(&[
            ("TRACKER_STATUS_REFRESH_MS", "1000"),
            ("TRACKER_ACTOR_BUFFER", "8"),
            ("TRACKER_EMAIL_SENDER", "ops@example.com"),
        ]))
        .unwrap();
        assert_eq!(config.status_refresh, Duration::from_secs(1));
        assert_eq!(config.actor_buffer, 8);
        assert_eq!(config.email_sender, "ops@example.com");
    }

    #[test]
    fn rejects_zero_and_garbage() {
        let err = TrackerConfig::from_lookup(lookup(&[("TRACKER_COURIER_STEP_MS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TRACKER_COURIER_STEP_MS", .. }));

        let err = TrackerConfig::from_lookup(lookup(&[("TRACKER_ACTOR_BUFFER", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TRACKER_ACTOR_BUFFER", .. }));
    }
}
