use std::{fmt::Display, str::FromStr};
use tracing::{info, warn};
use crate::session::{DEFAULT_SESSION_TTL_MINUTES, MAX_SESSION_TTL_MINUTES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origins allowed in addition to localhost.
    pub allowed_origins: Vec<String>,
    pub session_ttl_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
        }
    }
}

impl Config {
    /// Builds the config from a key lookup such as Shuttle's secret store.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => {
                info!("ALLOWED_ORIGINS not set, only localhost origins are allowed");
                defaults.allowed_origins
            }
        };

        let session_ttl_minutes = try_load(&lookup, "SESSION_TTL_MINUTES", defaults.session_ttl_minutes)
            .filter(|ttl: &i64| (1..=MAX_SESSION_TTL_MINUTES).contains(ttl))
            .unwrap_or_else(|| {
                warn!(
                    "SESSION_TTL_MINUTES must be between 1 and {}, using default: {}",
                    MAX_SESSION_TTL_MINUTES, defaults.session_ttl_minutes
                );
                defaults.session_ttl_minutes
            });

        Self { allowed_origins, session_ttl_minutes }
    }
}

fn try_load<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> Option<T>
where
    T: Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return Some(default);
    };

    raw.trim()
        .parse()
        .map_err(|e| warn!("Invalid {key} value {raw:?}: {e}"))
        .ok()
}
