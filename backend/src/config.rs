//! Server settings read from the environment.
//!
//! Every setting has a default so the server starts with no configuration;
//! each defaulted key is logged at startup. Values that are present but
//! unparseable are errors rather than silently replaced.

use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// Session signing keys must be at least this long.
pub const SESSION_KEY_MIN_LEN: usize = 64;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}='{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("SESSION_KEY too short: need >= {SESSION_KEY_MIN_LEN} bytes, got {0}")]
    SessionKeyTooShort(usize),
}

/// The single administrator identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Directory where uploaded rosters are spooled while they are imported.
    pub upload_dir: PathBuf,
    pub admin: AdminCredentials,
    /// Origin used when building scan URLs. Derived from each request when unset.
    pub public_url: Option<String>,
    /// Keep the stored token when a roster re-import contains a known id.
    pub preserve_tokens: bool,
    pub session_key: Option<Vec<u8>>,
    pub cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_key = lookup("SESSION_KEY").map(String::into_bytes);
        match &session_key {
            Some(key) if key.len() < SESSION_KEY_MIN_LEN => {
                return Err(ConfigError::SessionKeyTooShort(key.len()))
            }
            Some(_) => {}
            None => warn!("SESSION_KEY not set, sessions will not survive a restart"),
        }

        Ok(Config {
            host: string_or(&lookup, "CHECKIN_HOST", "127.0.0.1"),
            port: parse_or(&lookup, "CHECKIN_PORT", 3000)?,
            database_path: PathBuf::from(string_or(&lookup, "CHECKIN_DATABASE", "checkin.sqlite")),
            upload_dir: lookup("CHECKIN_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    let dir = env::temp_dir();
                    info!("CHECKIN_UPLOAD_DIR not set, using default: {}", dir.display());
                    dir
                }),
            admin: AdminCredentials {
                username: string_or(&lookup, "ADMIN_USERNAME", "admin"),
                password: string_or(&lookup, "ADMIN_PASSWORD", "1234"),
            },
            public_url: lookup("CHECKIN_PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            preserve_tokens: bool_or(&lookup, "CHECKIN_PRESERVE_TOKENS", false)?,
            session_key,
            cookie_secure: bool_or(&lookup, "SESSION_COOKIE_SECURE", false)?,
        })
    }
}

fn string_or<F>(lookup: &F, name: &'static str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).unwrap_or_else(|| {
        info!("{name} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
        None => {
            info!("{name} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn bool_or<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value,
            reason: format!("expected {BOOL_EXPECTED}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).expect("defaults");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_path, PathBuf::from("checkin.sqlite"));
        assert_eq!(config.upload_dir, env::temp_dir());
        assert!(config.admin.matches("admin", "1234"));
        assert!(config.public_url.is_none());
        assert!(!config.preserve_tokens);
        assert!(config.session_key.is_none());
        assert!(!config.cookie_secure);
    }

    #[test]
    fn reads_overrides() {
        let key = "k".repeat(SESSION_KEY_MIN_LEN);
        let config = config_from(&[
            ("CHECKIN_PORT", "8081"),
            ("CHECKIN_UPLOAD_DIR", "/var/spool/checkin"),
            ("ADMIN_USERNAME", "desk"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("CHECKIN_PUBLIC_URL", "https://checkin.example.org/"),
            ("CHECKIN_PRESERVE_TOKENS", "yes"),
            ("SESSION_KEY", key.as_str()),
        ])
        .expect("config");
        assert_eq!(config.port, 8081);
        assert_eq!(config.upload_dir, PathBuf::from("/var/spool/checkin"));
        assert!(config.admin.matches("desk", "s3cret"));
        assert!(!config.admin.matches("admin", "1234"));
        assert_eq!(
            config.public_url.as_deref(),
            Some("https://checkin.example.org")
        );
        assert!(config.preserve_tokens);
        assert_eq!(config.session_key.map(|k| k.len()), Some(SESSION_KEY_MIN_LEN));
    }

    #[rstest]
    #[case("CHECKIN_PORT", "eighty")]
    #[case("CHECKIN_PORT", "70000")]
    #[case("CHECKIN_PRESERVE_TOKENS", "maybe")]
    #[case("SESSION_COOKIE_SECURE", "2")]
    fn rejects_unparseable_values(#[case] name: &str, #[case] value: &str) {
        assert!(matches!(
            config_from(&[(name, value)]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_short_session_key() {
        assert!(matches!(
            config_from(&[("SESSION_KEY", "short")]),
            Err(ConfigError::SessionKeyTooShort(5))
        ));
    }
}
