//! Server settings loaded via OrthoConfig.
//!
//! Values come from `JOKES_*` environment variables, an optional config file,
//! or command-line flags. Session secrets are deliberately not here: they are
//! read by [`crate::inbound::http::session_config`] so they never pass
//! through a config file.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Error raised when a setting is present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Process-level settings for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JOKES")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. When absent the server keeps everything in memory.
    pub database_url: Option<String>,
    /// bcrypt work factor for new password digests.
    #[ortho_config(default = 10)]
    pub bcrypt_cost: u32,
}

impl AppSettings {
    /// Configured listen address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Configured bcrypt cost.
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use crate::outbound::security::DEFAULT_BCRYPT_COST;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 3] = ["JOKES_BIND_ADDR", "JOKES_DATABASE_URL", "JOKES_BCRYPT_COST"];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("jokes")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal parses")
        );
        assert_eq!(settings.bcrypt_cost(), DEFAULT_BCRYPT_COST);
        assert!(settings.database_url().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("JOKES_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "JOKES_DATABASE_URL",
                Some("postgres://jokes@localhost/jokes".to_owned()),
            ),
            ("JOKES_BCRYPT_COST", Some("12".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9090
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://jokes@localhost/jokes")
        );
        assert_eq!(settings.bcrypt_cost(), 12);
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env([
            ("JOKES_BIND_ADDR", None::<String>),
            ("JOKES_DATABASE_URL", Some("   ".to_owned())),
            ("JOKES_BCRYPT_COST", None::<String>),
        ]);
        assert!(load_from_empty_args().database_url().is_none());
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env([
            ("JOKES_BIND_ADDR", Some("not-an-address".to_owned())),
            ("JOKES_DATABASE_URL", None::<String>),
            ("JOKES_BCRYPT_COST", None::<String>),
        ]);
        let err = load_from_empty_args()
            .bind_addr()
            .expect_err("bad address rejected");
        assert!(matches!(err, SettingsError::BindAddr { .. }));
    }
}
