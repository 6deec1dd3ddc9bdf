//! Server settings loaded via OrthoConfig and the session key they point at.
//!
//! Every field can be set with a `FOOTBALLVOICE_` environment variable or the
//! matching command-line flag.

use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroize;

use footballvoice::domain::DEFAULT_LOGIN_CODE_TTL_SECS;
use footballvoice::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;

/// Errors raised while turning settings into server inputs.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Load(String),
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("login code ttl must be positive, got {0}")]
    LoginCodeTtl(i64),
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOOTBALLVOICE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server runs on an in-memory store.
    pub database_url: Option<String>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a generated key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Lifetime of mailed login codes.
    pub login_code_ttl_secs: Option<i64>,
    pub pool_max_size: Option<u32>,
    pub pool_min_idle: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| ConfigError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn login_code_ttl(&self) -> Result<Duration, ConfigError> {
        match self.login_code_ttl_secs {
            Some(secs) if secs <= 0 => Err(ConfigError::LoginCodeTtl(secs)),
            Some(secs) => Ok(Duration::seconds(secs)),
            None => Ok(Duration::seconds(DEFAULT_LOGIN_CODE_TTL_SECS)),
        }
    }

    /// Pool settings when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let mut config = PoolConfig::new(url).with_min_idle(self.pool_min_idle);
        if let Some(max_size) = self.pool_max_size {
            config = config.with_max_size(max_size);
        }
        Some(config)
    }

    pub fn session_key_path(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH))
    }

    /// Load the session key. Debug builds, or an explicit opt-in, fall back
    /// to an ephemeral key when the file cannot be read.
    pub fn session_key(&self) -> Result<Key, ConfigError> {
        let allow_ephemeral = cfg!(debug_assertions) || self.session_allow_ephemeral;
        load_session_key(&self.session_key_path(), allow_ephemeral)
    }
}

/// Layer `args` over configuration files and `FOOTBALLVOICE_*` variables.
///
/// The server passes [`std::env::args_os`]; tests pass a fixed argument list.
pub fn load_settings<I, T>(args: I) -> Result<AppSettings, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    AppSettings::load_from_iter(args).map_err(|err| ConfigError::Load(err.to_string()))
}

fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key, ConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(ConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(ConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
