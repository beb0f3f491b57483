//! Configuration of the bot.
//!
//! The configuration is read from a YAML file, then overridden by environment
//! variables prefixed with `SORTEIO_` (`__` separates nested keys).
//!
//! ```yaml
//! matrix:
//!   # Fully qualified Matrix user ID of the bot account
//!   user_id: "@sorteio:matrix.org"
//!   # Matrix account password, used for the first login only
//!   password: "secret-password"
//!   # Passphrase encrypting the local store
//!   passphrase: "store-passphrase"
//!
//! # Optional, defaults shown
//! panel:
//!   bind: "0.0.0.0"
//!   port: 3000
//! ```
//!
//! ```bash
//! export SORTEIO_MATRIX__PASSWORD="secret-from-env"
//! export SORTEIO_PANEL__PORT=8080
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
    /// Control panel configuration
    #[serde(default)]
    pub panel: Panel,
}

/// Matrix account configuration.
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Fully qualified Matrix user ID, e.g. `@sorteio:matrix.org`
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Used for the first login. The session is then persisted and restored
    /// without re-authenticating.
    pub password: String,

    /// Passphrase encrypting the SQLite store of the Matrix SDK.
    pub passphrase: String,
}

/// HTTP control panel configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Panel {
    /// Address the panel listens on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Port the panel listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Panel {
    fn default() -> Self {
        Panel {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Loads the configuration from the YAML file at `path` and the environment.
    ///
    /// # Errors
    ///
    /// Fails when a required value is missing from both sources, or has the wrong type.
    pub fn load(path: &str) -> Result<Config, figment::Error> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("SORTEIO_").split("__"))
            .extract()
    }
}
