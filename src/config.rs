use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::Error;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ibc.toml";

/// Connection settings for the gateway. Loaded once at startup and
/// immutable for the process lifetime.
///
/// ```toml
/// host = "127.0.0.1"
/// port = 4002
/// client_id = 100
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub client_id: i32,
}

impl Config {
    /// Reads the configuration file. A missing file or missing key is a
    /// fatal [Error::Config].
    pub fn load(path: &Path) -> Result<Config, Error> {
        let contents = fs::read_to_string(path).map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Gateway address in the `host:port` form `ibapi` connects to.
    pub fn gateway_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
