use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Endpoint that returns the caller's public IP as a plain-text body.
    pub return_ip: String,
    /// Webhook that receives the outcome of each run.
    pub webhook: String,
    pub cloudflare: CloudflareConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CloudflareConfig {
    pub api_token: String,
    /// The fully-qualified domain whose A record is kept in sync.
    pub domain: String,
}

impl Config {
    /// A missing or malformed config file aborts the run; downstream steps
    /// cannot do anything useful with empty credentials.
    pub fn load(path: &Path) -> Result<Config> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "could not read config file {path:?}: {e}, maybe run the `init` command first?"
            ))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("could not parse config file {path:?}: {e}")))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(&self)
            .map_err(|e| Error::Config(format!("could not serialize config: {e}")))?;
        std::fs::write(path, config_json)
            .map_err(|e| Error::Config(format!("could not write config file {path:?}: {e}")))
    }

    /// Default location is `config.json` next to the running executable,
    /// overridable with `--config`.
    pub fn config_path(custom_path: Option<PathBuf>) -> Result<PathBuf> {
        match custom_path {
            Some(path) => Ok(path),
            None => {
                let exe = std::env::current_exe()
                    .map_err(|e| Error::Config(format!("could not locate executable: {e}")))?;
                let dir = exe
                    .parent()
                    .ok_or_else(|| Error::Config("executable has no parent directory".into()))?;
                Ok(dir.join(CONFIG_FILE_NAME))
            }
        }
    }
}
