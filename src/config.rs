//! Configuration de l'application, lue depuis l'environnement (et `.env`).

use std::{env, path::PathBuf};

use dotenv::dotenv;
use log::debug;

use crate::consts::{DB_PATH, DB_PATH_VAR, LOG_PATH, LOG_PATH_VAR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DB_PATH.into(),
            log_path: LOG_PATH.into(),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> Self {
        if dotenv().is_err() {
            debug!("No .env file loaded");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Unset or empty
    /// variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| -> PathBuf {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_owned())
                .into()
        };

        Self {
            db_path: read(DB_PATH_VAR, DB_PATH),
            log_path: read(LOG_PATH_VAR, LOG_PATH),
        }
    }
}
