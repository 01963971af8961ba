//! Environment-driven configuration (§6). Mirrors the small
//! env-branching helpers the rest of this crate's ambient stack favors:
//! read once at startup, fall back to a documented default, never
//! re-read per request.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_INTERFACE: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FIXTURES_PATH: &str = "data/sample_simulated_flights.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub interface: IpAddr,
    pub port: u16,
    pub grid_cell_size: f64,
    pub fixtures_path: PathBuf,
}

impl Config {
    /// Build configuration from the process environment. Callers are
    /// expected to have already loaded a `.env` file (via `dotenvy`)
    /// before calling this, matching the rest of the crate's startup
    /// order.
    pub fn from_env() -> Result<Self> {
        let interface = match std::env::var("DECONFLICT_INTERFACE") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("DECONFLICT_INTERFACE is not a valid IP address: {value}"))?,
            Err(_) => DEFAULT_INTERFACE.parse().expect("default interface is valid"),
        };

        let port = match std::env::var("DECONFLICT_PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("DECONFLICT_PORT is not a valid port: {value}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let grid_cell_size = match std::env::var("DECONFLICT_GRID_CELL_SIZE") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("DECONFLICT_GRID_CELL_SIZE is not a valid number: {value}"))?,
            Err(_) => crate::engine::DEFAULT_GRID_CELL_SIZE,
        };
        if grid_cell_size <= 0.0 {
            anyhow::bail!("DECONFLICT_GRID_CELL_SIZE must be positive, got {grid_cell_size}");
        }

        let fixtures_path = std::env::var("DECONFLICT_FIXTURES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FIXTURES_PATH));

        Ok(Self {
            interface,
            port,
            grid_cell_size,
            fixtures_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "DECONFLICT_INTERFACE",
            "DECONFLICT_PORT",
            "DECONFLICT_GRID_CELL_SIZE",
            "DECONFLICT_FIXTURES_PATH",
        ] {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn defaults_when_unset() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.grid_cell_size, crate::engine::DEFAULT_GRID_CELL_SIZE);
    }

    #[test]
    #[serial]
    fn rejects_non_positive_grid_cell_size() {
        clear_env();
        unsafe { std::env::set_var("DECONFLICT_GRID_CELL_SIZE", "0") };
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("must be positive"));
        clear_env();
    }

    #[test]
    #[serial]
    fn reads_overrides() {
        clear_env();
        unsafe { std::env::set_var("DECONFLICT_PORT", "9090") };
        unsafe { std::env::set_var("DECONFLICT_INTERFACE", "0.0.0.0") };
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.interface, "0.0.0.0".parse::<IpAddr>().unwrap());
        clear_env();
    }
}
