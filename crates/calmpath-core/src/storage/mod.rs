mod config;

pub use config::{CheckoutConfig, Config, PacerConfig, ShopConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `CALMPATH_HOME` wins when set. Otherwise `~/.config/calmpath`, or
/// `~/.config/calmpath-dev` with `CALMPATH_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CALMPATH_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CALMPATH_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("calmpath-dev")
            } else {
                base_dir.join("calmpath")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
