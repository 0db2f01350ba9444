//! `calmpath config`: inspect and edit `config.toml` in the data directory.

use calmpath_core::{Config, ConfigError};
use clap::Subcommand;

use super::CmdResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print every setting as JSON
    #[command(alias = "list")]
    Show,
    /// Print one setting, addressed as section.field
    Get {
        /// e.g. pacer.tick_interval_ms or shop.confirm_add
        key: String,
    },
    /// Change one setting and write the file
    Set {
        key: String,
        value: String,
    },
    /// Print where config.toml lives
    Path,
    /// Overwrite config.toml with the built-in settings
    Reset,
}

pub fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&Config::load()?)?);
        }
        ConfigAction::Get { key } => println!("{}", lookup(&Config::load()?, &key)?),
        ConfigAction::Set { key, value } => {
            let config = edit(|config| config.set(&key, &value))?;
            println!("{key} = {}", lookup(&config, &key)?);
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            let path = Config::path()?;
            Config::default().save_to(&path)?;
            println!("restored defaults in {}", path.display());
        }
    }
    Ok(())
}

fn lookup(config: &Config, key: &str) -> Result<String, ConfigError> {
    config
        .get(key)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
}

/// Load, apply `change`, and save only if it succeeded.
fn edit(
    change: impl FnOnce(&mut Config) -> Result<(), ConfigError>,
) -> Result<Config, ConfigError> {
    let mut config = Config::load()?;
    change(&mut config)?;
    config.save()?;
    tracing::debug!("config saved");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_reports_unknown_key() {
        let err = lookup(&Config::default(), "pacer.nope").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "pacer.nope"));
    }

    #[test]
    fn lookup_renders_values_as_plain_text() {
        let config = Config::default();
        assert_eq!(lookup(&config, "shop.confirm_add").unwrap(), "true");
    }
}
