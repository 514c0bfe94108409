use std::io;
use std::path::PathBuf;

use tracing::warn;

use super::Config;
use crate::{ShellError, ShellResult};

/// Returns the config directory: `~/.config/springboard/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("springboard"))
}

/// Returns the config file path: `~/.config/springboard/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse `config.toml`.
///
/// Values are clamped via [`Config::validate`] before returning.
pub fn try_load() -> ShellResult<Config> {
    let path =
        config_path().ok_or_else(|| ShellError::Config("could not determine config path".into()))?;
    let content = std::fs::read_to_string(&path)?;
    parse(&content).map_err(|e| ShellError::Config(format!("{}: {e}", path.display())))
}

/// Parses config text and clamps the result.
pub(super) fn parse(content: &str) -> Result<Config, toml::de::Error> {
    let mut config: Config = toml::from_str(content)?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
///
/// A missing file silently yields defaults; any other failure is
/// logged first.
pub fn load() -> Config {
    load_or_default(try_load, Config::default)
}

fn load_or_default<T>(try_load: impl FnOnce() -> ShellResult<T>, default: impl Fn() -> T) -> T {
    match try_load() {
        Ok(val) => val,
        Err(ShellError::Io(e)) if e.kind() == io::ErrorKind::NotFound => default(),
        Err(e) => {
            warn!(error = %e, "using default configuration");
            default()
        }
    }
}
