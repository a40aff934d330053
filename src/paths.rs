use anyhow::Result;
use std::{env, path::PathBuf};

/// Resolve the gitsnap config directory.
///
/// Uses `$XDG_CONFIG_HOME/gitsnap` when `XDG_CONFIG_HOME` is set, otherwise
/// `$HOME/.config/gitsnap`.
pub fn config_home() -> Result<PathBuf> {
    let xdg = env::var_os("XDG_CONFIG_HOME");
    let base = xdg
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env::var_os("HOME").unwrap_or_default()).join(".config"));
    Ok(base.join("gitsnap"))
}

/// Path of the configuration file inside [`config_home`].
pub fn config_file() -> Result<PathBuf> {
    Ok(config_home()?.join("config.toml"))
}
