//! XDG Base Directory paths for narsbridge.
//!
//! Learned vocabularies and engine transcripts outlive a single run, so they
//! live under the user's data directory rather than the working directory.

use std::path::PathBuf;

const APP: &str = "narsbridge";

/// `$<var>/narsbridge` when the variable is set, else `<home>/<fallback>/narsbridge`.
fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    match std::env::var_os(var) {
        Some(base) => PathBuf::from(base).join(APP),
        None => dirs::home_dir()
            .unwrap_or_default()
            .join(fallback)
            .join(APP),
    }
}

/// Directory holding `config.toml`: `$XDG_CONFIG_HOME/narsbridge` or
/// `~/.config/narsbridge`.
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Directory for learned state and engine logs: `$XDG_DATA_HOME/narsbridge`
/// or `~/.local/share/narsbridge`.
pub fn data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

/// Default location of the persisted quantizer vocabulary.
pub fn knowledge_path() -> PathBuf {
    data_dir().join("knowledge.json")
}

/// Default transcript file for an engine dialect, e.g. `logs/ona.log`.
pub fn engine_log_path(dialect: &str) -> PathBuf {
    data_dir().join("logs").join(format!("{dialect}.log"))
}
