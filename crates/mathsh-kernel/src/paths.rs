//! XDG Base Directory paths for mathsh.
//!
//! Persistent variables and REPL history live under `$XDG_DATA_HOME/mathsh`
//! (`~/.local/share/mathsh` by default).

use std::path::PathBuf;

use directories::BaseDirs;

/// Get the user's home directory.
///
/// Returns `$HOME` or falls back to `/tmp` if not set.
pub fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

/// Get XDG data home directory.
///
/// Returns `$XDG_DATA_HOME` or falls back to `~/.local/share`.
pub fn xdg_data_home() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| home_dir().join(".local").join("share"))
}

/// mathsh's own data directory.
pub fn data_dir() -> PathBuf {
    xdg_data_home().join("mathsh")
}

/// Where persistent variables are stored.
pub fn variables_file() -> PathBuf {
    data_dir().join("variables.json")
}

/// Where REPL history is stored.
pub fn history_file() -> PathBuf {
    data_dir().join("history.txt")
}
