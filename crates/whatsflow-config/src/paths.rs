//! Default filesystem locations.

use std::path::PathBuf;

use crate::discovery::xdg_config_dir;

/// Default path for the playground database.
///
/// Lives alongside the user config (`~/.config/whatsflow/playground.db`),
/// falling back to the working directory when no config dir resolves.
pub fn default_store_path() -> PathBuf {
    xdg_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("playground.db")
}
