//! Settings for the WhatsFlow server and CLI.
//!
//! Configuration is TOML. Two files are layered, the project-local one
//! winning field by field: `~/.config/whatsflow/config.toml`, then
//! `./whatsflow.toml`. Deployment secrets (the Graph API token, the WABA
//! id) ride on top through environment variables so they never have to
//! live in a file.

pub mod discovery;
pub mod error;
pub mod paths;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    save_config, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use paths::default_store_path;
pub use types::*;
