//! Finding and layering config files.
//!
//! Two files are consulted, the later one winning field by field:
//! the XDG user config (`~/.config/whatsflow/config.toml`) and the
//! project-local `./whatsflow.toml`. Environment overrides sit on top of
//! both, applied by the caller through `WhatsflowConfig::apply_env`.

use std::path::{Path, PathBuf};

use crate::{ConfigError, Result, WhatsflowConfig};

/// Project-local config filename.
const PROJECT_CONFIG_FILE: &str = "whatsflow.toml";

/// Filename inside the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Directory name under the platform config root.
const APP_NAME: &str = "whatsflow";

/// Environment variable that relocates the user config directory.
const CONFIG_DIR_ENV: &str = "WHATSFLOW_CONFIG_DIR";

/// One config file that discovery looked at.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// False when the file was absent or unparseable.
    pub loaded: bool,
}

/// The merged config plus a record of how it came together.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: WhatsflowConfig,
    /// Every file consulted, lowest precedence first.
    pub sources: Vec<ConfigSource>,
    /// Soft problems: unparseable layers, plaintext tokens.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the files that actually contributed settings.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|source| source.loaded)
            .map(|source| source.path.as_path())
            .collect()
    }
}

/// Accumulates layers in precedence order.
struct Loader {
    config: WhatsflowConfig,
    sources: Vec<ConfigSource>,
    warnings: Vec<String>,
}

impl Loader {
    fn new() -> Self {
        Self {
            config: WhatsflowConfig::new(),
            sources: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Merge one file into the accumulated config. A missing file is
    /// recorded and skipped; an unparseable one demotes to a warning so a
    /// broken project file cannot take down the user layer.
    fn layer(&mut self, path: PathBuf) {
        if !path.is_file() {
            self.sources.push(ConfigSource {
                path,
                loaded: false,
            });
            return;
        }

        match load_config_file(&path) {
            Ok(overlay) => {
                self.config.merge(overlay);
                self.sources.push(ConfigSource { path, loaded: true });
            }
            Err(error) => {
                self.warnings
                    .push(format!("Failed to load {}: {}", path.display(), error));
                self.sources.push(ConfigSource {
                    path,
                    loaded: false,
                });
            }
        }
    }

    fn finish(mut self) -> LoadedConfig {
        if self
            .config
            .graph_api
            .as_ref()
            .is_some_and(|section| section.access_token.is_some())
        {
            self.warnings.push(
                "[graph_api] contains a plaintext access token. \
                 Consider the FB_ACCESS_TOKEN environment variable instead."
                    .to_string(),
            );
        }

        LoadedConfig {
            config: self.config,
            sources: self.sources,
            warnings: self.warnings,
        }
    }
}

/// Discover and merge the standard config layers.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Like [`load_config`], but with the user config directory pinned.
///
/// `config_dir` takes precedence over both `WHATSFLOW_CONFIG_DIR` and the
/// platform default. Tests use this to stay out of the real home directory.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let mut loader = Loader::new();

    let user_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => xdg_config_path(),
    };
    if let Some(path) = user_path {
        loader.layer(path);
    }

    let project_path = match project_dir {
        Some(dir) => dir.join(PROJECT_CONFIG_FILE),
        None => PathBuf::from(PROJECT_CONFIG_FILE),
    };
    loader.layer(project_path);

    Ok(loader.finish())
}

/// Parse a single config file, no discovery involved.
pub fn load_config_file(path: &Path) -> Result<WhatsflowConfig> {
    let contents = std::fs::read_to_string(path).map_err(|error| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: error,
    })?;
    WhatsflowConfig::from_toml(&contents)
}

/// Write a config out as TOML, creating parent directories as needed.
pub fn save_config(config: &WhatsflowConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|error| ConfigError::WriteFile {
            path: parent.to_path_buf(),
            source: error,
        })?;
    }

    let contents = config.to_toml()?;
    std::fs::write(path, contents).map_err(|error| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: error,
    })
}

/// Full path of the user config file, if a config directory exists.
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|dir| dir.join(USER_CONFIG_FILE))
}

/// The whatsflow config directory: `WHATSFLOW_CONFIG_DIR` when set and
/// non-empty, otherwise the platform default under the config root.
pub fn xdg_config_dir() -> Option<PathBuf> {
    match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|base| base.join(APP_NAME)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_load_empty_config() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();

        let loaded =
            load_config_with_options(Some(project_dir.path()), Some(user_dir.path())).unwrap();
        assert!(loaded.loaded_from().is_empty());
        assert_eq!(loaded.sources.len(), 2);
        assert!(loaded.config.planner.is_none());
    }

    #[test]
    fn test_project_layer_overrides_user_layer() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(
            user_dir.path().join(USER_CONFIG_FILE),
            "[planner]\nbase_url = \"http://user:5000\"\n\n[server]\nbind_address = \"0.0.0.0:9999\"\n",
        )
        .unwrap();
        fs::write(
            project_dir.path().join(PROJECT_CONFIG_FILE),
            "[planner]\nbase_url = \"http://project:5000\"\n",
        )
        .unwrap();

        let loaded =
            load_config_with_options(Some(project_dir.path()), Some(user_dir.path())).unwrap();
        assert_eq!(loaded.loaded_from().len(), 2);
        assert_eq!(loaded.config.planner().base_url, "http://project:5000");
        assert_eq!(loaded.config.server().bind_address, "0.0.0.0:9999");
    }

    #[test]
    fn test_unparseable_layer_becomes_warning() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(project_dir.path().join(PROJECT_CONFIG_FILE), "not toml [").unwrap();

        let loaded =
            load_config_with_options(Some(project_dir.path()), Some(user_dir.path())).unwrap();
        assert!(loaded.loaded_from().is_empty());
        assert_eq!(loaded.warnings.len(), 1);
    }

    #[test]
    fn test_plaintext_token_warns() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(
            project_dir.path().join(PROJECT_CONFIG_FILE),
            "[graph_api]\naccess_token = \"EAAG...\"\n",
        )
        .unwrap();

        let loaded =
            load_config_with_options(Some(project_dir.path()), Some(user_dir.path())).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("FB_ACCESS_TOKEN"));
    }

    #[test]
    fn test_read_failure_names_the_path() {
        let err = load_config_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = WhatsflowConfig::new();
        config.planner = Some(crate::PlannerSection {
            base_url: "http://saved:5000".to_string(),
            ..Default::default()
        });
        save_config(&config, &path).unwrap();

        let reloaded = load_config_file(&path).unwrap();
        assert_eq!(reloaded.planner().base_url, "http://saved:5000");
    }
}
