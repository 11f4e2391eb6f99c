use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, instrument};

use pathfs_base::{FsPath, PalHandle, PathStyle, PathfsResult, RealPal, ResultExt};

/// Separator convention selected in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleSetting {
    /// Whatever the host uses.
    #[default]
    Native,
    Windows,
    Posix,
}

impl From<StyleSetting> for PathStyle {
    fn from(setting: StyleSetting) -> Self {
        match setting {
            StyleSetting::Native => PathStyle::native(),
            StyleSetting::Windows => PathStyle::Windows,
            StyleSetting::Posix => PathStyle::Posix,
        }
    }
}

/// Configuration for opening a pathfs workspace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory that relative paths resolve against.
    #[serde(default = "default_base_directory")]
    pub base_directory: String,
    /// Separator convention for paths built from configuration values.
    #[serde(default)]
    pub path_style: StyleSetting,
}

fn default_base_directory() -> String {
    ".".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_directory: default_base_directory(),
            path_style: StyleSetting::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> PathfsResult<Config> {
        toml::from_str(text).map_err(|e| pathfs_base::err!("Invalid configuration: {}", e))
    }

    pub fn style(&self) -> PathStyle {
        self.path_style.into()
    }

    /// Build a path in the configured style.
    pub fn path(&self, text: impl Into<String>) -> FsPath {
        FsPath::with_style(text, self.style())
    }

    /// Open a PAL over the host filesystem rooted at `base_directory`.
    pub fn open_pal(&self) -> PalHandle {
        PalHandle::new(RealPal::new(PathBuf::from(&self.base_directory)))
    }
}

/// Load the configuration file at `path` through the given PAL.
///
/// # Examples
/// ```no_run
/// use pathfs_base::{FsPath, PalHandle, RealPal};
/// use pathfs_ops::load_config;
///
/// let pal = PalHandle::new(RealPal::default());
/// let config = load_config(&pal, &FsPath::from("pathfs.toml")).unwrap();
/// let workspace = config.open_pal();
/// ```
#[instrument(skip(pal), fields(path = %path))]
pub fn load_config(pal: &PalHandle, path: &FsPath) -> PathfsResult<Config> {
    let text = pal
        .read_file_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path))?;
    let config =
        Config::from_toml(&text).with_context(|| format!("Failed to parse config file '{}'", path))?;
    debug!(
        base_directory = %config.base_directory,
        path_style = ?config.path_style,
        "configuration loaded"
    );
    Ok(config)
}
