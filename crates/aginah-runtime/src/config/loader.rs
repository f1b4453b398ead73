//! Layered configuration loading.
//!
//! Sources, lowest priority first:
//!
//! 1. the `#[serde(default)]` values of [`AginahConfig`]
//! 2. the profile variant of the main file (`aginah.production.toml` next to
//!    `aginah.toml`)
//! 3. the main file: the one given to [`ConfigLoader::file`], or else the
//!    first `aginah.*` / `config.*` found in the search directories
//! 4. `AGINAH_*` environment variables, `__` separating nested keys
//!    (`AGINAH_LOGGING__LEVEL=debug`, `AGINAH_ROLES__TIERS=[helper,moderator]`)
//! 5. [`ConfigLoader::set`] and [`ConfigLoader::merge`]
//!
//! TOML files are read with the default `toml-config` feature, YAML files
//! (`.yaml`, `.yml`) with `yaml-config`. Search directories default to the
//! working directory, then `<user config dir>/aginah`. `AGINAH_PROFILE`
//! picks the profile.
//!
//! ```rust,ignore
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .set("dev_mode", true)
//!     .load()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use figment::{Figment, Provider};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::AginahConfig;
use super::validation::validate_config;

const ENV_PREFIX: &str = "AGINAH_";
const PROFILE_VAR: &str = "AGINAH_PROFILE";

/// File stems probed in every search directory, in order.
const STEMS: [&str; 2] = ["aginah", "config"];

/// Extensions of the file formats compiled in.
const EXTENSIONS: &[&str] = &[
    #[cfg(feature = "toml-config")]
    "toml",
    #[cfg(feature = "yaml-config")]
    "yaml",
    #[cfg(feature = "yaml-config")]
    "yml",
];

/// Deployment profile selecting an optional variant of the main file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    /// Reads `AGINAH_PROFILE`, falling back to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|name| Self::from(name.as_str()))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for Profile {
    fn from(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "development" | "dev" => Self::Development,
            "production" | "prod" => Self::Production,
            _ => Self::Custom(name),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collects configuration sources and extracts an [`AginahConfig`].
pub struct ConfigLoader {
    profile: Profile,
    file: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
    env: bool,
    overrides: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            file: None,
            search_dirs: Vec::new(),
            env: true,
            overrides: Figment::new(),
        }
    }

    /// Overrides the profile taken from `AGINAH_PROFILE`.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::from(profile.as_ref());
        self
    }

    /// Uses this file as the main file instead of searching for one.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a search directory. Once one is added, the default directories
    /// are no longer searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_dirs.push(path.as_ref().to_path_buf());
        self
    }

    /// Ignores `AGINAH_*` environment variables.
    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    /// Overrides a single key, e.g. `set("logging.level", "debug")`.
    pub fn set<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Merges any figment provider on top of every other source.
    pub fn merge<P: Provider>(mut self, provider: P) -> Self {
        self.overrides = self.overrides.merge(provider);
        self
    }

    /// Loads the configuration and validates it.
    pub fn load(self) -> ConfigResult<AginahConfig> {
        let config = self.extract()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Loads the configuration without validating it.
    pub fn extract(self) -> ConfigResult<AginahConfig> {
        let profile = self.profile.clone();
        let config: AginahConfig = self.figment()?.extract()?;
        debug!(
            %profile,
            command_prefix = %config.command_prefix,
            dev_mode = config.dev_mode,
            tiers = ?config.roles.tiers,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::new();

        match self.main_file()? {
            Some(main) => {
                if let Some(variant) = profile_variant(&main, &self.profile) {
                    debug!(path = %variant.display(), "Loading profile configuration");
                    figment = merge_file(figment, &variant)?;
                }
                info!(path = %main.display(), "Loading configuration file");
                figment = merge_file(figment, &main)?;
            }
            None => warn!("No configuration file found, using defaults"),
        }

        if self.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["profile"]).split("__"));
        }
        Ok(figment.merge(self.overrides))
    }

    /// The explicit file, or the first candidate present in a search directory.
    fn main_file(&self) -> ConfigResult<Option<PathBuf>> {
        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            return Ok(Some(path.clone()));
        }

        let found = self
            .search_dirs()
            .iter()
            .flat_map(|dir| candidates(dir))
            .find(|path| path.exists());
        Ok(found)
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        if !self.search_dirs.is_empty() {
            return self.search_dirs.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join("aginah")))
            .collect()
    }
}

fn candidates(dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    STEMS.iter().flat_map(move |stem| {
        EXTENSIONS
            .iter()
            .map(move |ext| dir.join(format!("{stem}.{ext}")))
    })
}

/// `aginah.toml` becomes `aginah.<profile>.toml`, if that file exists.
fn profile_variant(main: &Path, profile: &Profile) -> Option<PathBuf> {
    let stem = main.file_stem()?.to_str()?;
    let ext = main.extension()?.to_str()?;
    let variant = main.with_file_name(format!("{stem}.{profile}.{ext}"));
    variant.exists().then_some(variant)
}

fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Loads and validates the configuration from the default locations.
pub fn load_config() -> ConfigResult<AginahConfig> {
    ConfigLoader::new().load()
}

/// Loads and validates the configuration from a specific file.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<AginahConfig> {
    ConfigLoader::new().file(path).load()
}
