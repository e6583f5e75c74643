//! Layered configuration for the `fob-surface` command.
//!
//! Priority: CLI flags > `FOB_SURFACE_*` environment > config file > defaults.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use fob_surface::ExposureSource;
use fob_surface::config::{DEFAULT_CONFIG_GLOB, DEFAULT_MAX_MODULES};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cli::Cli;
use crate::error::{ConfigError, Result};

/// Config file looked up in the package directory when `--config` is absent.
pub const CONFIG_FILE: &str = "fob-surface.config.json";

/// Environment variable prefix (`FOB_SURFACE_OUT_DIR`, `FOB_SURFACE_MAX_MODULES`, ...).
pub const ENV_PREFIX: &str = "FOB_SURFACE_";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposes: Option<IndexMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposes_config: Option<PathBuf>,

    #[serde(default = "default_config_glob")]
    pub config_glob: String,

    #[serde(default = "default_max_modules")]
    pub max_modules: usize,

    /// Print the report JSON to stdout.
    #[serde(default = "default_echo")]
    pub echo: bool,
}

/// Only the flags the user actually passed.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exposes: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exposes_config: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_glob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_modules: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    echo: Option<bool>,
}

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("reports")
}

pub fn default_config_glob() -> String {
    DEFAULT_CONFIG_GLOB.to_string()
}

pub fn default_max_modules() -> usize {
    DEFAULT_MAX_MODULES
}

pub fn default_echo() -> bool {
    true
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            exposes: None,
            exposes_config: None,
            config_glob: default_config_glob(),
            max_modules: default_max_modules(),
            echo: default_echo(),
        }
    }
}

impl SurfaceConfig {
    /// Load configuration for a run against `package_root`.
    pub fn load(args: &Cli, package_root: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match &args.config {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.clone()).into()),
            Some(path) => Some(path.clone()),
            None => {
                let default_path = package_root.join(CONFIG_FILE);
                default_path.is_file().then_some(default_path)
            }
        };
        if let Some(path) = config_file {
            figment = figment.merge(Json::file(path));
        }

        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .map(|key| env_key_to_field(key.as_str()).into())
                .lowercase(false),
        );

        figment = figment.merge(Serialized::defaults(CliOverrides::from_args(args)));

        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: format!("Check {CONFIG_FILE} syntax and field types"),
            }
            .into()
        })
    }

    /// Pick the exposure mode.
    ///
    /// Exactly one of `exposes` / `exposesConfig` selects that mode. Both
    /// together fall back to discovery restricted to the named file;
    /// neither means glob discovery.
    pub fn exposure_source(&self) -> ExposureSource {
        match (&self.exposes, &self.exposes_config) {
            (Some(map), None) => ExposureSource::Explicit(map.clone()),
            (Some(_), Some(config)) => {
                warn!(
                    config = %config.display(),
                    "both an exposure map and an exposure config were given; scanning the config file"
                );
                ExposureSource::Discover {
                    config: Some(config.clone()),
                    glob: self.config_glob.clone(),
                }
            }
            (None, config) => ExposureSource::Discover {
                config: config.clone(),
                glob: self.config_glob.clone(),
            },
        }
    }
}

impl CliOverrides {
    fn from_args(args: &Cli) -> Self {
        Self {
            out_dir: args.out_dir.clone(),
            exposes: args.exposes.clone(),
            exposes_config: args.exposes_config.clone(),
            config_glob: args.config_glob.clone(),
            max_modules: args.max_modules,
            echo: args.no_echo.then_some(false),
        }
    }
}

/// `OUT_DIR` → `outDir`.
fn env_key_to_field(key: &str) -> String {
    let mut field = String::with_capacity(key.len());
    for (i, part) in key.split('_').filter(|part| !part.is_empty()).enumerate() {
        let lower = part.to_ascii_lowercase();
        if i == 0 {
            field.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                field.push(first.to_ascii_uppercase());
                field.push_str(chars.as_str());
            }
        }
    }
    field
}
