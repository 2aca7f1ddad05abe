use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

use crate::service::ServiceVariant;

/// Origin allowed to call the documented service cross-origin by default.
pub const DEFAULT_ALLOWED_ORIGIN: &str =
    "vscode-webview://1f6ukv751kufrd8aitq58rbkqn8scflggesvhor0jlnh4gh96mac";

/// Hosting environment. Documentation endpoints are only served in development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown environment '{0}'. Expected 'development' or 'production'.")]
pub struct UnknownEnvironment(pub String);

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

/// Server configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// listen = "127.0.0.1:5252"
/// environment = "development"
/// service = "validated"
/// allowed_origin = "https://example.com"
/// https_port = 7252
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: SocketAddr,
    pub environment: Environment,
    pub service: ServiceVariant,
    /// The single origin the documented service accepts cross-origin calls from.
    pub allowed_origin: String,
    /// Plain-HTTP requests are redirected here when set.
    pub https_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 5252)),
            environment: Environment::default(),
            service: ServiceVariant::default(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            https_port: None,
        }
    }
}

/// Values that take precedence over the file, usually from flags or env vars.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub listen: Option<SocketAddr>,
    pub environment: Option<Environment>,
    pub service: Option<ServiceVariant>,
    pub allowed_origin: Option<String>,
    pub https_port: Option<u16>,
}

impl Config {
    /// Load config from the platform config directory, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from `path`, or defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-samples", "weather-api")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply every override that is set.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(listen) = overrides.listen {
            self.listen = listen;
        }
        if let Some(environment) = overrides.environment {
            self.environment = environment;
        }
        if let Some(service) = overrides.service {
            self.service = service;
        }
        if let Some(origin) = overrides.allowed_origin {
            self.allowed_origin = origin;
        }
        if let Some(port) = overrides.https_port {
            self.https_port = Some(port);
        }
    }

    pub fn docs_enabled(&self) -> bool {
        self.environment.is_development()
    }
}
