use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins, comma separated. Any origin when unset.
    pub cors_origins: Option<String>,

    /// Directory holding the drafts file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding index.html and the assets/ tree
    #[serde(default = "default_static_root")]
    pub static_root: PathBuf,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("✅ Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("❌ Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Location of the single JSON document holding every draft
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("drafts.json")
    }

    /// Parsed CORS origins, `None` meaning any origin is allowed
    pub fn cors_origin_list(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_origins
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() {
            None
        } else {
            Some(origins)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: None,
            data_dir: default_data_dir(),
            static_root: default_static_root(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_static_root() -> PathBuf {
    PathBuf::from(".")
}
