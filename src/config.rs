use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure for the SmartCV client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Where the backend base URL comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Environment variable holding an explicit backend URL override
    pub override_var: String,
    /// Environment variable a cloud workspace host injects with its own URL
    pub workspace_var: String,
    /// Port the backend listens on inside the workspace
    pub backend_port: u16,
    /// Used when no other source yields a value
    pub fallback_url: String,
    /// Host fragment identifying a prediction-style (array payload) backend
    pub predict_host_fragment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub user_agent: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            override_var: "SMARTCV_BACKEND_URL".to_string(),
            workspace_var: "GITPOD_WORKSPACE_URL".to_string(),
            backend_port: 8000,
            fallback_url: "http://localhost:8000".to_string(),
            predict_host_fragment: ".gradio.live".to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("smartcv-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = [
            ".env",    // Current directory
            "../.env", // Parent directory
        ];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("SMARTCV_CONFIG_PATH").unwrap_or_else(|_| "smartcv.yaml".to_string());

        let mut config = Self::from_file(&config_path);
        config.apply_env_overrides(|key| env::var(key).ok());

        // Validate configuration - log warnings but don't fail
        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    fn from_file(config_path: &str) -> Self {
        if !Path::new(config_path).exists() {
            tracing::debug!("Config file not found at {} - using defaults", config_path);
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", config_path);
                    config
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to parse config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!(
                    "Failed to read config file {}: {} - using defaults",
                    config_path,
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(var) = lookup("SMARTCV_OVERRIDE_VAR") {
            self.endpoint.override_var = var;
        }
        if let Some(var) = lookup("SMARTCV_WORKSPACE_VAR") {
            self.endpoint.workspace_var = var;
        }
        if let Some(port) = lookup("SMARTCV_BACKEND_PORT") {
            match port.parse() {
                Ok(port_num) => self.endpoint.backend_port = port_num,
                Err(_) => tracing::warn!("Ignoring invalid SMARTCV_BACKEND_PORT: {}", port),
            }
        }
        if let Some(url) = lookup("SMARTCV_FALLBACK_URL") {
            self.endpoint.fallback_url = url;
        }
        if let Some(fragment) = lookup("SMARTCV_PREDICT_HOST_FRAGMENT") {
            self.endpoint.predict_host_fragment = fragment;
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.endpoint.backend_port == 0 {
            return Err("endpoint.backend_port cannot be 0".into());
        }
        if self.endpoint.override_var.trim().is_empty() {
            return Err("endpoint.override_var is empty; explicit overrides are disabled".into());
        }
        if self.endpoint.fallback_url.trim().is_empty() {
            return Err(
                "endpoint.fallback_url is empty; submissions will fail without an override".into(),
            );
        }
        if self.endpoint.predict_host_fragment.trim().is_empty() {
            return Err("endpoint.predict_host_fragment cannot be empty".into());
        }
        Ok(())
    }
}
