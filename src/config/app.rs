use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Budget for a single plan generation request.
    pub plan_timeout_ms: u64,
    /// JSON catalog replacing the built-in classes when set.
    pub catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            plan_timeout_ms: 2000,
            catalog_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(defaults.port);
        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);
        let plan_timeout_ms = env::var("PLAN_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()?;
        let catalog_path = env::var("CATALOG_PATH").ok().map(PathBuf::from);

        Ok(AppConfig {
            host,
            port,
            log_level,
            plan_timeout_ms,
            catalog_path,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn plan_timeout(&self) -> Duration {
        Duration::from_millis(self.plan_timeout_ms)
    }
}
