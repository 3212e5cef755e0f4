use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub database: DatabaseConfig,

    pub server: ServerConfig,

    pub search: SearchConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// "sqlite" or "postgres"
    pub backend: String,

    /// SQLite database file, used when `backend = "sqlite"`.
    /// A full `sqlite:` URL is passed through unchanged.
    pub path: String,

    pub host: String,

    pub port: u16,

    pub user: String,

    pub password: String,

    pub name: String,

    /// Maximum database connections (default: 5)
    pub max_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            path: "data/jobs.db".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "job_tracker".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

impl DatabaseConfig {
    /// Connection URL for the configured backend.
    pub fn connection_url(&self) -> Result<String> {
        match self.backend.as_str() {
            "sqlite" if self.path.starts_with("sqlite:") => Ok(self.path.clone()),
            "sqlite" => Ok(format!("sqlite://{}?mode=rwc", self.path)),
            "postgres" => {
                let mut url = url::Url::parse("postgres://localhost")
                    .context("Failed to build postgres URL")?;
                url.set_host(Some(&self.host))
                    .with_context(|| format!("Invalid database host: {}", self.host))?;
                url.set_port(Some(self.port))
                    .map_err(|()| anyhow::anyhow!("Invalid database port: {}", self.port))?;
                url.set_username(&self.user)
                    .map_err(|()| anyhow::anyhow!("Invalid database user: {}", self.user))?;
                if !self.password.is_empty() {
                    url.set_password(Some(&self.password))
                        .map_err(|()| anyhow::anyhow!("Invalid database password"))?;
                }
                url.set_path(&self.name);
                Ok(url.to_string())
            }
            other => anyhow::bail!("Unknown database backend: {other}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// `*` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the job search gateway (MCP server)
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9423".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    /// Loads `path`, or the first config file found (else defaults), then
    /// applies `.env` and process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_file()?,
        };

        dotenvy::dotenv().ok();
        config.apply_overrides_from(|key| std::env::var(key).ok());

        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies environment overrides using `lookup` to resolve variables.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(port) = get("SERVER_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %port, "Ignoring invalid SERVER_PORT"),
            }
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.general.log_level = level;
        }
        if let Some(path) = get("DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(backend) = get("DB_BACKEND") {
            self.database.backend = backend;
        }
        if let Some(host) = get("DB_HOST") {
            self.database.host = host;
            // Postgres settings in the environment imply the postgres backend.
            if lookup("DB_BACKEND").is_none() {
                self.database.backend = "postgres".to_string();
            }
        }
        if let Some(port) = get("DB_PORT") {
            match port.parse() {
                Ok(port) => self.database.port = port,
                Err(_) => warn!(value = %port, "Ignoring invalid DB_PORT"),
            }
        }
        if let Some(user) = get("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = get("DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(name) = get("DB_NAME") {
            self.database.name = name;
        }
        if let Some(url) = get("MCP_SERVER_URL") {
            self.search.base_url = url;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("job-tracker").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".job-tracker").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        url::Url::parse(&self.search.base_url)
            .with_context(|| format!("Invalid search gateway URL: {}", self.search.base_url))?;

        if self.search.request_timeout_seconds == 0 {
            anyhow::bail!("Search request timeout must be > 0");
        }

        match self.database.backend.as_str() {
            "sqlite" | "postgres" => {}
            other => anyhow::bail!("Unknown database backend: {other}"),
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be > 0");
        }

        Ok(())
    }
}
