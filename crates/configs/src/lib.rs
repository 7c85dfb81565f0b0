use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Where and how user records are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// `memory` or `file`
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Snapshot path for the `file` backend.
    #[serde(default = "default_store_path")]
    pub path: String,
    /// `plaintext` or `argon2`
    #[serde(default = "default_password_scheme")]
    pub password_scheme: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { backend: default_backend(), path: default_store_path(), password_scheme: default_password_scheme() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrontendConfig {
    #[serde(default = "default_frontend_dir")]
    pub dir: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self { dir: default_frontend_dir() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8081 }
fn default_backend() -> String { "file".into() }
fn default_store_path() -> String { "data/users.json".into() }
fn default_password_scheme() -> String { "plaintext".into() }
fn default_frontend_dir() -> String { "frontend".into() }
fn default_log_format() -> String { "compact".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file when present, otherwise defaults overlaid with
    /// `SERVER_HOST`, `SERVER_PORT`, `STORE_BACKEND`, `STORE_PATH`,
    /// `PASSWORD_SCHEME`, `FRONTEND_DIR` and `LOG_FORMAT`.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(_) => Self::from_env(),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(backend) = std::env::var("STORE_BACKEND") {
            cfg.store.backend = backend;
        }
        if let Ok(path) = std::env::var("STORE_PATH") {
            cfg.store.path = path;
        }
        if let Ok(scheme) = std::env::var("PASSWORD_SCHEME") {
            cfg.store.password_scheme = scheme;
        }
        if let Ok(dir) = std::env::var("FRONTEND_DIR") {
            cfg.frontend.dir = dir;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            cfg.logging.format = format;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.normalize_and_validate()?;
        if self.frontend.dir.trim().is_empty() {
            self.frontend.dir = default_frontend_dir();
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    fn normalize_and_validate(&mut self) -> Result<()> {
        self.backend = self.backend.trim().to_ascii_lowercase();
        self.password_scheme = self.password_scheme.trim().to_ascii_lowercase();
        match self.backend.as_str() {
            "memory" => {}
            "file" => {
                if self.path.trim().is_empty() {
                    return Err(anyhow!("store.path is required for the file backend"));
                }
            }
            other => return Err(anyhow!("store.backend must be `memory` or `file`, got `{other}`")),
        }
        if !matches!(self.password_scheme.as_str(), "plaintext" | "argon2") {
            return Err(anyhow!("store.password_scheme must be `plaintext` or `argon2`"));
        }
        Ok(())
    }

    /// Directory holding the snapshot, if any.
    pub fn data_dir(&self) -> Option<String> {
        if self.backend != "file" {
            return None;
        }
        std::path::Path::new(&self.path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .filter(|p| !p.is_empty())
    }
}
