use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// MongoDB connection settings.
///
/// Either `url` is given directly, or it is derived from `user`/`password`/`cluster`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_cluster")]
    pub cluster: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_services_collection")]
    pub services_collection: String,
    #[serde(default = "default_bookings_collection")]
    pub bookings_collection: String,
}

fn default_cluster() -> String {
    "cluster0.xfw1t3g.mongodb.net".into()
}

fn default_db_name() -> String {
    "car-doctor".into()
}

fn default_services_collection() -> String {
    "services".into()
}

fn default_bookings_collection() -> String {
    "booking".into()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            user: String::new(),
            password: String::new(),
            cluster: default_cluster(),
            name: default_db_name(),
            services_collection: default_services_collection(),
            bookings_collection: default_bookings_collection(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_true")]
    pub protect_booking_list: bool,
    /// Gate booking create/update/delete as well.
    #[serde(default)]
    pub protect_booking_writes: bool,
}

fn default_token_ttl() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            protect_booking_list: true,
            protect_booking_writes: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` if present (defaults otherwise), apply environment overrides, validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from environment-style lookups; blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") { self.server.host = host; }
        if let Some(port) = get("PORT").and_then(|p| p.parse::<u16>().ok()) { self.server.port = port; }
        if let Some(w) = get("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }

        if let Some(url) = get("MONGODB_URI") { self.database.url = url; }
        if let Some(user) = get("DB_USER") { self.database.user = user; }
        if let Some(password) = get("DB_PASSWORD") { self.database.password = password; }
        if let Some(cluster) = get("DB_CLUSTER") { self.database.cluster = cluster; }
        if let Some(name) = get("DB_NAME") { self.database.name = name; }

        if let Some(secret) = get("ACCESS_TOKEN_SECRET") { self.auth.jwt_secret = secret; }
        if let Some(ttl) = get("TOKEN_TTL_SECS").and_then(|v| v.parse::<u64>().ok()) {
            self.auth.token_ttl_secs = ttl;
        }
        if let Some(flag) = get("PROTECT_BOOKING_LIST").and_then(|v| parse_flag(&v)) {
            self.auth.protect_booking_list = flag;
        }
        if let Some(flag) = get("PROTECT_BOOKING_WRITES").and_then(|v| parse_flag(&v)) {
            self.auth.protect_booking_writes = flag;
        }

        if let Some(format) = get("LOG_FORMAT") {
            self.log.format = if format.eq_ignore_ascii_case("json") { LogFormat::Json } else { LogFormat::Compact };
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .map_or(false, |e| e.kind() == std::io::ErrorKind::NotFound)
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Connection string: the explicit `url`, or an Atlas SRV url built from credentials.
    pub fn connection_url(&self) -> Option<String> {
        if !self.url.trim().is_empty() {
            return Some(self.url.trim().to_string());
        }
        if self.user.trim().is_empty() || self.password.trim().is_empty() {
            return None;
        }
        Some(format!(
            "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
            self.user, self.password, self.cluster
        ))
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.connection_url().ok_or_else(|| {
            anyhow!("database url missing; set MONGODB_URI, or DB_USER and DB_PASSWORD")
        })?;
        let lower = url.to_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            return Err(anyhow!("database.url must start with mongodb:// or mongodb+srv://"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("database.name must not be empty"));
        }
        if self.services_collection.trim().is_empty() || self.bookings_collection.trim().is_empty() {
            return Err(anyhow!("collection names must not be empty"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret missing; set ACCESS_TOKEN_SECRET"));
        }
        if self.token_ttl_secs == 0 {
            return Err(anyhow!("auth.token_ttl_secs must be positive"));
        }
        Ok(())
    }
}
