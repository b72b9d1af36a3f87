//! ecom-config - 配置加载库
//!
//! 加载顺序（后者覆盖前者）：
//! 1. `{config_dir}/default.toml`
//! 2. `{config_dir}/{APP_ENV}.toml`
//! 3. 兼容旧部署的环境变量（`DB_USER`、`DB_PASS`、`SVC_ADDR` 等）
//! 4. `ECOM_` 前缀的环境变量，层级用 `__` 分隔（如 `ECOM_DATABASE__HOST`）
//!
//! 工作目录下的 `.env` 文件会先被读入进程环境，文件不存在不算错误。

use std::net::SocketAddr;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Failed to read .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Secret<String>,
    pub name: String,
    /// 连接池上限，耗尽后新请求最多等待 `acquire_timeout_secs`
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    /// 启动时执行内嵌迁移
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: String::new(),
            password: Secret::new(String::new()),
            name: "ecom".to_string(),
            max_connections: default_max_connections(),
            min_connections: 1,
            acquire_timeout_secs: 5,
            run_migrations: true,
        }
    }
}

fn default_max_connections() -> u32 {
    // 开发环境 10，生产环境 50
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// 拼接连接 URL（含密码，因此包在 Secret 里）
    pub fn url(&self) -> Secret<String> {
        Secret::new(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.name
        ))
    }
}

/// JWT 配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    /// 令牌有效期（秒）
    pub expires_in: u64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: Secret::new(String::new()),
            expires_in: 3600,
            issuer: "ecom".to_string(),
            audience: "ecom-api".to_string(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http_addr: String,
    pub grpc_addr: String,
    /// 单个请求的处理时限（秒），传输层据此构造请求上下文
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            grpc_addr: "0.0.0.0:9091".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn http_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr("server.http_addr", &self.http_addr)
    }

    pub fn grpc_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr("server.grpc_addr", &self.grpc_addr)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_addr(key: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::Invalid(format!("{key} `{value}` is not a socket address: {e}")))
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// 为空时生产环境输出 JSON，其余环境输出可读格式
    pub json: Option<bool>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: None,
        }
    }
}

/// 商品目录业务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 列表接口单页最大条数
    pub max_page_size: u32,
    /// 启动时确保存在的管理员账号；两项都设置才生效
    pub admin_email: Option<String>,
    pub admin_password: Option<Secret<String>>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            admin_email: None,
            admin_password: None,
        }
    }
}

impl CatalogConfig {
    /// 初始管理员的邮箱和密码
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.expose_secret().as_str())),
            _ => None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_app_name() -> String {
    "ecom".to_string()
}

fn default_app_env() -> String {
    "development".to_string()
}

/// 旧部署使用的环境变量名
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("APP_NAME", "app_name"),
    ("APP_ENV", "app_env"),
    ("DB_USER", "database.user"),
    ("DB_PASS", "database.password"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_NAME", "database.name"),
    ("DB_MAX_CONNECTIONS", "database.max_connections"),
    ("JWT_SECRET", "jwt.secret"),
    ("HTTP_ADDR", "server.http_addr"),
    ("SVC_ADDR", "server.grpc_addr"),
    ("LOG_LEVEL", "telemetry.log_level"),
    ("ADMIN_EMAIL", "catalog.admin_email"),
    ("ADMIN_PASSWORD", "catalog.admin_password"),
];

fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(legacy, _)| key.as_str().eq_ignore_ascii_case(legacy))
            .map(|(_, path)| (*path).into())
    })
}

impl AppConfig {
    /// 从 .env、配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        Self::from_figment(Self::figment(config_dir))
    }

    /// 组装配置源，不做提取
    pub fn figment(config_dir: &str) -> Figment {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(legacy_env())
            .merge(Env::prefixed("ECOM_").split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// 启动前校验；签名密钥长度由令牌服务在构造时校验
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.user.trim().is_empty()
            || self.database.password.expose_secret().is_empty()
            || self.database.name.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "database credentials are not set (database.user, database.password, database.name)"
                    .to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid(
                "database.min_connections must not exceed database.max_connections".to_string(),
            ));
        }
        if self.jwt.expires_in == 0 {
            return Err(ConfigError::Invalid(
                "jwt.expires_in must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.catalog.max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "catalog.max_page_size must be greater than 0".to_string(),
            ));
        }
        self.server.http_socket_addr()?;
        self.server.grpc_socket_addr()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }

    /// 是否输出 JSON 日志
    pub fn json_logs(&self) -> bool {
        self.telemetry.json.unwrap_or_else(|| self.is_production())
    }
}

#[cfg(test)]
mod tests;
