//! Configuración del servicio leída desde variables de entorno (y `.env`).

use std::env;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_PATH: &str = "data/planta.db";
pub const DEFAULT_CLIENT: &str = "SIN CLIENTE";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 25;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("valor inválido para {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Dónde viven los pedidos: archivo sqlite local o Postgres remoto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    Sqlite(PathBuf),
    Postgres(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db: DbTarget,
    pub default_client: String,
    pub default_carrier: String,
    pub max_upload_bytes: usize,
}

/// Resuelve el destino de la base de datos. Honra PLAN_DB_PATH y PLAN_DB_URL
/// (sqlite://, file:// o postgres://).
pub fn resolve_db_target(path: Option<String>, url: Option<String>) -> DbTarget {
    if let Some(p) = path {
        return DbTarget::Sqlite(PathBuf::from(p));
    }
    match url {
        Some(u) if u.starts_with("postgres://") || u.starts_with("postgresql://") => DbTarget::Postgres(u),
        Some(u) if u.starts_with("sqlite://") => DbTarget::Sqlite(PathBuf::from(u.trim_start_matches("sqlite://"))),
        Some(u) if u.starts_with("file://") => DbTarget::Sqlite(PathBuf::from(u.trim_start_matches("file://"))),
        _ => DbTarget::Sqlite(PathBuf::from(DEFAULT_DB_PATH)),
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        let _ = dotenv::dotenv();

        let max_upload_mb = match env::var("PLAN_MAX_UPLOAD_MB") {
            Ok(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid { var: "PLAN_MAX_UPLOAD_MB", value: v.clone() })?,
            Err(_) => DEFAULT_MAX_UPLOAD_MB,
        };

        Ok(Config {
            bind_addr: env::var("PLAN_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            db: resolve_db_target(env::var("PLAN_DB_PATH").ok(), env::var("PLAN_DB_URL").ok()),
            default_client: env::var("PLAN_DEFAULT_CLIENT").unwrap_or_else(|_| DEFAULT_CLIENT.to_string()),
            default_carrier: env::var("PLAN_DEFAULT_CARRIER")
                .unwrap_or_else(|_| crate::excel::DEFAULT_CARRIER.to_string()),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND.to_string(),
            db: DbTarget::Sqlite(PathBuf::from(DEFAULT_DB_PATH)),
            default_client: DEFAULT_CLIENT.to_string(),
            default_carrier: crate::excel::DEFAULT_CARRIER.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}
