use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service runs against the in-memory store.
    pub database_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub db_max_connections: u32,
    pub max_body_size: usize,
    pub max_page_size: u32,
    pub qr_module_size: u32,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let host: IpAddr = env_or("SCANAPI_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SCANAPI_HOST: {e}"))?;

        let port: u16 = env_or("SCANAPI_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid SCANAPI_PORT: {e}"))?;

        let db_max_connections: u32 = env_or("SCANAPI_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid SCANAPI_DB_MAX_CONNECTIONS: {e}"))?;

        let max_body_size: usize = env_or("SCANAPI_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid SCANAPI_MAX_BODY_SIZE: {e}"))?;

        let max_page_size: u32 = env_or("SCANAPI_MAX_PAGE_SIZE", "100")
            .parse()
            .map_err(|e| format!("Invalid SCANAPI_MAX_PAGE_SIZE: {e}"))?;
        if max_page_size == 0 {
            return Err("SCANAPI_MAX_PAGE_SIZE must be at least 1".to_string());
        }

        let qr_module_size: u32 = env_or("SCANAPI_QR_MODULE_SIZE", "10")
            .parse()
            .map_err(|e| format!("Invalid SCANAPI_QR_MODULE_SIZE: {e}"))?;
        if !(1..=64).contains(&qr_module_size) {
            return Err("SCANAPI_QR_MODULE_SIZE must be between 1 and 64".to_string());
        }

        let log_level = env_or("SCANAPI_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            db_max_connections,
            max_body_size,
            max_page_size,
            qr_module_size,
            log_level,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
