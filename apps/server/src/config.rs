use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    /// Raw JWT signing secret; a random one is generated when unset.
    pub jwt_secret: Option<String>,
    pub token_ttl: Duration,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("POS_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid POS_LISTEN_ADDR")?;
        let db_path = std::env::var("POS_DB_PATH").unwrap_or_else(|_| "./db/pos.db".into());
        let cors_allow = std::env::var("POS_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("POS_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let static_dir = std::env::var("POS_STATIC_DIR").unwrap_or_else(|_| "dist".into());
        let ttl_minutes: u64 = std::env::var("POS_TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "480".into())
            .parse()
            .unwrap_or(480);
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir,
            jwt_secret: optional_var("POS_JWT_SECRET"),
            token_ttl: Duration::from_secs(ttl_minutes * 60),
            admin_email: optional_var("POS_ADMIN_EMAIL"),
            admin_password: optional_var("POS_ADMIN_PASSWORD"),
            admin_name: optional_var("POS_ADMIN_NAME").unwrap_or_else(|| "Administrator".into()),
        })
    }
}
