use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use anyhow::Context;
use serde::Deserialize;

/// Secret used when `JWT_SECRET` is not configured. Only acceptable for local development.
pub const DEV_JWT_SECRET: &str = "resume-vault-insecure-development-secret";

const DEFAULT_TTL_HOURS: i64 = 72;

/// Where the token signing secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SecretSource {
    Env,
    DevelopmentDefault,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub secret_source: SecretSource,
    pub ttl_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            secret_source: SecretSource::Env,
            ttl_hours: DEFAULT_TTL_HOURS,
        }
    }

    pub fn development_default() -> Self {
        Self {
            secret: DEV_JWT_SECRET.into(),
            secret_source: SecretSource::DevelopmentDefault,
            ttl_hours: DEFAULT_TTL_HOURS,
        }
    }

    pub fn uses_development_secret(&self) -> bool {
        self.secret_source == SecretSource::DevelopmentDefault
    }
}

/// What deleting a resume does to the stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// The row is removed.
    #[default]
    Hard,
    /// The row is tombstoned with `deleted_at` and hidden from every query.
    Soft,
}

impl FromStr for DeletePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(Self::Hard),
            "soft" => Ok(Self::Soft),
            other => anyhow::bail!("unknown delete policy {other:?}, expected \"hard\" or \"soft\""),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown store {other:?}, expected \"postgres\" or \"memory\""),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_env: String,
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub delete_policy: DeletePolicy,
    pub cors_origins: Vec<String>,
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let store = match std::env::var("STORE") {
            Ok(v) => v.parse::<StoreKind>()?,
            Err(_) => StoreKind::Postgres,
        };
        let database_url = std::env::var("DATABASE_URL").ok();
        if store == StoreKind::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when STORE=postgres");
        }

        let mut jwt = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => JwtConfig::new(secret),
            _ => JwtConfig::development_default(),
        };
        if let Ok(v) = std::env::var("JWT_TTL_HOURS") {
            jwt.ttl_hours = v
                .parse::<i64>()
                .with_context(|| format!("JWT_TTL_HOURS is not an integer: {v:?}"))?;
            anyhow::ensure!(jwt.ttl_hours > 0, "JWT_TTL_HOURS must be positive");
        }

        let delete_policy = match std::env::var("RESUME_DELETE_POLICY") {
            Ok(v) => v.parse::<DeletePolicy>()?,
            Err(_) => DeletePolicy::default(),
        };

        let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let listen_addr = listen_addr(
            &std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            &std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into()),
        )?;

        Ok(Self {
            app_env,
            store,
            database_url,
            jwt,
            delete_policy,
            cors_origins,
            listen_addr,
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }

    /// Logs the signing-secret fallback. Louder outside development.
    pub fn warn_on_insecure_defaults(&self) {
        if !self.jwt.uses_development_secret() {
            return;
        }
        if self.is_development() {
            tracing::warn!("JWT_SECRET is not set; signing tokens with the development default");
        } else {
            tracing::error!(
                app_env = %self.app_env,
                "JWT_SECRET is not set; signing tokens with the development default in a non-development deployment"
            );
        }
    }
}

fn listen_addr(host: &str, port: &str) -> anyhow::Result<SocketAddr> {
    let port: u16 = port
        .trim()
        .parse()
        .with_context(|| format!("APP_PORT is not a port number: {port:?}"))?;
    let ip: IpAddr = host
        .trim()
        .parse()
        .with_context(|| format!("APP_HOST is not an IP address: {host:?}"))?;
    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_policy_parses_case_insensitively() {
        assert_eq!("hard".parse::<DeletePolicy>().unwrap(), DeletePolicy::Hard);
        assert_eq!(" Soft ".parse::<DeletePolicy>().unwrap(), DeletePolicy::Soft);
        assert!("archive".parse::<DeletePolicy>().is_err());
        assert_eq!(DeletePolicy::default(), DeletePolicy::Hard);
    }

    #[test]
    fn store_kind_rejects_unknown_values() {
        assert_eq!("memory".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert_eq!("POSTGRES".parse::<StoreKind>().unwrap(), StoreKind::Postgres);
        assert!("sqlite".parse::<StoreKind>().is_err());
    }

    #[test]
    fn development_default_is_flagged() {
        let cfg = JwtConfig::development_default();
        assert!(cfg.uses_development_secret());
        assert_eq!(cfg.secret, DEV_JWT_SECRET);
        assert_eq!(cfg.ttl_hours, 72);

        let cfg = JwtConfig::new("from-env");
        assert!(!cfg.uses_development_secret());
    }

    #[test]
    fn listen_addr_combines_host_and_port() {
        let addr = listen_addr("127.0.0.1", " 9000 ").unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:9000");
        assert!(listen_addr("0.0.0.0", "http").is_err());
        assert!(listen_addr("localhost:1", "8080").is_err());
    }
}
