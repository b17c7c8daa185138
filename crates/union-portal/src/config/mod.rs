use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::auth::otp::OtpPolicy;
use crate::auth::session::AdminCredentials;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub admin: AdminConfig,
    pub otp: OtpConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let admin_phone =
            env::var("PORTAL_ADMIN_PHONE").unwrap_or_else(|_| "09000000000".to_string());
        let admin_national_id =
            env::var("PORTAL_ADMIN_NATIONAL_ID").unwrap_or_else(|_| "0000000000".to_string());

        let resend_cooldown_secs = seconds_var("PORTAL_OTP_COOLDOWN_SECS", 120)?;
        let code_ttl_secs = seconds_var("PORTAL_OTP_TTL_SECS", 300)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            admin: AdminConfig {
                phone_number: admin_phone,
                national_id: admin_national_id,
            },
            otp: OtpConfig {
                resend_cooldown_secs,
                code_ttl_secs,
            },
        })
    }
}

fn seconds_var(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ConfigError::InvalidSeconds { name }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Reserved credential pair classified as the admin actor. Deployment
/// policy; the gate consumes it at session issuance.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub phone_number: String,
    pub national_id: String,
}

impl AdminConfig {
    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials {
            phone_number: self.phone_number.clone(),
            national_id: self.national_id.clone(),
        }
    }
}

/// One-time-code issuance windows.
#[derive(Debug, Clone, Copy)]
pub struct OtpConfig {
    pub resend_cooldown_secs: i64,
    pub code_ttl_secs: i64,
}

impl OtpConfig {
    pub fn policy(&self) -> OtpPolicy {
        OtpPolicy {
            resend_cooldown_secs: self.resend_cooldown_secs,
            code_ttl_secs: self.code_ttl_secs,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSeconds { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSeconds { name } => {
                write!(f, "{name} must be a positive number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSeconds { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
