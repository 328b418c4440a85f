use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use crate::seo::SiteDefaults;

const DEV_JWT_SECRET: &str = "realty-site-development-secret";

/// Admin tokens live between one hour and one year.
pub const TOKEN_TTL_HOURS: RangeInclusive<i64> = 1..=8_760;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub site: SiteDefaults,
    pub auth: AuthConfig,
    pub notifications: NotificationConfig,
    /// Remote API consulted for SEO payloads when set; in-process stores otherwise.
    pub api_base_url: Option<String>,
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

        let site = SiteDefaults {
            base_url: optional("SITE_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            site_name: optional("SITE_NAME").unwrap_or_else(|| "Realty Site".to_string()),
            title: optional("SITE_DEFAULT_TITLE")
                .unwrap_or_else(|| "Realty Site | Homes, Villas & Apartments".to_string()),
            description: optional("SITE_DEFAULT_DESCRIPTION").unwrap_or_else(|| {
                "Find properties for sale and rent, market insights, and expert guidance."
                    .to_string()
            }),
            image: optional("SITE_DEFAULT_IMAGE")
                .unwrap_or_else(|| "/images/og-default.jpg".to_string()),
            twitter_handle: optional("SITE_TWITTER_HANDLE"),
        };

        let jwt_secret = match optional("JWT_SECRET") {
            Some(secret) => secret,
            None if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingJwtSecret)
            }
            None => DEV_JWT_SECRET.to_string(),
        };
        let auth = AuthConfig {
            jwt_secret,
            token_ttl_hours: parse_in_range("JWT_EXPIRES_IN_HOURS", 24, TOKEN_TTL_HOURS)?,
            admin_email: optional("ADMIN_EMAIL"),
            admin_password: optional("ADMIN_PASSWORD"),
        };

        let smtp = match (optional("SMTP_HOST"), optional("SMTP_FROM")) {
            (Some(host), Some(from)) => Some(SmtpConfig {
                host,
                port: parse_or("SMTP_PORT", 587)?,
                username: optional("SMTP_USER"),
                password: optional("SMTP_PASS"),
                from,
            }),
            _ => None,
        };

        let twilio = match (
            optional("TWILIO_ACCOUNT_SID"),
            optional("TWILIO_AUTH_TOKEN"),
            optional("TWILIO_WHATSAPP_FROM"),
        ) {
            (Some(account_sid), Some(auth_token), Some(whatsapp_from)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                whatsapp_from,
                api_base: optional("TWILIO_API_BASE")
                    .unwrap_or_else(|| "https://api.twilio.com".to_string()),
            }),
            _ => None,
        };

        let notifications = NotificationConfig {
            admin_email: optional("ADMIN_EMAIL"),
            admin_whatsapp: optional("ADMIN_WHATSAPP_TO"),
            smtp,
            twilio,
            outbound_timeout: Duration::from_secs(parse_or("OUTBOUND_TIMEOUT_SECS", 8)?),
            queue_capacity: parse_in_range("NOTIFICATION_QUEUE_CAPACITY", 256, 1..=65_536)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            site,
            auth,
            notifications,
            api_base_url: optional("API_BASE_URL"),
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        None => Ok(default),
    }
}

fn parse_in_range<T>(
    key: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd,
{
    let value = parse_or(key, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidNumber { key })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Token signing and the single admin account allowed to sign in.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("admin_email", &self.admin_email)
            .finish_non_exhaustive()
    }
}

/// Outbound notification channels. A channel left as `None` is skipped with a log line.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub admin_email: Option<String>,
    pub admin_whatsapp: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub twilio: Option<TwilioConfig>,
    pub outbound_timeout: Duration,
    /// Jobs waiting for the worker; intake past this is logged and dropped.
    pub queue_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            admin_whatsapp: None,
            smtp: None,
            twilio: None,
            outbound_timeout: Duration::from_secs(8),
            queue_capacity: 256,
        }
    }
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub whatsapp_from: String,
    pub api_base: String,
}

impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("whatsapp_from", &self.whatsapp_from)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    MissingJwtSecret,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => write!(f, "{key} must be a valid number"),
            ConfigError::MissingJwtSecret => {
                write!(f, "JWT_SECRET is required when APP_ENV=production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::MissingJwtSecret => None,
        }
    }
}
