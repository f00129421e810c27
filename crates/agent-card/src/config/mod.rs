use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub assets: AssetsConfig,
    pub mail: MailConfig,
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
        let public_dir = env::var("APP_PUBLIC_DIR").unwrap_or_else(|_| "public".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assets: AssetsConfig {
                public_dir: PathBuf::from(public_dir),
            },
            mail: MailConfig::from_env(),
        })
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

/// Location of static files served alongside the API (pre-rendered vCards).
#[derive(Debug, Clone)]
pub struct AssetsConfig {
    pub public_dir: PathBuf,
}

/// Raw SMTP settings as read from the environment.
///
/// Every field is optional at load time: the service boots without mail
/// settings and only fails when a lead notification is actually sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailConfig {
    pub host: Option<String>,
    pub port: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub secure: bool,
    pub notify_to: Option<String>,
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            host: non_empty_var("SMTP_HOST"),
            port: non_empty_var("SMTP_PORT"),
            user: non_empty_var("SMTP_USER"),
            password: non_empty_var("SMTP_PASS"),
            secure: env::var("SMTP_SECURE")
                .map(|value| value.trim() == "true")
                .unwrap_or(false),
            notify_to: non_empty_var("NOTIFY_TO"),
        }
    }

    /// Resolve the settings needed to deliver a notification.
    pub fn resolve(&self) -> Result<SmtpSettings, ConfigError> {
        let notify_to = self
            .notify_to
            .clone()
            .ok_or(ConfigError::MissingVar("NOTIFY_TO"))?;
        let host = self.host.clone().ok_or(ConfigError::SmtpIncomplete)?;
        let port = self.port.as_deref().ok_or(ConfigError::SmtpIncomplete)?;
        let user = self.user.clone().ok_or(ConfigError::SmtpIncomplete)?;
        let password = self.password.clone().ok_or(ConfigError::SmtpIncomplete)?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidSmtpPort)?;

        Ok(SmtpSettings {
            host,
            port,
            user,
            password,
            secure: self.secure,
            notify_to,
        })
    }
}

/// Complete SMTP settings; only constructed through [`MailConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub secure: bool,
    pub notify_to: String,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    SmtpIncomplete,
    InvalidSmtpPort,
    MissingVar(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::SmtpIncomplete => write!(
                f,
                "SMTP configuration is incomplete: set SMTP_HOST, SMTP_PORT, SMTP_USER and SMTP_PASS"
            ),
            ConfigError::InvalidSmtpPort => write!(f, "SMTP_PORT must be a valid u16"),
            ConfigError::MissingVar(name) => {
                write!(f, "{name} environment variable is not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::SmtpIncomplete
            | ConfigError::InvalidSmtpPort
            | ConfigError::MissingVar(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_PUBLIC_DIR",
            "SMTP_HOST",
            "SMTP_PORT",
            "SMTP_USER",
            "SMTP_PASS",
            "SMTP_SECURE",
            "NOTIFY_TO",
        ] {
            env::remove_var(name);
        }
    }

    fn complete_mail() -> MailConfig {
        MailConfig {
            host: Some("smtp.example.test".to_string()),
            port: Some("587".to_string()),
            user: Some("robot@example.test".to_string()),
            password: Some("secret".to_string()),
            secure: false,
            notify_to: Some("agent@example.test".to_string()),
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.assets.public_dir, PathBuf::from("public"));
        assert_eq!(config.mail, MailConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn reads_smtp_settings_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SMTP_HOST", "smtp.example.test");
        env::set_var("SMTP_PORT", "465");
        env::set_var("SMTP_USER", "robot@example.test");
        env::set_var("SMTP_PASS", "secret");
        env::set_var("SMTP_SECURE", "true");
        env::set_var("NOTIFY_TO", "agent@example.test");

        let settings = MailConfig::from_env().resolve().expect("complete settings");
        assert_eq!(settings.port, 465);
        assert!(settings.secure);
        assert_eq!(settings.notify_to, "agent@example.test");
        reset_env();
    }

    #[test]
    fn resolve_rejects_missing_credentials() {
        let mut mail = complete_mail();
        mail.password = None;
        assert!(matches!(mail.resolve(), Err(ConfigError::SmtpIncomplete)));
    }

    #[test]
    fn resolve_requires_notification_address() {
        let mut mail = complete_mail();
        mail.notify_to = None;
        assert!(matches!(
            mail.resolve(),
            Err(ConfigError::MissingVar("NOTIFY_TO"))
        ));
    }

    #[test]
    fn resolve_rejects_non_numeric_port() {
        let mut mail = complete_mail();
        mail.port = Some("smtp".to_string());
        assert!(matches!(mail.resolve(), Err(ConfigError::InvalidSmtpPort)));
    }
}
