use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Which stage the service is running in. Only logging verbosity and
/// startup banners differ between stages; behavior does not branch on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// Everything the listing platform reads from the environment, resolved
/// once at startup. Unset variables fall back to development defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub contact: ContactConfig,
    pub media: MediaConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(&env_or("APP_ENV", "development"));

        let server = ServerConfig {
            host: env_or("APP_HOST", "127.0.0.1"),
            port: env_or("APP_PORT", "3000")
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
        };

        let telemetry = TelemetryConfig {
            log_level: env_or("APP_LOG_LEVEL", "info"),
        };

        let contact = ContactConfig {
            admin_email: env_or("ADMIN_EMAIL", "bookings@propstack.local"),
            admin_mobile: env_or("ADMIN_MOBILE", "+910000000000"),
        };

        let media = MediaConfig {
            base_url: env_or("MEDIA_BASE_URL", "https://media.propstack.local"),
        };

        Ok(Self {
            environment,
            server,
            telemetry,
            contact,
            media,
        })
    }
}

/// Bind address for the HTTP listener.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Resolve the configured host and port into a socket address. The host
    /// must be a literal IP, except `localhost`, which maps to loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        match self.host.parse::<IpAddr>() {
            Ok(ip) => Ok(SocketAddr::new(ip, self.port)),
            Err(_) if self.host.eq_ignore_ascii_case("localhost") => {
                Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port))
            }
            Err(source) => Err(ConfigError::InvalidHost { source }),
        }
    }
}

/// Log filter level handed to the tracing subscriber.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where booking and enquiry notifications are delivered.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub admin_email: String,
    pub admin_mobile: String,
}

/// Listing records store opaque image handles; this base URL turns them into
/// client-facing links.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub base_url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT is not a valid port number"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST is neither an IP address nor localhost")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
