use std::env;
use std::fmt;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "127.0.0.1";

pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_port: u16,
    pub server_host: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or not valid unicode.
    Missing(&'static str),
    /// `PORT` is set but is not a port number.
    InvalidPort(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} must be set", name),
            ConfigError::InvalidPort(value) => write!(f, "PORT must be a number, got {:?}", value),
        }
    }
}

impl std::error::Error for ConfigError {}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// `PORT` defaults to 3000 and `SERVER_HOST` to 127.0.0.1 when unset;
    /// `DATABASE_URL` and `JWT_SECRET` are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value.clone()))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_port,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
