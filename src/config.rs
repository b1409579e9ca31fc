use std::env;

use actix_web::cookie::Key;

use crate::errors::{AppError, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://db/melodic.db";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// Runtime settings, read from the environment (and `.env` when present).
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub session_key: Key,
    pub secure_cookies: bool,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        dotenv::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());

        let session_key = match env::var("SESSION_KEY") {
            Ok(raw) => Key::try_from(raw.as_bytes()).map_err(|_| {
                AppError::Config("SESSION_KEY must be at least 64 bytes long".to_string())
            })?,
            Err(_) => {
                log::warn!("SESSION_KEY is not set, sessions will not survive a restart");
                Key::generate()
            }
        };

        let secure_cookies = match env::var("SECURE_COOKIES") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| AppError::Config(format!("SECURE_COOKIES: invalid value {value:?}")))?,
            Err(_) => false,
        };

        Ok(Config {
            database_url,
            bind_address,
            session_key,
            secure_cookies,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn parses_boolean_flags() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
