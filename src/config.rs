//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; nothing in this crate re-reads the
//! environment afterwards.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the platform REST backend (no trailing slash)
    pub api_base_url: String,
    /// Base URL of the WordPress-compatible blog API; blog routes degrade
    /// gracefully when unset
    pub blog_api_url: Option<String>,
    /// API key sent to the blog API as `X-API-KEY`
    pub blog_api_key: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Deployment environment name; "production" enables Secure cookies
    pub environment: String,

    /// Name of the HTTP-only session cookie
    pub session_cookie_name: String,
    /// Session lifetime in seconds
    pub session_max_age: i64,

    /// Path prefixes that require a completed-profile session
    pub protected_routes: Vec<String>,
    /// Path prefixes of the login/signup pages
    pub auth_routes: Vec<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9/api/v1".to_string(),
            blog_api_url: None,
            blog_api_key: String::new(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            environment: "test".to_string(),
            session_cookie_name: "brritto_session".to_string(),
            session_max_age: 86400,
            protected_routes: vec!["/dashboard".to_string(), "/profile".to_string()],
            auth_routes: vec!["/login".to_string(), "/signup".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only `API_BASE_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("API_BASE_URL"))?,
            blog_api_url: env::var("BLOG_API_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string()),
            blog_api_key: env::var("BLOG_API_KEY").unwrap_or_default(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "brritto_session".to_string()),
            session_max_age: env::var("SESSION_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86400),
            protected_routes: prefix_list("PROTECTED_ROUTES", &["/dashboard", "/profile"]),
            auth_routes: prefix_list("AUTH_ROUTES", &["/login", "/signup"]),
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.environment == "production"
    }
}

/// Read a comma-separated path-prefix list from the environment.
fn prefix_list(var: &str, defaults: &[&str]) -> Vec<String> {
    match env::var(var) {
        Ok(value) => value
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| p.starts_with('/'))
            .collect(),
        Err(_) => defaults.iter().map(|p| p.to_string()).collect(),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
