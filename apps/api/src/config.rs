use anyhow::{Context, Result};

/// Origin of the local SvelteKit dev server, always allowed by CORS.
pub const DEV_FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Application configuration loaded from environment variables.
/// Startup fails if `DATABASE_URL` is missing; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Absent key is not a startup error: insight endpoints degrade to a
    /// configuration-error card instead.
    pub anthropic_api_key: Option<String>,
    pub frontend_url: Option<String>,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            frontend_url: optional_env("FRONTEND_URL"),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Origins the dashboard frontend may call from.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![DEV_FRONTEND_ORIGIN.to_string()];
        if let Some(url) = &self.frontend_url {
            if !origins.contains(url) {
                origins.push(url.clone());
            }
        }
        origins
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_frontend(frontend_url: Option<&str>) -> Config {
        Config {
            database_url: "postgres://localhost/talent".to_string(),
            anthropic_api_key: None,
            frontend_url: frontend_url.map(String::from),
            llm_timeout_secs: 30,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_allowed_origins_default_is_dev_server() {
        let config = config_with_frontend(None);
        assert_eq!(config.allowed_origins(), vec![DEV_FRONTEND_ORIGIN.to_string()]);
    }

    #[test]
    fn test_allowed_origins_adds_frontend_url_once() {
        let config = config_with_frontend(Some("https://dashboard.example.com"));
        assert_eq!(config.allowed_origins().len(), 2);

        let duplicate = config_with_frontend(Some(DEV_FRONTEND_ORIGIN));
        assert_eq!(duplicate.allowed_origins().len(), 1);
    }
}
