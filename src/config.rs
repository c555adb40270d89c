use std::{env, path::PathBuf, time::Duration};

use anyhow::Context;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub request_timeout: Duration,
    pub session_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let timeout_ms = env::var("REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let session_file = env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        Ok(Self {
            backend_url,
            request_timeout: Duration::from_millis(timeout_ms),
            session_file,
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        reqwest::Url::parse(&self.backend_url)
            .with_context(|| format!("BACKEND_URL `{}` is not a valid url", self.backend_url))?;
        Ok(())
    }
}

fn default_session_file() -> PathBuf {
    let home = env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."));
    home.join(".autoservice-desk").join("session.json")
}
