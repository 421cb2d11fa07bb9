use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_STORE_ENDPOINT: &str = "http://localhost:8093/query/service";
const DEFAULT_BUCKET: &str = "hackathon";
const DEFAULT_MODEL_ENDPOINT: &str = "https://models.inference.ai.azure.com";
const DEFAULT_MODEL_NAME: &str = "gpt-4o";
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_SUMMARY_TEMPERATURE: f32 = 0.7;
const DEFAULT_SUMMARY_PROMPT_PATH: &str = "prompt.json";

/// Application configuration loaded from environment variables.
/// Every component receives what it needs from here at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_endpoint: String,
    pub store_user: String,
    pub store_password: String,
    pub bucket: String,
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
    pub model_endpoint: String,
    pub model_name: String,
    pub sampling_temperature: f32,
    /// Summaries favour variety over reproducibility.
    pub summary_temperature: f32,
    pub summary_prompt_path: PathBuf,
    /// Optional here because the CLI can supply it per invocation.
    pub model_api_key: Option<String>,
    /// Max in-flight skill upserts. 1 keeps the writes strictly sequential.
    pub upsert_concurrency: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            store_endpoint: env_or("CB_QUERY_URL", DEFAULT_STORE_ENDPOINT),
            store_user: env_or("CB_USER", "Administrator"),
            store_password: env_or("CB_PASSWORD", "password"),
            bucket: env_or("BUCKET_NAME", DEFAULT_BUCKET),
            model_endpoint: env_or("AI_ENDPOINT", DEFAULT_MODEL_ENDPOINT),
            model_name: env_or("AI_MODEL", DEFAULT_MODEL_NAME),
            sampling_temperature: env_f32("AI_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            summary_temperature: env_f32("SUMMARY_TEMPERATURE", DEFAULT_SUMMARY_TEMPERATURE)?,
            summary_prompt_path: PathBuf::from(env_or(
                "SUMMARY_PROMPT_PATH",
                DEFAULT_SUMMARY_PROMPT_PATH,
            )),
            model_api_key: std::env::var("AI_API_KEY").ok().filter(|k| !k.is_empty()),
            upsert_concurrency: std::env::var("UPSERT_CONCURRENCY")
                .unwrap_or_else(|_| "1".to_string())
                .parse::<usize>()
                .context("UPSERT_CONCURRENCY must be a positive integer")?
                .max(1),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the API key, failing when neither the environment nor the caller provided one.
    pub fn require_model_api_key(&self) -> Result<&str> {
        self.model_api_key
            .as_deref()
            .context("No model API key: pass the API key as the third argument or set AI_API_KEY")
    }

    #[cfg(test)]
    pub fn for_tests(store_endpoint: &str, model_endpoint: &str) -> Self {
        Config {
            store_endpoint: store_endpoint.to_string(),
            store_user: "Administrator".to_string(),
            store_password: "password".to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            model_endpoint: model_endpoint.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            sampling_temperature: DEFAULT_TEMPERATURE,
            summary_temperature: DEFAULT_SUMMARY_TEMPERATURE,
            summary_prompt_path: PathBuf::from(DEFAULT_SUMMARY_PROMPT_PATH),
            model_api_key: Some("test-key".to_string()),
            upsert_concurrency: 1,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn env_f32(key: &str, default: f32) -> Result<f32> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v
            .parse::<f32>()
            .with_context(|| format!("{key} must be a number")),
        _ => Ok(default),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_model_api_key_missing() {
        let mut config = Config::for_tests("http://store", "http://model");
        config.model_api_key = None;
        let err = config.require_model_api_key().unwrap_err().to_string();
        assert!(err.contains("third argument"));
        assert!(err.contains("AI_API_KEY"));
    }

    #[test]
    fn test_require_model_api_key_present() {
        let config = Config::for_tests("http://store", "http://model");
        assert_eq!(config.require_model_api_key().unwrap(), "test-key");
    }

    #[test]
    fn test_env_f32_falls_back_on_unset() {
        let value = env_f32("SKILLSYNC_TEST_SURELY_UNSET_TEMP", 0.7).unwrap();
        assert!((value - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_env_or_falls_back_on_unset() {
        assert_eq!(
            env_or("SKILLSYNC_TEST_SURELY_UNSET_VAR", "fallback"),
            "fallback"
        );
    }
}
