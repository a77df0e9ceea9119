//! Configuration read from environment variables.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Groq API key (required).
    pub api_key: SecretString,
    /// Model identifier passed to the generation service.
    pub model: String,
    /// Port for the WebSocket/REST server.
    pub port: u16,
    /// Path to the leads database file.
    pub db_path: String,
    /// Maximum tokens requested per generation call.
    pub max_tokens: u32,
    /// Sampling temperature for generation calls.
    pub temperature: f32,
}

impl IntakeConfig {
    /// Read configuration from the environment.
    ///
    /// `GROQ_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("GROQ_API_KEY".to_string()))?;

        let model = std::env::var("INTAKE_MODEL")
            .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());

        let port = parse_var("INTAKE_PORT", 5000)?;
        let max_tokens = parse_var("INTAKE_MAX_TOKENS", 150)?;
        let temperature = parse_var("INTAKE_TEMPERATURE", 0.7)?;

        let db_path =
            std::env::var("INTAKE_DB_PATH").unwrap_or_else(|_| "./data/leads.db".to_string());

        Ok(Self {
            api_key: SecretString::from(api_key),
            model,
            port,
            db_path,
            max_tokens,
            temperature,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("could not parse {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}
