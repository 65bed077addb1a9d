use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub aws_region: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Object storage
    pub storage_bucket: String,
    pub storage_endpoint_url: Option<String>,
    // Cloud TTS (AWS Polly)
    pub polly_voice: String,
    // Local TTS engine, invoked as an external process
    pub local_tts_command: String,
    pub local_tts_model: Option<String>,
    // Signed URL defaults
    pub default_url_ttl_secs: i64,
    // Multipart upload cap (bytes)
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            storage_bucket: env::var("STORAGE_BUCKET")?,
            storage_endpoint_url: env::var("STORAGE_ENDPOINT_URL").ok(),
            polly_voice: env::var("POLLY_VOICE").unwrap_or_else(|_| "Joanna".to_string()),
            local_tts_command: env::var("LOCAL_TTS_COMMAND")
                .unwrap_or_else(|_| "piper".to_string()),
            local_tts_model: env::var("LOCAL_TTS_MODEL").ok(),
            default_url_ttl_secs: env::var("DEFAULT_URL_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()?,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (500 * 1024 * 1024).to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
