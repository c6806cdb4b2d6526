//! Configuration management for Courier Core

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Shared AWS client configuration (SES and S3)
    pub aws: AwsConfig,
    /// Outgoing email configuration
    pub email: EmailConfig,
    /// Object storage configuration
    pub storage: StorageConfig,
    /// Logging and metrics configuration
    pub telemetry: TelemetryConfig,
    /// Whether to serve Swagger UI
    pub swagger_enabled: bool,
}

#[derive(Clone)]
pub struct AwsConfig {
    pub region: String,
    /// Custom endpoint (e.g. LocalStack). When set, S3 uses path-style addressing.
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Named profile from the shared credentials file
    pub profile: Option<String>,
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .field("profile", &self.profile)
            .finish()
    }
}

#[derive(Debug, Clone, Validate)]
pub struct EmailConfig {
    /// Sender address, must be verified in SES
    #[validate(email)]
    pub sender: String,
    /// SES configuration set name (optional, for tracking)
    pub configuration_set: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket holding templates and attachment files
    pub bucket_name: String,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "text" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            aws: AwsConfig {
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                endpoint_url: non_empty_var("AWS_ENDPOINT_URL"),
                access_key_id: non_empty_var("AWS_ACCESS_KEY_ID"),
                secret_access_key: non_empty_var("AWS_SECRET_ACCESS_KEY"),
                profile: non_empty_var("AWS_PROFILE"),
            },
            email: EmailConfig {
                sender: env::var("EMAIL_SENDER").context("EMAIL_SENDER is required")?,
                configuration_set: non_empty_var("EMAIL_CONFIGURATION_SET"),
            },
            storage: StorageConfig {
                bucket_name: env::var("STORAGE_BUCKET_NAME")
                    .context("STORAGE_BUCKET_NAME is required")?,
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|s| parse_flag(&s))
                    .unwrap_or(true),
            },
            swagger_enabled: env::var("SWAGGER_ENABLED")
                .map(|s| parse_flag(&s))
                .unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that cannot be expressed by the environment parsing alone
    pub fn validate(&self) -> Result<()> {
        self.email
            .validate()
            .context("EMAIL_SENDER must be a valid email address")?;

        if self.storage.bucket_name.trim().is_empty() {
            anyhow::bail!("STORAGE_BUCKET_NAME must not be empty");
        }

        Ok(())
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
