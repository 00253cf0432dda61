use crate::error::ConfigError;
use clap::Parser;
use std::time::Duration;

/// One year.
const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:3000")]
    pub server_addr: String,

    /// Slack app signing secret used to verify inbound requests.
    #[arg(long, env = "SLACK_SIGNING_SECRET")]
    pub signing_secret: String,

    /// Maximum number of Slack requests accepted per second.
    #[arg(long, env = "RATE_LIMIT_PER_SECOND", default_value = "10")]
    pub rate_limit_per_second: u32,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    // --- Q&A Provider Args ---
    /// API key for the Mendable Q&A provider.
    #[arg(long, env = "MENDABLE_API_KEY")]
    pub qa_api_key: String,

    /// Base URL of the Mendable API.
    #[arg(long, env = "MENDABLE_BASE_URL", default_value = "https://api.mendable.ai/v0")]
    pub qa_base_url: String,

    /// Documentation root URL. Sources equal to it are dropped from answers.
    #[arg(long, env = "DOCS_ROOT_URL", default_value = "https://docs.spectrocloud.com")]
    pub docs_root_url: String,

    /// Timeout in seconds for creating a conversation.
    #[arg(long, env = "QA_CREATE_TIMEOUT_SECS", default_value = "10")]
    pub qa_create_timeout_secs: u64,

    /// Timeout in seconds for a question. Model inference can be slow.
    #[arg(long, env = "QA_ASK_TIMEOUT_SECS", default_value = "60")]
    pub qa_ask_timeout_secs: u64,

    // --- Conversation Cache Args ---
    /// Conversation store type (redis, memory)
    #[arg(long, env = "CACHE_TYPE", default_value = "redis")]
    pub cache_type: String,

    /// Redis host name.
    #[arg(long, env = "REDIS_URL", default_value = "localhost")]
    pub redis_host: String,

    /// Redis port.
    #[arg(long, env = "REDIS_PORT", default_value = "6379")]
    pub redis_port: u16,

    /// Redis ACL user name.
    #[arg(long, env = "REDIS_USER", default_value = "")]
    pub redis_user: String,

    /// Redis password.
    #[arg(long, env = "REDIS_PASSWORD", default_value = "")]
    pub redis_password: String,

    /// Connect to Redis over TLS.
    #[arg(long, env = "REDIS_TLS", default_value = "false")]
    pub redis_tls: bool,

    /// Prefix of the conversation keys.
    #[arg(long, env = "CACHE_NAMESPACE", default_value = "docs_bot:user_id:channel_id")]
    pub cache_namespace: String,

    /// Time-to-live in seconds of a conversation record.
    #[arg(long, env = "CACHE_TTL_SECS", default_value = "900")]
    pub cache_ttl_secs: u64,

    // --- Reply Args ---
    /// Attempts made to deliver an answer to the response URL.
    #[arg(long, env = "REPLY_ATTEMPTS", default_value = "3")]
    pub reply_attempts: u32,

    /// Delay in seconds between answer delivery attempts.
    #[arg(long, env = "REPLY_DELAY_SECS", default_value = "3")]
    pub reply_delay_secs: u64,

    /// Attempts made to deliver the apology message.
    #[arg(long, env = "ERROR_REPLY_ATTEMPTS", default_value = "5")]
    pub error_reply_attempts: u32,

    /// Delay in seconds between apology delivery attempts.
    #[arg(long, env = "ERROR_REPLY_DELAY_SECS", default_value = "2")]
    pub error_reply_delay_secs: u64,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signing_secret.trim().is_empty() {
            return Err(ConfigError::Missing("SLACK_SIGNING_SECRET"));
        }
        if self.qa_api_key.trim().is_empty() {
            return Err(ConfigError::Missing("MENDABLE_API_KEY"));
        }
        if self.rate_limit_per_second == 0 {
            return Err(ConfigError::Invalid {
                name: "RATE_LIMIT_PER_SECOND",
                reason: "must be greater than zero".into(),
            });
        }
        if self.reply_attempts == 0 || self.error_reply_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "REPLY_ATTEMPTS",
                reason: "at least one attempt is required".into(),
            });
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "CACHE_TTL_SECS",
                reason: "records must expire".into(),
            });
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::Invalid {
                name: "CACHE_TTL_SECS",
                reason: format!("must not exceed {} seconds", MAX_CACHE_TTL_SECS),
            });
        }
        Ok(())
    }

    /// Connection URL for the redis client. `rediss://` selects TLS.
    pub fn redis_url(&self) -> String {
        let scheme = if self.redis_tls { "rediss" } else { "redis" };
        let auth = match (self.redis_user.is_empty(), self.redis_password.is_empty()) {
            (true, true) => String::new(),
            (true, false) => format!(":{}@", self.redis_password),
            (false, true) => format!("{}@", self.redis_user),
            (false, false) => format!("{}:{}@", self.redis_user, self.redis_password),
        };
        format!("{}://{}{}:{}/0", scheme, auth, self.redis_host, self.redis_port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
