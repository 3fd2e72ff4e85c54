//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::Path, sync::Arc};

use serde::Deserialize;

use super::types::{EventPolicy, Keywords, Res};

/// Default LINE Messaging API endpoint.
fn default_line_api_endpoint() -> String {
    "https://api.line.me".to_string()
}

/// Default timeout for a single reply request, in seconds.
fn default_line_request_timeout_secs() -> u64 {
    10
}

/// Default address the webhook server binds to.
fn default_listen_address() -> String {
    "0.0.0.0:3000".to_string()
}

/// Default path LINE delivers webhooks to.
fn default_webhook_path() -> String {
    "/webhook".to_string()
}

fn default_verify_signature() -> bool {
    true
}

/// Configuration for the faq-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// LINE channel access token (`LINE_CHANNEL_ACCESS_TOKEN`).
    pub line_channel_access_token: String,
    /// LINE channel secret, used to verify webhook signatures (`LINE_CHANNEL_SECRET`).
    #[serde(default)]
    pub line_channel_secret: String,
    /// Base URL of the LINE Messaging API (`LINE_API_ENDPOINT`).
    #[serde(default = "default_line_api_endpoint")]
    pub line_api_endpoint: String,
    /// Timeout for reply requests in seconds (`LINE_REQUEST_TIMEOUT_SECS`).
    #[serde(default = "default_line_request_timeout_secs")]
    pub line_request_timeout_secs: u64,
    /// Socket address for the webhook server (`LISTEN_ADDRESS`).
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Route LINE posts webhook deliveries to (`WEBHOOK_PATH`).
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Whether to check the `x-line-signature` header (`VERIFY_SIGNATURE`).
    /// Only disable this for local testing.
    #[serde(default = "default_verify_signature")]
    pub verify_signature: bool,
    /// Which events of a delivery batch are answered (`EVENT_POLICY`): `all` or `first`.
    #[serde(default)]
    pub event_policy: EventPolicy,
    /// Keyword lists and canned replies (`[keywords]` table).
    #[serde(default)]
    pub keywords: Keywords,
}

impl Config {
    /// Loads `explicit_path` (or `.hidden/config.toml` when present), then
    /// applies `FAQ_BOT_*` environment variables on top.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        Self::load_from(explicit_path, None)
    }

    /// Like [`Config::load`], but reads environment overrides from `env`
    /// instead of the process environment when given.
    pub fn load_from(explicit_path: Option<&Path>, env: Option<config::Map<String, String>>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // Later sources win, so the environment goes last.
        cfg = cfg.add_source(config::Environment::default().prefix("FAQ_BOT").source(env));

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks values that deserialize fine but cannot work at runtime.
    pub fn validate(&self) -> Res<()> {
        if self.line_channel_access_token.is_empty() {
            return Err(anyhow::anyhow!("LINE channel access token must not be empty."));
        }

        if self.verify_signature && self.line_channel_secret.is_empty() {
            return Err(anyhow::anyhow!("LINE channel secret is required when signature verification is enabled."));
        }

        if !self.webhook_path.starts_with('/') {
            return Err(anyhow::anyhow!("Webhook path must start with `/`."));
        }

        if self.webhook_path == "/health" {
            return Err(anyhow::anyhow!("Webhook path `/health` is reserved for the health check."));
        }

        if self.line_request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("LINE request timeout must be at least 1 second."));
        }

        self.keywords.validate()
    }
}

// Tests.
