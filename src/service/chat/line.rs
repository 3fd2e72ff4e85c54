//! LINE Messaging API implementation of the chat client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::base::{
    config::Config,
    types::{Res, Void},
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the LINE implementation.

impl ChatClient {
    /// Creates a new LINE chat client.
    pub fn line(config: &Config) -> Res<Self> {
        let client = LineChatClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<LineChatClient> for ChatClient {
    fn from(client: LineChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Wire types.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> ReplyRequest<'a> {
    fn text(reply_token: &'a str, text: &'a str) -> Self {
        Self {
            reply_token,
            messages: [TextMessage { kind: "text", text }],
        }
    }
}

// Structs.

/// LINE client implementation.
#[derive(Clone)]
pub struct LineChatClient {
    access_token: String,
    reply_url: String,
    http: reqwest::Client,
}

impl LineChatClient {
    /// Create a new LINE chat client.
    #[instrument(name = "LineChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(config.line_request_timeout_secs)).build()?;

        let reply_url = format!("{}/v2/bot/message/reply", config.line_api_endpoint.trim_end_matches('/'));

        Ok(Self {
            access_token: config.line_channel_access_token.clone(),
            reply_url,
            http,
        })
    }
}

#[async_trait]
impl GenericChatClient for LineChatClient {
    #[instrument(skip(self, text))]
    async fn reply_message(&self, reply_token: &str, text: &str) -> Void {
        let request = ReplyRequest::text(reply_token, text);

        let response = self
            .http
            .post(&self.reply_url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send reply: {}", e))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("LINE reply API returned {}: {}", status, body));
        }

        debug!("Reply delivered.");

        Ok(())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::config::ConfigInner;
    use serde_json::json;

    #[test]
    fn reply_request_matches_line_wire_format() {
        let request = ReplyRequest::text("token-1", "我們營業時間是9-18點");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "replyToken": "token-1",
                "messages": [{ "type": "text", "text": "我們營業時間是9-18點" }]
            })
        );
    }

    #[test]
    fn reply_url_ignores_trailing_slash() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                line_channel_access_token: "token".to_string(),
                line_api_endpoint: "http://localhost:8080/".to_string(),
                line_request_timeout_secs: 5,
                ..Default::default()
            }),
        };

        let client = LineChatClient::new(&config).unwrap();
        assert_eq!(client.reply_url, "http://localhost:8080/v2/bot/message/reply");
    }
}
