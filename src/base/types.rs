use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::base::replies;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

// Keyword configuration.

/// A single FAQ entry: any of `keywords` triggers `reply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub keywords: Vec<String>,
    pub reply: String,
}

impl FaqEntry {
    pub fn new<K, S>(keywords: K, reply: impl Into<String>) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            reply: reply.into(),
        }
    }
}

fn default_danger_words() -> Vec<String> {
    replies::DANGER_WORDS.iter().map(|s| s.to_string()).collect()
}

fn default_danger_reply() -> String {
    replies::DANGER_REPLY.to_string()
}

fn default_buy_words() -> Vec<String> {
    replies::BUY_WORDS.iter().map(|s| s.to_string()).collect()
}

fn default_buy_reply() -> String {
    replies::BUY_REPLY.to_string()
}

fn default_faq() -> Vec<FaqEntry> {
    replies::FAQ.iter().map(|(keywords, reply)| FaqEntry::new(keywords.iter().copied(), *reply)).collect()
}

/// Static keyword lists and replies consulted by the classifier.
///
/// Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keywords {
    /// Escalation triggers (`keywords.danger_words`).
    #[serde(default = "default_danger_words")]
    pub danger_words: Vec<String>,
    /// Reply for escalation matches (`keywords.danger_reply`).
    #[serde(default = "default_danger_reply")]
    pub danger_reply: String,
    /// Purchase-intent triggers (`keywords.buy_words`).
    #[serde(default = "default_buy_words")]
    pub buy_words: Vec<String>,
    /// Reply for purchase-intent matches (`keywords.buy_reply`).
    #[serde(default = "default_buy_reply")]
    pub buy_reply: String,
    /// Ordered FAQ entries (`[[keywords.faq]]`).
    #[serde(default = "default_faq")]
    pub faq: Vec<FaqEntry>,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            danger_words: default_danger_words(),
            danger_reply: default_danger_reply(),
            buy_words: default_buy_words(),
            buy_reply: default_buy_reply(),
            faq: default_faq(),
        }
    }
}

impl Keywords {
    /// Checks that no keyword or reply is empty.
    ///
    /// An empty keyword would be contained in every message.
    pub fn validate(&self) -> Void {
        if self.danger_words.iter().any(String::is_empty) {
            return Err(anyhow::anyhow!("Danger words must not contain an empty keyword."));
        }

        if self.buy_words.iter().any(String::is_empty) {
            return Err(anyhow::anyhow!("Buy words must not contain an empty keyword."));
        }

        if self.danger_reply.is_empty() || self.buy_reply.is_empty() {
            return Err(anyhow::anyhow!("Danger and buy replies must not be empty."));
        }

        for (index, entry) in self.faq.iter().enumerate() {
            if entry.keywords.is_empty() {
                return Err(anyhow::anyhow!("FAQ entry {index} has no keywords."));
            }

            if entry.keywords.iter().any(String::is_empty) {
                return Err(anyhow::anyhow!("FAQ entry {index} contains an empty keyword."));
            }

            if entry.reply.is_empty() {
                return Err(anyhow::anyhow!("FAQ entry {index} has an empty reply."));
            }
        }

        Ok(())
    }
}

/// Shared, read-only handle to the keyword configuration.
pub type SharedKeywords = Arc<Keywords>;

// Classification results.

/// Which rule produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplyKind {
    Danger,
    Buy,
    /// Index into the FAQ list.
    Faq(usize),
}

/// The single reply chosen for a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

/// Which events of a delivery batch get processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPolicy {
    /// Every event, in delivery order.
    #[default]
    All,
    /// Only the first event; the rest are ignored.
    First,
}

// Webhook payloads.

/// Body of a webhook delivery.
///
/// Events are kept as raw values so that a single malformed event does not
/// discard the rest of the batch.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

/// A webhook event.  Only message events are acted on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    #[serde(rename_all = "camelCase")]
    Message {
        #[serde(default)]
        reply_token: Option<String>,
        message: EventMessage,
    },
    #[serde(other)]
    Other,
}

/// The message carried by a message event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventMessage {
    Text {
        #[serde(default)]
        id: Option<String>,
        text: String,
    },
    #[serde(other)]
    Other,
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_text_message_event() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "type": "message",
            "replyToken": "token-1",
            "source": { "type": "user", "userId": "U1" },
            "message": { "type": "text", "id": "100", "text": "請問營業時間?" }
        }))
        .unwrap();

        assert_eq!(
            event,
            WebhookEvent::Message {
                reply_token: Some("token-1".to_string()),
                message: EventMessage::Text {
                    id: Some("100".to_string()),
                    text: "請問營業時間?".to_string(),
                },
            }
        );
    }

    #[test]
    fn non_text_messages_and_other_events_parse_as_other() {
        let sticker: WebhookEvent = serde_json::from_value(json!({
            "type": "message",
            "replyToken": "token-2",
            "message": { "type": "sticker", "id": "1", "packageId": "1", "stickerId": "2" }
        }))
        .unwrap();
        assert_eq!(
            sticker,
            WebhookEvent::Message {
                reply_token: Some("token-2".to_string()),
                message: EventMessage::Other,
            }
        );

        let follow: WebhookEvent = serde_json::from_value(json!({ "type": "follow", "replyToken": "token-3" })).unwrap();
        assert_eq!(follow, WebhookEvent::Other);
    }

    #[test]
    fn default_keywords_are_valid() {
        Keywords::default().validate().unwrap();
    }

    #[test]
    fn empty_keyword_is_rejected() {
        let mut keywords = Keywords::default();
        keywords.buy_words.push(String::new());
        assert!(keywords.validate().is_err());

        let mut keywords = Keywords::default();
        keywords.faq.push(FaqEntry::new(Vec::<String>::new(), "reply"));
        assert!(keywords.validate().is_err());
    }
}
