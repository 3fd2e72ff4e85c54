//! Runtime services and shared state for the faq-bot.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{
        chat::ChatClient,
        webhook::{self, WebhookState},
    },
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration and the chat client.  It is designed
/// to be trivially cloneable, allowing it to be passed around without the
/// need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        // Initialize the LINE client.
        let chat = ChatClient::line(&config)?;

        info!(
            danger_words = config.keywords.danger_words.len(),
            buy_words = config.keywords.buy_words.len(),
            faq_entries = config.keywords.faq.len(),
            policy = ?config.event_policy,
            "Keyword lists loaded."
        );

        Ok(Self { config, chat })
    }

    /// Shared state for the webhook handlers.
    pub fn webhook_state(&self) -> WebhookState {
        WebhookState::new(&self.config, self.chat.clone())
    }

    pub async fn start(&self) -> Void {
        webhook::serve(&self.config, self.webhook_state()).await
    }
}
