//! Chat service integration for faq-bot.
//!
//! This module provides functionality for answering messages on a chat platform:
//! - Sending a reply addressed by the reply token of an inbound event
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a default implementation for LINE.

pub mod line;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Void;

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// Implementing this trait allows different chat services (or test doubles)
/// to be used by the event dispatcher.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Reply to an inbound event.
    ///
    /// The reply token is the opaque handle delivered with the event; it can
    /// only be used once and only for a short time after delivery.
    async fn reply_message(&self, reply_token: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
