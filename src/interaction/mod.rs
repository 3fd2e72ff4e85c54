//! Event handling and message triage for faq-bot.
//!
//! This module provides functionality for handling inbound message events:
//! - Classifying message text against the keyword lists
//! - Choosing which events of a delivery to answer
//! - Sending replies through the chat client and logging failures

pub mod classify;
pub mod message_event;
