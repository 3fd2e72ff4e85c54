//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the faq-bot:
//! - Chat services (e.g., LINE) used to send replies
//! - The webhook server that receives LINE deliveries
//!
//! The chat service defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod webhook;
