//! Library root for `faq-bot`.
//!
//! Faq-bot is a keyword-driven assistant for LINE official accounts designed to:
//! - Route sensitive messages to a human with an escalation reply
//! - Hand purchase requests over to sales
//! - Answer common questions from a static FAQ list
//!
//! The bot receives LINE webhook deliveries over HTTP, triages each text
//! message against static keyword lists, and answers through the LINE reply
//! API.  The chat platform sits behind a trait so other clients (or test
//! doubles) can be swapped in.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the faq-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the chat client
/// - Starts the webhook server
pub async fn start(config: Config) -> Void {
    info!("Starting faq-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider().install_default().map_err(|_| anyhow::anyhow!("Failed to install the rustls crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
