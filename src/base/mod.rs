//! Core components, types, and utilities for the faq-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Built-in keyword lists and canned replies.
//! - Common types and result handling.

pub mod config;
pub mod replies;
pub mod types;
