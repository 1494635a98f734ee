//! Shared domain types for Ethica.
//!
//! This crate contains the types exchanged between the conversation core,
//! the backend gateway and the presentation layer: messages, saved
//! conversation records, generation parameters, events, and error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod moderation;
pub mod parameters;
pub mod status;
