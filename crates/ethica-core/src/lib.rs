//! Conversation session and request orchestration for Ethica.
//!
//! This crate owns the conversation state machine: the transcript, the
//! parameter controls, the exchange lifecycle and the persistence flows.
//! It defines the `Gateway` port that the infrastructure layer implements
//! and depends only on `ethica-types` -- never on `ethica-infra` or any
//! HTTP crate.

pub mod conversation;
pub mod event;
pub mod gateway;

#[cfg(test)]
pub(crate) mod testing;
