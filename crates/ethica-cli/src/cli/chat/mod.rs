//! Interactive CLI chat experience for Ethica.
//!
//! This module is the presentation layer over `ChatController`: it reads
//! lines, dispatches them as submissions or slash commands, and renders the
//! conversation events the controller publishes. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
