//! Infrastructure layer for Ethica.
//!
//! Contains the implementation of the `Gateway` port defined in `ethica-core`
//! (`HttpGateway`, over reqwest) and the filesystem side of configuration:
//! data-directory resolution and `config.toml` loading.

pub mod config;
pub mod gateway;

pub use gateway::HttpGateway;
