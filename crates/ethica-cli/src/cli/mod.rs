//! CLI command definitions and dispatch for the `ethica` binary.
//!
//! Uses clap derive macros for argument parsing. `ethica chat` is the
//! interactive client; the other commands manage saved conversations and
//! report backend health without opening a session.

pub mod chat;
pub mod conversations;
pub mod status;

use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use ethica_observe::LogFormat;
use indicatif::{ProgressBar, ProgressStyle};

/// Steady-ticking spinner shown while a backend call is outstanding.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Converse with an ethically-moderated text-generation backend.
#[derive(Parser)]
#[command(name = "ethica", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend API base URL (overrides config.toml).
    #[arg(long, env = "ETHICA_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Log output format (text or json).
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Restore a saved conversation by ID before chatting.
        #[arg(long)]
        load: Option<String>,
    },

    /// Manage saved conversations.
    #[command(alias = "conv")]
    Conversations {
        #[command(subcommand)]
        action: ConversationsCommand,
    },

    /// Backend status report.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConversationsCommand {
    /// List saved conversations, newest first.
    #[command(alias = "ls")]
    List,

    /// Print the transcript of a saved conversation.
    Show {
        /// Conversation ID.
        id: String,
    },

    /// Delete a saved conversation.
    #[command(alias = "rm")]
    Delete {
        /// Conversation ID.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_chat_with_load() {
        let cli = Cli::try_parse_from(["ethica", "chat", "--load", "conv_1712345678"]).unwrap();
        match cli.command {
            Commands::Chat { load } => assert_eq!(load.as_deref(), Some("conv_1712345678")),
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ethica",
            "conversations",
            "delete",
            "conv_1",
            "--force",
            "--json",
            "-vv",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Conversations {
                action: ConversationsCommand::Delete { id, force },
            } => {
                assert_eq!(id, "conv_1");
                assert!(force);
            }
            _ => panic!("expected conversations delete"),
        }
    }
}
