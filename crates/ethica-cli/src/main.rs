//! Ethica CLI entry point.
//!
//! Binary name: `ethica`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use ethica_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_directives};

use cli::{Cli, Commands, ConversationsCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(
        verbosity_directives(cli.verbose, cli.quiet),
        cli.log_format,
        cli.otel,
    )
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "ethica", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.base_url.as_deref()).await?;

    let result = match cli.command {
        Commands::Chat { load } => cli::chat::loop_runner::run_chat_loop(&state, load).await,

        Commands::Conversations { action } => match action {
            ConversationsCommand::List => {
                cli::conversations::list_conversations(&state, cli.json).await
            }
            ConversationsCommand::Show { id } => {
                cli::conversations::show_conversation(&state, &id, cli.json).await
            }
            ConversationsCommand::Delete { id, force } => {
                cli::conversations::delete_conversation(&state, &id, force, cli.json).await
            }
        },

        Commands::Status => cli::status::status(&state, cli.json).await,

        Commands::Completions { .. } => Ok(()),
    };

    shutdown_tracing();
    result
}
