//! Main chat loop.
//!
//! Reads lines, turns them into controller calls, and renders whatever the
//! controller reports through its event bus. Plain lines go to the live
//! follow-up when there is one, otherwise to the primary input. Destructive
//! commands (`/clear`, `/new`, `/delete`) ask for a y/N answer on the next line.

use console::style;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, trace, warn};

use ethica_core::conversation::ExchangeOutcome;
use ethica_types::chat::{ConversationId, MessageRole};
use ethica_types::error::{ChatError, ValidationError};
use ethica_types::event::ConversationEvent;
use ethica_types::parameters::ParameterKey;

use crate::cli::conversations::print_conversation_table;
use crate::cli::spinner;
use crate::cli::status::print_status;
use crate::state::{AppState, ConcreteChatController};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent, PromptKind};
use super::renderer::{ChatRenderer, print_parameters};

/// An action waiting for the user's y/N answer.
#[derive(Debug, PartialEq)]
enum PendingConfirm {
    Clear,
    NewConversation,
    Delete(ConversationId),
}

impl PendingConfirm {
    /// The confirmation a command needs before it runs, if any.
    fn for_command(command: &ChatCommand) -> Option<Self> {
        match command {
            ChatCommand::Clear => Some(Self::Clear),
            ChatCommand::New => Some(Self::NewConversation),
            ChatCommand::Delete(id) => Some(Self::Delete(ConversationId::from(id.as_str()))),
            _ => None,
        }
    }

    fn question(&self) -> String {
        match self {
            Self::Clear => "Clear the conversation? This cannot be undone.".to_string(),
            Self::NewConversation => {
                "Start a new conversation? The current one will be cleared.".to_string()
            }
            Self::Delete(id) => format!(
                "Delete saved conversation '{}'? This cannot be undone.",
                style(id).red().bold()
            ),
        }
    }
}

/// Whether the loop keeps reading.
enum Flow {
    Continue,
    Exit,
}

/// Run the interactive chat loop, optionally restoring a saved conversation first.
pub async fn run_chat_loop(state: &AppState, load: Option<String>) -> anyhow::Result<()> {
    let mut controller = state.controller();
    let mut events = controller.subscribe();
    let renderer = ChatRenderer::new();

    let backend_status = match controller.status().await {
        Ok(report) => Some(report.status),
        Err(e) => {
            warn!(error = %e, "backend status unavailable");
            None
        }
    };
    print_welcome_banner(&state.base_url, backend_status.as_deref());

    if let Some(id) = load {
        load_conversation(&mut controller, ConversationId::from(id)).await;
        render_events(&mut events, &controller, &renderer);
    }

    let (mut chat_input, _writer) =
        ChatInput::new().map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    let mut pending: Option<PendingConfirm> = None;

    info!(base_url = %state.base_url, "chat session started");

    loop {
        chat_input.set_prompt(prompt_for(&controller, pending.is_some()));

        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                if pending.take().is_some() {
                    println!("  Cancelled.");
                } else {
                    println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                }
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if let Some(action) = pending.take() {
            if is_yes(&text) {
                run_confirmed(&mut controller, action).await;
            } else {
                println!("  Cancelled.");
            }
            render_events(&mut events, &controller, &renderer);
            continue;
        }

        if text.is_empty() {
            continue;
        }

        let flow = match commands::parse(&text) {
            Some(command) => {
                handle_command(
                    command,
                    &mut controller,
                    &state.base_url,
                    &renderer,
                    &mut chat_input,
                    &mut pending,
                )
                .await
            }
            None => {
                submit(&mut controller, &text).await;
                Flow::Continue
            }
        };
        render_events(&mut events, &controller, &renderer);

        if let Flow::Exit = flow {
            println!("\n  {}", style("Session ended.").dim());
            break;
        }
    }

    chat_input.flush();
    info!(messages = controller.session().len(), "chat session ended");
    Ok(())
}

/// Send one line as the next user turn.
async fn submit(controller: &mut ConcreteChatController, text: &str) {
    let progress = spinner("thinking...");
    let result = controller.submit_next(text).await;
    progress.finish_and_clear();

    match result {
        Ok(ExchangeOutcome::Success { reply_index, .. }) => {
            debug!(reply_index, "reply received");
        }
        // The error notice is already in the transcript.
        Ok(ExchangeOutcome::Failed { error, .. }) => {
            debug!(error = %error, "exchange failed");
        }
        Err(ValidationError::EmptyMessage) => {}
        Err(e) => notice(&e.to_string()),
    }
}

async fn handle_command(
    command: ChatCommand,
    controller: &mut ConcreteChatController,
    base_url: &str,
    renderer: &ChatRenderer,
    chat_input: &mut ChatInput,
    pending: &mut Option<PendingConfirm>,
) -> Flow {
    if let Some(action) = PendingConfirm::for_command(&command) {
        if action == PendingConfirm::NewConversation && controller.session().is_empty() {
            notice("This conversation is already empty.");
        } else {
            println!("  {}", action.question());
            *pending = Some(action);
        }
        return Flow::Continue;
    }

    match command {
        ChatCommand::Help => commands::print_help(),

        ChatCommand::Save(name) => {
            let progress = spinner("saving...");
            let result = controller.save(&name).await;
            progress.finish_and_clear();
            match result {
                Ok(saved) => debug!(conversation_id = %saved.id, "save acknowledged"),
                Err(ChatError::Validation(ValidationError::EmptyName)) => {
                    notice("Give the conversation a name: /save <name>");
                }
                Err(ChatError::Validation(ValidationError::EmptyTranscript)) => {
                    notice("Nothing to save yet.");
                }
                Err(e) => failure("Could not save the conversation", &e),
            }
        }

        ChatCommand::Load(Some(id)) => load_conversation(controller, ConversationId::from(id)).await,

        ChatCommand::Load(None) | ChatCommand::List => {
            let progress = spinner("fetching conversations...");
            let result = controller.list_saved().await;
            progress.finish_and_clear();
            match result {
                Ok(conversations) => {
                    print_conversation_table(&conversations, controller.session().id());
                    if !conversations.is_empty() {
                        println!("  {}", style("Load one with /load <id>").dim());
                        println!();
                    }
                }
                Err(e) => failure("Could not list conversations", &e),
            }
        }

        // Queued for confirmation above.
        ChatCommand::Clear | ChatCommand::New | ChatCommand::Delete(_) => {}

        ChatCommand::Params => print_parameters(controller.parameters()),

        ChatCommand::Set { key, value } => match controller.parameters_mut().set(&key, &value) {
            Ok(key) => show_parameter(controller, key),
            Err(e) => notice(&e.to_string()),
        },

        ChatCommand::Unset(key) => match controller.parameters_mut().unset(&key) {
            Ok(key) => show_parameter(controller, key),
            Err(e) => notice(&e.to_string()),
        },

        ChatCommand::History => renderer.print_transcript(controller.session().messages()),

        ChatCommand::Status => match controller.status().await {
            Ok(report) => {
                println!();
                print_status(base_url, &report);
            }
            Err(e) => failure("Could not reach the backend", &e),
        },

        ChatCommand::ClearScreen => chat_input.clear(),

        ChatCommand::Exit => return Flow::Exit,

        ChatCommand::Unknown(name) => {
            println!(
                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                style(name).dim()
            );
        }
    }
    Flow::Continue
}

async fn run_confirmed(controller: &mut ConcreteChatController, action: PendingConfirm) {
    match action {
        PendingConfirm::Clear => {
            if let Err(e) = controller.clear().await {
                failure("Could not clear the conversation", &e);
            }
        }
        PendingConfirm::NewConversation => match controller.new_conversation().await {
            Ok(true) => {}
            Ok(false) => notice("This conversation is already empty."),
            Err(e) => failure("Could not start a new conversation", &e),
        },
        PendingConfirm::Delete(id) => {
            if let Err(e) = controller.delete_saved(&id).await {
                failure("Could not delete the conversation", &e);
            }
        }
    }
}

async fn load_conversation(controller: &mut ConcreteChatController, id: ConversationId) {
    let progress = spinner("loading...");
    let result = controller.load(&id).await;
    progress.finish_and_clear();
    if let Err(e) = result {
        failure(&format!("Could not load '{id}'"), &e);
    }
}

/// Render everything the controller published since the last call.
fn render_events(
    events: &mut Receiver<ConversationEvent>,
    controller: &ConcreteChatController,
    renderer: &ChatRenderer,
) {
    loop {
        let event = match events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "renderer fell behind conversation events");
                continue;
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        };

        match event {
            ConversationEvent::MessageAppended { index, role } => {
                if role == MessageRole::User {
                    continue;
                }
                if let Some(message) = controller.session().messages().get(index) {
                    renderer.print_message(message, false);
                }
            }
            ConversationEvent::SessionRestored { id, message_count } => {
                println!();
                println!(
                    "  {} Loaded conversation {} ({} message{})",
                    style("✓").green().bold(),
                    style(&id).cyan(),
                    message_count,
                    if message_count == 1 { "" } else { "s" }
                );
                renderer.print_transcript(controller.session().messages());
            }
            ConversationEvent::SessionReset => {
                println!("\n  {} Conversation cleared.\n", style("✓").green().bold());
            }
            ConversationEvent::SessionSaved { id } => {
                println!(
                    "\n  {} Conversation saved as {}\n",
                    style("✓").green().bold(),
                    style(&id).cyan()
                );
            }
            ConversationEvent::SavedConversationDeleted { id } => {
                println!(
                    "\n  {} Saved conversation {} deleted.\n",
                    style("✓").red().bold(),
                    style(&id).dim()
                );
            }
            other => trace!(event = ?other, "conversation event"),
        }
    }
}

fn prompt_for(controller: &ConcreteChatController, confirming: bool) -> PromptKind {
    if confirming {
        PromptKind::Confirm
    } else if controller.affordances().follow_up().is_some() {
        PromptKind::FollowUp
    } else {
        PromptKind::Primary
    }
}

fn show_parameter(controller: &ConcreteChatController, key: ParameterKey) {
    let shown = controller
        .parameters()
        .display_rows()
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, value)| value)
        .unwrap_or_default();
    println!("  {} = {}", style(key).cyan(), style(shown).bold());
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn notice(message: &str) {
    println!("  {}", style(message).dim());
}

fn failure(context: &str, error: &dyn std::fmt::Display) {
    eprintln!("\n  {} {context}: {error}\n", style("!").red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("sure"));
    }

    #[test]
    fn destructive_commands_wait_for_confirmation() {
        assert_eq!(
            PendingConfirm::for_command(&ChatCommand::Clear),
            Some(PendingConfirm::Clear)
        );
        assert_eq!(
            PendingConfirm::for_command(&ChatCommand::New),
            Some(PendingConfirm::NewConversation)
        );
        assert_eq!(
            PendingConfirm::for_command(&ChatCommand::Delete("conv_1".to_string())),
            Some(PendingConfirm::Delete(ConversationId::from("conv_1")))
        );
    }

    #[test]
    fn other_commands_run_immediately() {
        for command in [ChatCommand::Help, ChatCommand::List, ChatCommand::History, ChatCommand::Exit] {
            assert_eq!(PendingConfirm::for_command(&command), None);
        }
    }

    #[test]
    fn clear_question_mentions_clearing() {
        assert!(PendingConfirm::Clear.question().starts_with("Clear the conversation?"));
    }
}
