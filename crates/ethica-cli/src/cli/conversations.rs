//! Saved conversation commands: list, show, delete.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use ethica_core::gateway::Gateway;
use ethica_types::chat::{ConversationId, SavedConversation};

use crate::cli::chat::renderer::ChatRenderer;
use crate::cli::spinner;
use crate::state::AppState;

/// List saved conversations in the store's order (newest first).
pub async fn list_conversations(state: &AppState, json: bool) -> Result<()> {
    let conversations = state.controller().list_saved().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    print_conversation_table(&conversations, None);
    Ok(())
}

/// Print the transcript of one saved conversation.
pub async fn show_conversation(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = ConversationId::from(id);
    let detail = state.gateway.get_conversation(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(detail.name.as_deref().unwrap_or("Unnamed")).cyan().bold(),
        style(format!("({id})")).dim()
    );
    ChatRenderer::new().print_transcript(&detail.messages);
    Ok(())
}

/// Delete one saved conversation, confirming first unless `force`.
pub async fn delete_conversation(
    state: &AppState,
    id: &str,
    force: bool,
    json: bool,
) -> Result<()> {
    let id = ConversationId::from(id);

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete saved conversation '{}'?",
                style(&id).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let progress = spinner(&format!("Deleting {id}..."));
    let mut controller = state.controller();
    let result = controller.delete_saved(&id).await;
    progress.finish_and_clear();
    result?;

    if json {
        println!("{}", serde_json::json!({"deleted": true, "id": id}));
    } else {
        println!("  {} Conversation '{}' deleted.", style("✓").red().bold(), id);
    }

    Ok(())
}

/// Table of saved conversations; `current` is marked.
pub fn print_conversation_table(
    conversations: &[SavedConversation],
    current: Option<&ConversationId>,
) {
    if conversations.is_empty() {
        println!();
        println!(
            "  {} No saved conversations. Save one from a chat with: {}",
            style("i").blue().bold(),
            style("/save <name>").yellow()
        );
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Saved").fg(Color::White),
    ]);

    for conversation in conversations {
        let id_cell = if current == Some(&conversation.id) {
            Cell::new(format!("● {}", conversation.id)).fg(Color::Green)
        } else {
            Cell::new(conversation.id.as_str()).fg(Color::White)
        };
        let saved = conversation
            .timestamp
            .as_ref()
            .map(format_relative_time)
            .unwrap_or_else(|| "unknown".to_string());

        table.add_row(vec![
            id_cell,
            Cell::new(&conversation.name).fg(Color::Cyan),
            Cell::new(conversation.message_count),
            Cell::new(saved).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(conversations.len()).bold(),
        if conversations.len() == 1 { "" } else { "s" }
    );
    println!();
}

fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let diff = now - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}
