//! Terminal rendering of transcript messages.
//!
//! Assistant replies are markdown and go through `termimad`; every
//! assistant turn that carries moderation metadata gets a one-line summary
//! of the ethical checks underneath. System notices are local error
//! entries and are shown in red.

use chrono::{DateTime, Local, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use termimad::MadSkin;

use ethica_core::conversation::ParameterControls;
use ethica_types::chat::{Message, MessageRole};
use ethica_types::moderation::ModerationSummary;

/// Terminal renderer for conversation messages.
pub struct ChatRenderer {
    skin: MadSkin,
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);
        Self { skin }
    }

    /// Render markdown for the terminal.
    pub fn render_markdown(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Print one transcript message.
    ///
    /// User turns are echoed only when `echo_user` is set (the prompt line
    /// already shows what was typed during a live exchange).
    pub fn print_message(&self, message: &Message, echo_user: bool) {
        match message.role {
            MessageRole::User => {
                if echo_user {
                    println!(
                        "  {} {}{}",
                        style("You").green().bold(),
                        message.content,
                        time_suffix(message.timestamp)
                    );
                }
            }
            MessageRole::Assistant => {
                println!();
                println!(
                    "  {}{}",
                    style("Ethica").cyan().bold(),
                    time_suffix(message.timestamp)
                );
                let rendered = self.render_markdown(&message.content);
                for line in rendered.trim_end().lines() {
                    println!("  {line}");
                }
                if let Some(metadata) = &message.metadata {
                    println!("  {}", moderation_line(&ModerationSummary::from_metadata(metadata)));
                }
                println!();
            }
            MessageRole::System => {
                println!();
                println!("  {} {}", style("!").red().bold(), style(&message.content).red());
                println!();
            }
        }
    }

    /// Print a whole transcript, user turns included.
    pub fn print_transcript(&self, messages: &[Message]) {
        if messages.is_empty() {
            println!();
            println!("  {}", style("No messages yet.").dim());
            println!();
            return;
        }
        println!();
        for message in messages {
            self.print_message(message, true);
        }
    }
}

/// Table of the parameter controls, generation first, then moderation.
pub fn print_parameters(controls: &ParameterControls) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Group").fg(Color::White),
        Cell::new("Parameter").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);

    let mut rows = controls.display_rows();
    rows.sort_by_key(|(key, _)| key.is_moderation());
    for (key, value) in rows {
        let group = if key.is_moderation() {
            Cell::new("moderation").fg(Color::Magenta)
        } else {
            Cell::new("generation").fg(Color::DarkGrey)
        };
        table.add_row(vec![group, Cell::new(key).fg(Color::Cyan), Cell::new(value)]);
    }

    println!();
    println!("{table}");
    println!(
        "  {}",
        style("Change with /set <key> <value>, restore with /unset <key>").dim()
    );
    println!();
}

/// The moderation summary, highlighted when something was flagged.
pub fn moderation_line(summary: &ModerationSummary) -> String {
    let text = summary.to_string();
    if summary.harm_flagged || !summary.integrity_passed {
        style(text).yellow().to_string()
    } else {
        style(text).dim().to_string()
    }
}

fn time_suffix(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => format!(
            " {}",
            style(ts.with_timezone(&Local).format("%H:%M").to_string()).dim()
        ),
        None => String::new(),
    }
}
