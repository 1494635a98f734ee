//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline` to provide async line reading with
//! proper handling of EOF (Ctrl+D) and interrupt (Ctrl+C) signals.

use console::style;
use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug)]
pub enum InputEvent {
    /// User submitted a line.
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Which input the next line goes to; decides the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Primary,
    FollowUp,
    Confirm,
}

impl PromptKind {
    pub fn render(self) -> String {
        match self {
            PromptKind::Primary => format!("  {} ", style("You >").green().bold()),
            PromptKind::FollowUp => format!("  {} ", style("Follow-up >").cyan().bold()),
            PromptKind::Confirm => format!("  {} ", style("[y/N] >").yellow().bold()),
        }
    }
}

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
    prompt: PromptKind,
}

impl ChatInput {
    /// Create a new chat input handler showing the primary prompt.
    ///
    /// Returns the input handler and a `SharedWriter` that can be used to
    /// print output without interfering with the readline prompt.
    pub fn new() -> Result<(Self, SharedWriter), ReadlineError> {
        let prompt = PromptKind::Primary;
        let (rl, stdout) = Readline::new(prompt.render())?;
        Ok((Self { rl, prompt }, stdout))
    }

    /// Switch the prompt if it differs from the current one.
    pub fn set_prompt(&mut self, prompt: PromptKind) {
        if self.prompt != prompt {
            self.prompt = prompt;
            let _ = self.rl.update_prompt(&prompt.render());
        }
    }

    /// Read a line of input.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let trimmed = line.trim().to_string();
                if !trimmed.is_empty() {
                    self.rl.add_history_entry(trimmed.clone());
                }
                InputEvent::Message(trimmed)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before exit.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
