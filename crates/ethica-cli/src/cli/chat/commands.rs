//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and map onto the controller's entry points:
//! persistence, parameter controls, history and status.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Save the conversation under a name (empty when omitted).
    Save(String),
    /// Load a saved conversation, or list them when no id is given.
    Load(Option<String>),
    /// List saved conversations.
    List,
    /// Delete a saved conversation.
    Delete(String),
    /// Clear the conversation (backend and local).
    Clear,
    /// Clear the terminal screen.
    ClearScreen,
    /// Start a new conversation.
    New,
    /// Show the parameter controls.
    Params,
    /// Set one parameter control.
    Set { key: String, value: String },
    /// Restore one parameter control to its default.
    Unset(String),
    /// Show the conversation transcript.
    History,
    /// Show the backend status.
    Status,
    /// Exit the chat session.
    Exit,
    /// Unknown or malformed command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/save" => ChatCommand::Save(arg.to_string()),
        "/load" | "/open" => ChatCommand::Load((!arg.is_empty()).then(|| arg.to_string())),
        "/list" | "/ls" => ChatCommand::List,
        "/delete" | "/rm" => {
            if arg.is_empty() {
                ChatCommand::Unknown("/delete requires a conversation id".to_string())
            } else {
                ChatCommand::Delete(arg.to_string())
            }
        }
        "/clear" => ChatCommand::Clear,
        "/cls" => ChatCommand::ClearScreen,
        "/new" => ChatCommand::New,
        "/params" | "/parameters" => ChatCommand::Params,
        "/set" => match arg.split_once(char::is_whitespace) {
            Some((key, value)) if !value.trim().is_empty() => ChatCommand::Set {
                key: key.to_string(),
                value: value.trim().to_string(),
            },
            _ => ChatCommand::Unknown("/set requires a key and a value".to_string()),
        },
        "/unset" | "/reset" => {
            if arg.is_empty() {
                ChatCommand::Unknown("/unset requires a key".to_string())
            } else {
                ChatCommand::Unset(arg.to_string())
            }
        }
        "/history" => ChatCommand::History,
        "/status" => ChatCommand::Status,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/save <name>", "Save this conversation"),
        ("/load [id]", "Load a saved conversation (lists them without an id)"),
        ("/list", "List saved conversations"),
        ("/delete <id>", "Delete a saved conversation"),
        ("/clear", "Clear the conversation"),
        ("/new", "Start a new conversation"),
        ("/params", "Show generation and moderation parameters"),
        ("/set <key> <value>", "Change a parameter"),
        ("/unset <key>", "Restore a parameter to its default"),
        ("/history", "Show the conversation so far"),
        ("/status", "Show backend status"),
        ("/cls", "Clear the screen"),
        ("/exit", "End the chat session"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (command, description) in rows {
        println!("  {} {}", style(format!("{command:<20}")).cyan(), description);
    }
    println!();
    println!(
        "  {}",
        style("After a reply, the next line answers it as a follow-up. Ctrl+D to exit.").dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/Q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_save_keeps_name_spaces() {
        assert_eq!(
            parse("/save  Trip to  Lisbon "),
            Some(ChatCommand::Save("Trip to  Lisbon".to_string()))
        );
        assert_eq!(parse("/save"), Some(ChatCommand::Save(String::new())));
    }

    #[test]
    fn test_parse_load() {
        assert_eq!(parse("/load"), Some(ChatCommand::Load(None)));
        assert_eq!(
            parse("/load conv_1712345678"),
            Some(ChatCommand::Load(Some("conv_1712345678".to_string())))
        );
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse("/set stop_sequences END, ###"),
            Some(ChatCommand::Set {
                key: "stop_sequences".to_string(),
                value: "END, ###".to_string()
            })
        );
        assert!(matches!(parse("/set temperature"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_requires_arguments() {
        assert!(matches!(parse("/delete"), Some(ChatCommand::Unknown(_))));
        assert!(matches!(parse("/unset"), Some(ChatCommand::Unknown(_))));
        assert_eq!(parse("/unset seed"), Some(ChatCommand::Unset("seed".to_string())));
    }

    #[test]
    fn test_parse_clear_variants() {
        assert_eq!(parse("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse("/cls"), Some(ChatCommand::ClearScreen));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse("  what about /help?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
