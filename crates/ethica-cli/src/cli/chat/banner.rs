//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
///
/// Shows the backend the session talks to and a hint about slash commands.
pub fn print_welcome_banner(base_url: &str, backend_status: Option<&str>) {
    println!();
    println!("  {} {}", style("◆").cyan(), style("Ethica").cyan().bold());
    println!(
        "  {}",
        style("Conversations with ethical checks on every reply").dim()
    );
    println!();
    println!("  {}  {}", style("Backend:").bold(), style(base_url).dim());
    if let Some(status) = backend_status {
        println!("  {}   {}", style("Status:").bold(), style(status).dim());
    }
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
