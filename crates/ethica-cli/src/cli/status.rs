//! Backend status command.

use anyhow::Result;
use console::style;

use ethica_types::status::ServiceStatus;

use crate::state::AppState;

/// Display the backend status report.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let report = state.controller().status().await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "base_url": state.base_url,
            "data_dir": state.data_dir.display().to_string(),
            "backend": report,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Ethica v{}",
        style("◆").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    print_status(&state.base_url, &report);

    println!("  {}", style("── Client ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!();

    Ok(())
}

/// Print the backend section of the status report.
pub fn print_status(base_url: &str, report: &ServiceStatus) {
    let status = if report.is_operational() {
        style(report.status.as_str()).green().bold()
    } else {
        style(report.status.as_str()).yellow().bold()
    };

    println!("  {}", style("── Backend ──").dim());
    println!("  URL:        {}", style(base_url).dim());
    println!("  Status:     {status}");
    if let Some(monitoring) = &report.monitoring {
        println!("  Monitoring: {}", display_value(monitoring));
    }
    if let Some(timestamp) = &report.timestamp {
        println!("  Reported:   {}", style(timestamp).dim());
    }
    for (key, value) in &report.extra {
        println!("  {key}: {}", display_value(value));
    }
    println!();
}

/// Strings without quotes; everything else as compact JSON.
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
