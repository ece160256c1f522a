//! System status dashboard command.

use anyhow::Result;
use console::style;

use robotskills_types::submission::SubmissionStatus;

use crate::cli::display::format_status;
use crate::state::AppState;

/// Display submission counts by status, hook configuration and storage info.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let counts = state.submission_service.status_counts().await?;
    let total: u64 = counts.iter().map(|(_, n)| n).sum();
    let awaiting_oem = counts
        .iter()
        .find(|(s, _)| *s == SubmissionStatus::PendingOemReview)
        .map_or(0, |(_, n)| *n);

    let revalidation = state.config.revalidation.endpoint.clone();
    let notifications = state.config.notifications.enabled;

    if json {
        let by_status: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(s, n)| (s.to_string(), serde_json::json!(n)))
            .collect();
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "submissions": {
                "total": total,
                "by_status": by_status,
            },
            "hooks": {
                "notifications": notifications,
                "revalidation_endpoint": revalidation,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} RobotSkills v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Submissions ──").dim());
    println!("  Total: {}", style(total).bold());
    for (status, n) in &counts {
        if *n > 0 {
            println!("  {:>4}  {}", n, format_status(*status));
        }
    }
    if awaiting_oem > 0 {
        println!();
        println!(
            "  {} {} waiting for OEM review",
            style("!").yellow().bold(),
            awaiting_oem
        );
    }
    println!();

    println!("  {}", style("── Hooks ──").dim());
    println!(
        "  Notifications: {}",
        if notifications {
            style("on").green()
        } else {
            style("off").dim()
        }
    );
    match revalidation {
        Some(endpoint) => println!("  Revalidation:  {}", style(endpoint).cyan()),
        None => println!("  Revalidation:  {}", style("not configured").dim()),
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!(
        "  Data dir: {}",
        style(state.data_dir.display()).dim()
    );
    println!(
        "  Database: {}",
        style("SQLite (WAL mode)").dim()
    );
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    #[tokio::test]
    async fn test_status_on_empty_database() {
        let state = test_state().await;
        status(&state, true).await.unwrap();
        status(&state, false).await.unwrap();
    }
}
