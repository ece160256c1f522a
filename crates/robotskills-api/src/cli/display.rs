//! Shared terminal formatting for CLI commands.

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use robotskills_types::error::{InvalidSection, SubmissionError, ValidationErrors};
use robotskills_types::review::{PlatformReviewResult, Severity, Verdict};
use robotskills_types::section::SectionKind;
use robotskills_types::submission::SubmissionStatus;

pub fn format_status(status: SubmissionStatus) -> String {
    match status {
        SubmissionStatus::Draft => format!("{}", style("✎ draft").dim()),
        SubmissionStatus::PendingAutomatedReview => {
            format!("{}", style("◐ pending_automated_review").cyan())
        }
        SubmissionStatus::PendingOemReview => format!("{}", style("◑ pending_oem_review").blue()),
        SubmissionStatus::Published => format!("{}", style("● published").green()),
        SubmissionStatus::Rejected => format!("{}", style("✗ rejected").red()),
        SubmissionStatus::Withdrawn => format!("{}", style("◌ withdrawn").dim()),
    }
}

pub fn status_cell(status: SubmissionStatus) -> Cell {
    let color = match status {
        SubmissionStatus::Draft | SubmissionStatus::Withdrawn => Color::DarkGrey,
        SubmissionStatus::PendingAutomatedReview => Color::Cyan,
        SubmissionStatus::PendingOemReview => Color::Blue,
        SubmissionStatus::Published => Color::Green,
        SubmissionStatus::Rejected => Color::Red,
    };
    Cell::new(status.as_str()).fg(color)
}

pub fn format_verdict(verdict: Verdict) -> String {
    match verdict {
        Verdict::Pass => format!("{}", style("pass").green().bold()),
        Verdict::Fail => format!("{}", style("fail").red().bold()),
    }
}

pub fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
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

/// First block of a UUID, enough to tell rows apart in a table.
pub fn short_id(id: &impl ToString) -> String {
    let id = id.to_string();
    id.split('-').next().unwrap_or(&id).to_string()
}

pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn print_field_errors(errors: &ValidationErrors) {
    let mut table = new_table(&["Field", "Problem"]);
    for error in &errors.errors {
        let field = if error.field.is_empty() { "(payload)" } else { error.field.as_str() };
        table.add_row(vec![Cell::new(field).fg(Color::Yellow), Cell::new(&error.message)]);
    }
    eprintln!("{table}");
}

pub fn print_review(review: &PlatformReviewResult) {
    println!(
        "  {} Automated review: {} ({} finding(s))",
        style("◆").bold(),
        format_verdict(review.verdict),
        review.findings.len()
    );
    if review.findings.is_empty() {
        return;
    }

    let mut table = new_table(&["Severity", "Section", "Code", "Message"]);
    for finding in &review.findings {
        let severity = match finding.severity {
            Severity::Error => Cell::new("error").fg(Color::Red),
            Severity::Warning => Cell::new("warning").fg(Color::Yellow),
            Severity::Info => Cell::new("info").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            severity,
            Cell::new(finding.section.as_str()),
            Cell::new(&finding.code),
            Cell::new(&finding.message),
        ]);
    }
    println!("{table}");
}

fn print_incomplete(missing: &[SectionKind], invalid: &[InvalidSection]) {
    eprintln!();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
        eprintln!(
            "  {} Missing sections: {}",
            style("✗").red().bold(),
            style(names.join(", ")).yellow()
        );
    }
    for section in invalid {
        eprintln!(
            "  {} Section '{}' no longer validates:",
            style("✗").red().bold(),
            section.kind
        );
        print_field_errors(&section.errors);
    }
    eprintln!();
}

/// Print field-level detail for workflow errors, then hand the error back
/// for `anyhow` to report.
pub fn explain(err: SubmissionError, json: bool) -> anyhow::Error {
    if !json {
        match &err {
            SubmissionError::Validation(errors) => print_field_errors(errors),
            SubmissionError::IncompleteSubmission { missing, invalid } => {
                print_incomplete(missing, invalid)
            }
            _ => {}
        }
    }
    err.into()
}
