//! Submission workflow CLI commands.
//!
//! `rskills submission` covers the whole lifecycle: create a draft, fill in
//! sections from JSON files, submit, complete the automated review, record
//! the OEM decision, withdraw, and inspect history.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::Cell;
use console::style;
use dialoguer::{Confirm, Input, Select};

use robotskills_core::repository::SubmissionFilter;
use robotskills_types::review::{DecisionOutcome, OemDecisionRequest};
use robotskills_types::section::SectionKind;
use robotskills_types::submission::{
    CreateSubmissionRequest, SkillId, Submission, SubmissionId, SubmissionStatus,
};

use crate::cli::display::{
    explain, format_relative_time, format_status, new_table, print_review, short_id, status_cell,
};
use crate::cli::validate::read_json;
use crate::state::AppState;

/// Submission workflow subcommands.
#[derive(Subcommand)]
pub enum SubmissionCommand {
    /// Start a new draft.
    Create {
        /// Developer who owns the submission.
        #[arg(long, env = "ROBOTSKILLS_DEVELOPER_ID")]
        developer: Option<String>,

        /// Publish a new version of an existing skill.
        #[arg(long)]
        skill_id: Option<String>,
    },

    /// List submissions.
    #[command(alias = "ls")]
    List {
        /// Filter by status.
        #[arg(long)]
        status: Option<String>,

        /// Filter by developer.
        #[arg(long)]
        developer: Option<String>,

        /// Filter by skill id.
        #[arg(long)]
        skill_id: Option<String>,

        /// Maximum rows.
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Show a submission with its sections, review and decision.
    Show {
        /// Submission id.
        id: String,
    },

    /// Validate and store one section from a JSON file.
    #[command(name = "set-section")]
    SetSection {
        /// Submission id.
        id: String,

        /// Section kind: identity, assets, compatibility, permissions, package.
        kind: String,

        /// JSON file with the section payload (`-` for stdin).
        file: PathBuf,
    },

    /// Submit (or resubmit) for automated review.
    Submit {
        /// Submission id.
        id: String,
    },

    /// Advance from automated review using the stored verdict.
    #[command(name = "complete-review")]
    CompleteReview {
        /// Submission id.
        id: String,
    },

    /// Record the OEM's decision.
    Decide {
        /// Submission id.
        id: String,

        /// approve or reject (prompted when omitted).
        #[arg(long)]
        outcome: Option<String>,

        /// Manufacturer name.
        #[arg(long)]
        oem: Option<String>,

        /// Reviewer identity.
        #[arg(long, env = "ROBOTSKILLS_REVIEWER")]
        reviewer: Option<String>,

        /// Comments for the developer (required when rejecting).
        #[arg(long)]
        comments: Option<String>,
    },

    /// Withdraw a submission.
    Withdraw {
        /// Submission id.
        id: String,

        /// Who is withdrawing.
        #[arg(long, env = "ROBOTSKILLS_DEVELOPER_ID")]
        actor: Option<String>,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Show status transitions and review results.
    History {
        /// Submission id.
        id: String,
    },
}

/// Handle a submission subcommand.
pub async fn handle_submission_command(
    cmd: SubmissionCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        SubmissionCommand::Create {
            developer,
            skill_id,
        } => create(state, developer, skill_id, json).await,
        SubmissionCommand::List {
            status,
            developer,
            skill_id,
            limit,
        } => list(state, status, developer, skill_id, limit, json).await,
        SubmissionCommand::Show { id } => show(state, &id, json).await,
        SubmissionCommand::SetSection { id, kind, file } => {
            set_section(state, &id, &kind, &file, json).await
        }
        SubmissionCommand::Submit { id } => submit(state, &id, json).await,
        SubmissionCommand::CompleteReview { id } => complete_review(state, &id, json).await,
        SubmissionCommand::Decide {
            id,
            outcome,
            oem,
            reviewer,
            comments,
        } => decide(state, &id, outcome, oem, reviewer, comments, json).await,
        SubmissionCommand::Withdraw { id, actor, force } => {
            withdraw(state, &id, actor, force, json).await
        }
        SubmissionCommand::History { id } => history(state, &id, json).await,
    }
}

fn parse_id(raw: &str) -> Result<SubmissionId> {
    raw.parse()
        .with_context(|| format!("'{raw}' is not a submission id"))
}

fn parse_skill_id(raw: Option<String>) -> Result<Option<SkillId>> {
    raw.map(|s| {
        s.parse::<SkillId>()
            .with_context(|| format!("'{s}' is not a skill id"))
    })
    .transpose()
}

/// Print the submission as JSON or a one-line status change summary.
fn print_outcome(submission: &Submission, headline: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(submission)?);
        return Ok(());
    }
    println!();
    println!(
        "  {} {headline}: {}",
        style("✓").green().bold(),
        format_status(submission.status)
    );
    println!("  {}  {}", style("ID:").bold(), style(submission.id).dim());
    println!();
    Ok(())
}

async fn create(
    state: &AppState,
    developer: Option<String>,
    skill_id: Option<String>,
    json: bool,
) -> Result<()> {
    let developer_id = match developer {
        Some(d) => d,
        None => Input::<String>::new()
            .with_prompt("Developer id")
            .interact_text()?,
    };
    let request = CreateSubmissionRequest {
        developer_id,
        skill_id: parse_skill_id(skill_id)?,
    };

    let submission = state
        .submission_service
        .start_draft(request)
        .await
        .map_err(|e| explain(e, json))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&submission)?);
        return Ok(());
    }

    println!();
    println!("  {} Draft created", style("✓").green().bold());
    println!();
    println!("  {}     {}", style("ID:").bold(), style(submission.id).cyan());
    println!("  {}  {}", style("Skill:").bold(), submission.skill_id);
    println!();
    println!(
        "  Add sections with: {}",
        style(format!(
            "rskills submission set-section {} <kind> <file.json>",
            submission.id
        ))
        .yellow()
    );
    println!();
    Ok(())
}

async fn list(
    state: &AppState,
    status: Option<String>,
    developer: Option<String>,
    skill_id: Option<String>,
    limit: Option<i64>,
    json: bool,
) -> Result<()> {
    let status = status
        .map(|s| s.parse::<SubmissionStatus>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()?;
    let filter = SubmissionFilter {
        status,
        skill_id: parse_skill_id(skill_id)?,
        developer_id: developer,
        limit,
        offset: None,
    };

    let submissions = state.submission_service.list(filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&submissions)?);
        return Ok(());
    }

    if submissions.is_empty() {
        println!();
        println!(
            "  {} No submissions found. Start one with: {}",
            style("i").blue().bold(),
            style("rskills submission create").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = new_table(&["ID", "Skill", "Developer", "Status", "Sections", "Updated"]);
    for submission in &submissions {
        let name = submission
            .slug()
            .map(str::to_string)
            .unwrap_or_else(|| short_id(&submission.skill_id));
        table.add_row(vec![
            Cell::new(short_id(&submission.id)),
            Cell::new(name),
            Cell::new(&submission.developer_id),
            status_cell(submission.status),
            Cell::new(format!(
                "{}/{}",
                submission.sections.len(),
                SectionKind::COUNT
            )),
            Cell::new(format_relative_time(&submission.updated_at)),
        ]);
    }
    println!("{table}");
    println!(
        "  {} submission(s)",
        style(submissions.len()).bold()
    );
    Ok(())
}

async fn show(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let submission = state.submission_service.get(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&submission)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("Submission").bold(),
        style(submission.id).cyan()
    );
    println!();
    println!("  {}      {}", style("Skill:").bold(), submission.skill_id);
    if let Some(slug) = submission.slug() {
        println!("  {}       {}", style("Slug:").bold(), slug);
    }
    println!("  {}  {}", style("Developer:").bold(), submission.developer_id);
    println!("  {}     {}", style("Status:").bold(), format_status(submission.status));
    println!(
        "  {}    {}",
        style("Updated:").bold(),
        format_relative_time(&submission.updated_at)
    );
    println!();

    println!("  {}", style("── Sections ──").dim());
    for kind in SectionKind::ALL {
        let mark = if submission.section(*kind).is_some() {
            style("✓").green()
        } else {
            style("·").dim()
        };
        println!("  {mark} {kind}");
    }
    println!();

    if let Some(review) = &submission.review {
        print_review(review);
        println!();
    }

    if let Some(decision) = &submission.decision {
        println!(
            "  {} OEM decision: {} by {} ({})",
            style("◆").bold(),
            style(decision.outcome).bold(),
            decision.reviewer,
            decision.oem
        );
        if !decision.comments.is_empty() {
            println!("    {}", style(&decision.comments).italic());
        }
        println!();
    }
    Ok(())
}

async fn set_section(
    state: &AppState,
    id: &str,
    kind: &str,
    file: &std::path::Path,
    json: bool,
) -> Result<()> {
    let id = parse_id(id)?;
    let kind: SectionKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let payload = read_json(file).await?;

    let submission = state
        .submission_service
        .save_section(&id, kind, &payload)
        .await
        .map_err(|e| explain(e, json))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&submission)?);
        return Ok(());
    }

    let missing = submission.missing_sections();
    println!();
    println!(
        "  {} Saved {} section",
        style("✓").green().bold(),
        style(kind).cyan()
    );
    if missing.is_empty() {
        println!(
            "  All sections present. Submit with: {}",
            style(format!("rskills submission submit {id}")).yellow()
        );
    } else {
        let names: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
        println!("  Still missing: {}", style(names.join(", ")).yellow());
    }
    println!();
    Ok(())
}

async fn submit(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let submission = state
        .submission_service
        .submit_for_review(&id)
        .await
        .map_err(|e| explain(e, json))?;

    print_outcome(&submission, "Submitted", json)?;
    if !json {
        if let Some(review) = &submission.review {
            print_review(review);
            println!();
        }
    }
    Ok(())
}

async fn complete_review(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let submission = state
        .submission_service
        .complete_automated_review(&id)
        .await
        .map_err(|e| explain(e, json))?;

    print_outcome(&submission, "Automated review complete", json)
}

async fn decide(
    state: &AppState,
    id: &str,
    outcome: Option<String>,
    oem: Option<String>,
    reviewer: Option<String>,
    comments: Option<String>,
    json: bool,
) -> Result<()> {
    let id = parse_id(id)?;

    let outcome = match outcome {
        Some(o) => o
            .parse::<DecisionOutcome>()
            .map_err(|e| anyhow::anyhow!(e))?,
        None => {
            let choices = [DecisionOutcome::Approve, DecisionOutcome::Reject];
            let picked = Select::new()
                .with_prompt("Decision")
                .items(&choices)
                .default(0)
                .interact()?;
            choices[picked]
        }
    };
    let oem = match oem {
        Some(o) => o,
        None => Input::<String>::new().with_prompt("OEM").interact_text()?,
    };
    let reviewer = match reviewer {
        Some(r) => r,
        None => Input::<String>::new()
            .with_prompt("Reviewer")
            .interact_text()?,
    };
    let comments = match comments {
        Some(c) => c,
        None if outcome == DecisionOutcome::Reject => Input::<String>::new()
            .with_prompt("Reason for rejection")
            .interact_text()?,
        None => String::new(),
    };

    let request = OemDecisionRequest {
        oem,
        reviewer,
        outcome,
        comments,
    };
    let submission = state
        .submission_service
        .record_oem_decision(&id, request)
        .await
        .map_err(|e| explain(e, json))?;

    print_outcome(&submission, "Decision recorded", json)
}

async fn withdraw(
    state: &AppState,
    id: &str,
    actor: Option<String>,
    force: bool,
    json: bool,
) -> Result<()> {
    let id = parse_id(id)?;
    let submission = state.submission_service.get(&id).await?;
    let actor = actor.unwrap_or_else(|| submission.developer_id.clone());

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Withdraw submission {}? This cannot be undone.",
                style(short_id(&submission.id)).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let submission = state
        .submission_service
        .withdraw(&id, &actor)
        .await
        .map_err(|e| explain(e, json))?;

    print_outcome(&submission, "Withdrawn", json)
}

async fn history(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    state.submission_service.get(&id).await?;
    let transitions = state.submission_service.transition_history(&id).await?;
    let reviews = state.submission_service.review_history(&id).await?;

    if json {
        let history = serde_json::json!({
            "transitions": transitions,
            "reviews": reviews,
        });
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    println!();
    if transitions.is_empty() {
        println!("  {} Still a draft; no transitions yet.", style("i").blue().bold());
    } else {
        let mut table = new_table(&["When", "From", "To", "Actor"]);
        for record in &transitions {
            table.add_row(vec![
                Cell::new(record.at.format("%Y-%m-%d %H:%M:%S").to_string()),
                status_cell(record.from),
                status_cell(record.to),
                Cell::new(&record.actor),
            ]);
        }
        println!("{table}");
    }
    println!();

    for (i, review) in reviews.iter().enumerate() {
        println!(
            "  {} Review {} of {} ({})",
            style("──").dim(),
            reviews.len() - i,
            reviews.len(),
            review.reviewed_at.format("%Y-%m-%d %H:%M")
        );
        print_review(review);
        println!();
    }
    Ok(())
}
