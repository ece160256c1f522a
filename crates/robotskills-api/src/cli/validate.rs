//! `rskills validate <kind> <file>`: dry-run a section validator.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tokio::io::AsyncReadExt;

use robotskills_core::validation::validate_section;
use robotskills_types::section::SectionKind;

use crate::cli::display::print_field_errors;

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub async fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

pub async fn validate_file(kind: &str, file: &Path, json: bool, quiet: bool) -> Result<()> {
    let kind: SectionKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let payload = read_json(file).await?;

    match validate_section(kind, &payload) {
        Ok(section) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&section)?);
            } else if !quiet {
                println!(
                    "  {} {} section is valid",
                    style("✓").green().bold(),
                    style(kind).cyan()
                );
            }
            Ok(())
        }
        Err(errors) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&errors)?);
            } else {
                eprintln!(
                    "  {} {} section has {} problem(s):",
                    style("✗").red().bold(),
                    style(kind).cyan(),
                    errors.len()
                );
                print_field_errors(&errors);
            }
            anyhow::bail!("{kind} section is invalid")
        }
    }
}
