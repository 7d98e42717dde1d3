//! Validate command - static checks on a flow document file.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use console::Style;
use serde::Serialize;

use whatsflow_flow::{FlowDocument, validate};

use super::Context;

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Flow document to validate
    pub file: PathBuf,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,
}

/// Validation result for JSON output.
#[derive(Debug, Serialize)]
struct ValidateOutput {
    ok: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Run the validate command.
pub fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let json = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let doc = FlowDocument::from_json(&json)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    let report = validate(&doc);

    if ctx.json {
        let output = ValidateOutput {
            ok: report.is_ok(),
            errors: report.errors.iter().map(|e| e.to_string()).collect(),
            warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let red = Style::new().red();
        let yellow = Style::new().yellow();
        let green = Style::new().green();

        for error in &report.errors {
            println!("{} {}", red.apply_to("error:"), error);
        }
        for warning in &report.warnings {
            println!("{} {}", yellow.apply_to("warning:"), warning);
        }

        if report.is_clean() {
            println!(
                "{} {} is valid ({} screens)",
                green.apply_to("✓"),
                args.file.display(),
                doc.screens.len()
            );
        } else {
            println!(
                "{} error(s), {} warning(s)",
                report.errors.len(),
                report.warnings.len()
            );
        }
    }

    let failed = !report.is_ok() || (args.strict && !report.is_clean());
    if failed {
        std::process::exit(1);
    }

    Ok(())
}
