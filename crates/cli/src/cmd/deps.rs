//! Implementation of the `btgbuild deps` command.

use anyhow::{Result, bail};

use btgbuild_lib::process::SystemRunner;
use btgbuild_lib::tools::{DependencyChecker, DependencyReport};

use crate::output;

/// Probe the required tools and report their status.
pub fn cmd_deps(json: bool) -> Result<()> {
  let report = DependencyChecker.check(&SystemRunner);

  if json {
    output::print_json(&report)?;
  } else {
    render_report(&report);
  }

  if !report.all_available() {
    bail!("some dependencies are missing");
  }
  Ok(())
}

/// One ✓/✗ line per tool plus an aggregated missing list on failure.
pub fn render_report(report: &DependencyReport) {
  for tool in &report.tools {
    if tool.available {
      match &tool.version {
        Some(version) => output::print_success(&format!("{}: {}", tool.name, version)),
        None => output::print_success(&format!("{}: available", tool.name)),
      }
    } else {
      output::print_error(&format!("{}: not found", tool.name));
    }
  }

  let missing = report.missing();
  if !missing.is_empty() {
    output::print_warning("Missing required dependencies:");
    for tool in missing {
      output::print_warning(&format!("  - {}", tool));
    }
  }
}
