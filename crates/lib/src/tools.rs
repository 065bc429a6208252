//! Required-toolchain verification.
//!
//! The catalogue of required tools is fixed: git for submodules, go for
//! the host application, cargo and rustc for the captcha component.
//! Checking is idempotent and has no persisted effect; `btgbuild build
//! --check-deps` and `btgbuild deps` call it standalone.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::process::{CommandRunner, Invocation};

/// One entry in the fixed tool catalogue.
pub struct ToolRequirement {
  pub name: &'static str,
  pub description: &'static str,
  version_args: &'static [&'static str],
}

/// Every tool the pipeline needs on PATH before any stage runs.
pub const REQUIRED_TOOLS: [ToolRequirement; 4] = [
  ToolRequirement {
    name: "git",
    description: "Git version control system",
    version_args: &["--version"],
  },
  ToolRequirement {
    name: "go",
    description: "Go programming language",
    version_args: &["version"],
  },
  ToolRequirement {
    name: "cargo",
    description: "Rust package manager (Cargo)",
    version_args: &["--version"],
  },
  ToolRequirement {
    name: "rustc",
    description: "Rust compiler",
    version_args: &["--version"],
  },
];

/// Probe result for one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
  pub name: String,
  pub description: String,
  pub available: bool,
  /// First line of the tool's version output; `None` when the tool is
  /// present but would not print a version.
  pub version: Option<String>,
}

/// Aggregated probe results for the whole catalogue. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
  pub tools: Vec<ToolStatus>,
}

impl DependencyReport {
  pub fn all_available(&self) -> bool {
    self.tools.iter().all(|t| t.available)
  }

  /// Missing tools as `name (description)` strings, for the aggregated
  /// failure message.
  pub fn missing(&self) -> Vec<String> {
    self
      .tools
      .iter()
      .filter(|t| !t.available)
      .map(|t| format!("{} ({})", t.name, t.description))
      .collect()
  }
}

/// Probes the required tool catalogue.
pub struct DependencyChecker;

impl DependencyChecker {
  /// Check every required tool against PATH.
  pub fn check(&self, exec: &dyn CommandRunner) -> DependencyReport {
    self.check_with(exec, |tool| which::which(tool).is_ok())
  }

  /// Check with a caller-supplied PATH lookup.
  ///
  /// A tool found by `lookup` counts as available even when its version
  /// invocation fails; the version is just reported as unknown.
  pub fn check_with(&self, exec: &dyn CommandRunner, lookup: impl Fn(&str) -> bool) -> DependencyReport {
    let tools = REQUIRED_TOOLS
      .iter()
      .map(|req| {
        if !lookup(req.name) {
          warn!("✗ {}: not found", req.name);
          return ToolStatus {
            name: req.name.to_string(),
            description: req.description.to_string(),
            available: false,
            version: None,
          };
        }

        let version = match exec.run(&Invocation::new(req.name, req.version_args.iter().copied())) {
          Ok(exit) if exit.success() => exit.stdout.lines().next().map(str::trim).filter(|l| !l.is_empty()).map(String::from),
          Ok(_) | Err(_) => None,
        };

        match &version {
          Some(version) => info!("✓ {}: {}", req.name, version),
          None => info!("✓ {}: available", req.name),
        }

        ToolStatus {
          name: req.name.to_string(),
          description: req.description.to_string(),
          available: true,
          version,
        }
      })
      .collect();

    let report = DependencyReport { tools };
    debug!(all_available = report.all_available(), "dependency check finished");
    report
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::process::testing::{FakeRunner, ok_stdout};

  fn check_subset(present: &[&str]) -> DependencyReport {
    let runner = FakeRunner::new(|inv| Ok(ok_stdout(&format!("{} version 1.0.0", inv.program))));
    DependencyChecker.check_with(&runner, |tool| present.contains(&tool))
  }

  #[test]
  fn full_set_is_available() {
    let report = check_subset(&["git", "go", "cargo", "rustc"]);
    assert!(report.all_available());
    assert!(report.missing().is_empty());
  }

  #[test]
  fn every_proper_subset_fails_with_exact_complement() {
    let all = ["git", "go", "cargo", "rustc"];
    // All 15 proper subsets of the four required tools.
    for mask in 0u32..15 {
      let present: Vec<&str> = all.iter().copied().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, t)| t).collect();
      let report = check_subset(&present);
      assert!(!report.all_available(), "subset {:?} should fail", present);

      let missing = report.missing();
      let expected: Vec<&str> = all.iter().copied().filter(|t| !present.contains(t)).collect();
      assert_eq!(missing.len(), expected.len());
      for tool in expected {
        assert!(
          missing.iter().any(|m| m.starts_with(tool)),
          "missing list should name {}",
          tool
        );
      }
    }
  }

  #[test]
  fn version_failure_still_counts_as_available() {
    let runner = FakeRunner::new(|_| Err(std::io::Error::other("probe exploded")));
    let report = DependencyChecker.check_with(&runner, |_| true);
    assert!(report.all_available());
    assert!(report.tools.iter().all(|t| t.version.is_none()));
  }

  #[test]
  fn version_is_first_line_of_stdout() {
    let runner = FakeRunner::new(|_| Ok(ok_stdout("go version go1.22.1 linux/amd64\nnoise\n")));
    let report = DependencyChecker.check_with(&runner, |_| true);
    let go = report.tools.iter().find(|t| t.name == "go").unwrap();
    assert_eq!(go.version.as_deref(), Some("go version go1.22.1 linux/amd64"));
  }

  #[test]
  fn missing_tool_is_not_version_probed() {
    let runner = FakeRunner::new(|inv| Ok(ok_stdout(&format!("{} 1.0", inv.program))));
    DependencyChecker.check_with(&runner, |tool| tool != "cargo");
    assert!(!runner.programs().contains(&"cargo".to_string()));
  }
}
