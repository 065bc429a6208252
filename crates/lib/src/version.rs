//! Version metadata injected into release binaries.
//!
//! Commit hash and build timestamp are resolved once per invocation, so
//! every artifact produced in one run (including all matrix cells) shares
//! identical metadata.

use std::path::Path;

use chrono::Utc;
use tracing::debug;

use crate::consts::{DEFAULT_LOG_LEVEL, GO_MODULE};
use crate::process::{CommandRunner, Invocation};

/// Link-time version metadata for one orchestrator invocation.
#[derive(Debug, Clone)]
pub struct BuildMeta {
  /// Short commit hash; empty when the commit cannot be resolved.
  pub commit_short: String,
  /// UTC Unix timestamp taken when the invocation started.
  pub build_unix: i64,
}

impl BuildMeta {
  /// Resolve metadata from the repository at `root`.
  ///
  /// A failing or unspawnable `git rev-parse` yields an empty commit
  /// string; it never fails the build.
  pub fn resolve(exec: &dyn CommandRunner, root: &Path) -> Self {
    let commit_short = match exec.run(&Invocation::new("git", ["rev-parse", "--short", "HEAD"]).cwd(root)) {
      Ok(exit) if exit.success() => exit.stdout.trim().to_string(),
      _ => {
        debug!("could not resolve commit hash; embedding empty string");
        String::new()
      }
    };

    Self {
      commit_short,
      build_unix: Utc::now().timestamp(),
    }
  }

  /// Apply the `--commit` / `--buildtime` overrides of the package entry
  /// point.
  pub fn with_overrides(mut self, commit: Option<String>, buildtime: Option<i64>) -> Self {
    if let Some(commit) = commit {
      self.commit_short = commit;
    }
    if let Some(buildtime) = buildtime {
      self.build_unix = buildtime;
    }
    self
  }

  /// The full `-ldflags` value for release builds: strip flags plus the
  /// three `-X` name=value substitutions.
  pub fn ldflags(&self) -> String {
    format!(
      "-s -w -X '{module}/global.GitCommit={commit}' -X '{module}/global.BuildTime={time}' -X '{module}/global.LoggerLevel={level}'",
      module = GO_MODULE,
      commit = self.commit_short,
      time = self.build_unix,
      level = DEFAULT_LOG_LEVEL,
    )
  }
}
