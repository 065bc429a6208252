//! Go environment preparation.
//!
//! `go mod tidy` is a hard prerequisite of every application build.
//! Installing garble is best-effort: release builds fall back to a plain
//! `go build` when it is unavailable.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::consts::GARBLE_MODULE;
use crate::error::BuildError;
use crate::process::{CommandRunner, Invocation};

pub struct HostEnvironmentPreparer {
  root: PathBuf,
}

impl HostEnvironmentPreparer {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Reconcile Go module metadata. Hard prerequisite.
  pub fn tidy(&self, exec: &dyn CommandRunner) -> Result<(), BuildError> {
    info!("running go mod tidy");

    let exit = exec
      .run(&Invocation::new("go", ["mod", "tidy"]).cwd(&self.root))
      .map_err(|source| BuildError::Spawn {
        tool: "go".to_string(),
        source,
      })?;

    if !exit.success() {
      return Err(BuildError::Prepare {
        reason: format!("go mod tidy exited with {:?}: {}", exit.code, exit.stderr.trim()),
      });
    }
    Ok(())
  }

  /// Install the garble obfuscation tool. Best-effort.
  pub fn install_garble(&self, exec: &dyn CommandRunner) -> Result<(), BuildError> {
    info!("installing garble");

    let exit = exec
      .run(&Invocation::new("go", ["install", GARBLE_MODULE]).cwd(&self.root))
      .map_err(|source| BuildError::Spawn {
        tool: "go".to_string(),
        source,
      })?;

    if !exit.success() {
      // The stage gate downgrades this to a warning; obfuscated builds
      // just won't be available.
      warn!("failed to install garble: {}", exit.stderr.trim());
      return Err(BuildError::Prepare {
        reason: format!("go install {} exited with {:?}", GARBLE_MODULE, exit.code),
      });
    }

    info!("garble installed successfully");
    Ok(())
  }
}
