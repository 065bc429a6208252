//! Git submodule synchronization.
//!
//! The captcha component's source lives in a submodule, so both the init
//! and the recursive update step are hard prerequisites for every build.

use std::path::PathBuf;

use tracing::info;

use crate::error::BuildError;
use crate::process::{CommandRunner, Invocation};

pub struct SourceSynchronizer {
  root: PathBuf,
}

impl SourceSynchronizer {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Initialize and recursively update all submodules.
  pub fn sync(&self, exec: &dyn CommandRunner) -> Result<(), BuildError> {
    info!("initializing git submodules");

    if !self.root.join(".git").exists() {
      return Err(BuildError::Sync {
        reason: format!("{} is not a git repository; run from the project root", self.root.display()),
      });
    }

    self.git(exec, &["submodule", "init"])?;
    self.git(exec, &["submodule", "update", "--recursive"])?;

    info!("submodules initialized and updated");
    Ok(())
  }

  fn git(&self, exec: &dyn CommandRunner, args: &[&str]) -> Result<(), BuildError> {
    let inv = Invocation::new("git", args.iter().copied()).cwd(&self.root);
    let exit = exec.run(&inv).map_err(|source| BuildError::Spawn {
      tool: "git".to_string(),
      source,
    })?;

    if !exit.success() {
      return Err(BuildError::Sync {
        reason: format!("`{}` exited with {:?}: {}", inv.display(), exit.code, exit.stderr.trim()),
      });
    }
    Ok(())
  }
}
