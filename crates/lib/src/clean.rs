//! Build artifact cleanup.
//!
//! Removes the output directory, asks go to drop its build cache
//! (best-effort) and clears the captcha component's target directory.
//! Safe to call when nothing exists to clean.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::BuildError;
use crate::process::{CommandRunner, Invocation};

pub struct CleanupManager {
  captcha_dir: PathBuf,
}

impl CleanupManager {
  pub fn new(captcha_dir: impl Into<PathBuf>) -> Self {
    Self {
      captcha_dir: captcha_dir.into(),
    }
  }

  /// Remove prior build output and both toolchains' artifacts.
  pub fn clean(&self, exec: &dyn CommandRunner, output_dir: &Path) -> Result<(), BuildError> {
    info!("cleaning build artifacts");

    if output_dir.exists() {
      fs::remove_dir_all(output_dir)?;
      info!("removed {}", output_dir.display());
    }

    match exec.run(&Invocation::new("go", ["clean", "-cache"])) {
      Ok(exit) if exit.success() => info!("cleaned go build cache"),
      Ok(exit) => warn!("go clean -cache exited with {:?}", exit.code),
      Err(err) => warn!("could not run go clean: {}", err),
    }

    let target = self.captcha_dir.join("target");
    if target.exists() {
      fs::remove_dir_all(&target)?;
      info!("cleaned captcha build artifacts");
    }

    Ok(())
  }
}
