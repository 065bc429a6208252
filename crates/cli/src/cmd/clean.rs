//! Implementation of the `btgbuild clean` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use btgbuild_lib::clean::CleanupManager;
use btgbuild_lib::consts::CAPTCHA_DIR;
use btgbuild_lib::process::SystemRunner;

use crate::output;

/// Remove prior build output and both toolchains' caches.
pub fn cmd_clean(output: PathBuf) -> Result<()> {
  let root = std::env::current_dir().context("Could not determine the current directory")?;
  let captcha_dir = CAPTCHA_DIR.iter().fold(root, |path, part| path.join(part));

  CleanupManager::new(captcha_dir)
    .clean(&SystemRunner, &output)
    .context("Clean failed")?;

  output::print_success("Clean complete");
  Ok(())
}
