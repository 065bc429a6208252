//! Implementation of the `btgbuild build` command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use btgbuild_lib::pipeline::{BuildConfig, Pipeline};
use btgbuild_lib::process::SystemRunner;
use btgbuild_lib::{BuildMode, tools::DependencyChecker};

use crate::cmd::deps::render_report;
use crate::output;

/// Execute the build pipeline, or just the dependency check with
/// `--check-deps`.
pub fn cmd_build(
  mode: BuildMode,
  output: PathBuf,
  clean: bool,
  check_deps: bool,
  skip_captcha: bool,
  verbose: bool,
) -> Result<()> {
  let exec = SystemRunner;
  let root = std::env::current_dir().context("Could not determine the current directory")?;

  if check_deps {
    let report = DependencyChecker.check(&exec);
    render_report(&report);
    if !report.all_available() {
      bail!("some dependencies are missing");
    }
    output::print_success("All dependencies are available!");
    return Ok(());
  }

  let config = BuildConfig {
    mode,
    output_dir: output,
    clean,
    verbose,
    skip_native: skip_captcha,
  };

  Pipeline::new(root).run(&exec, &config).context("Build failed")?;

  output::print_success("Build completed successfully!");
  Ok(())
}
