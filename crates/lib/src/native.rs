//! Rust captcha component build.
//!
//! The captcha component is optional in some configurations, so a missing
//! checkout is a soft skip and a failed compile only produces an error in
//! the pipeline's soft-gated stage. If the component really was required,
//! the Go link step will fail later with a targeted remediation hint.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::error::BuildError;
use crate::process::{CommandRunner, Invocation};

pub struct NativeComponentBuilder {
  dir: PathBuf,
}

impl NativeComponentBuilder {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  /// Build the captcha component in release mode.
  ///
  /// Missing directory or manifest returns `Ok` with a warning (soft
  /// skip). A failing or unspawnable cargo invocation returns `Err`; the
  /// pipeline's soft gate swallows it and continues.
  pub fn build(&self, exec: &dyn CommandRunner) -> Result<(), BuildError> {
    info!("building Rust captcha component");

    if !self.dir.exists() {
      warn!("captcha directory not found: {}", self.dir.display());
      warn!("skipping captcha build; the Go build may fail if it requires the captcha component");
      return Ok(());
    }

    if !self.dir.join("Cargo.toml").exists() {
      warn!("Cargo.toml not found in {}", self.dir.display());
      warn!("skipping captcha build; the Go build may fail if it requires the captcha component");
      return Ok(());
    }

    let inv = Invocation::new("cargo", ["build", "--release"]).cwd(&self.dir);
    let exit = exec.run(&inv).map_err(|source| BuildError::Spawn {
      tool: "cargo".to_string(),
      source,
    })?;

    if !exit.success() {
      error!("captcha build failed: {}", exit.stderr.trim());
      return Err(BuildError::Native {
        reason: format!("cargo exited with {:?}", exit.code),
      });
    }

    info!("captcha component built successfully");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::process::testing::{FakeRunner, fail_exit, ok_exit};

  #[test]
  fn missing_directory_is_a_soft_skip() {
    let temp = TempDir::new().unwrap();
    let runner = FakeRunner::new(|_| Ok(ok_exit()));

    let result = NativeComponentBuilder::new(temp.path().join("absent")).build(&runner);
    assert!(result.is_ok());
    assert!(runner.programs().is_empty());
  }

  #[test]
  fn missing_manifest_is_a_soft_skip() {
    let temp = TempDir::new().unwrap();
    let runner = FakeRunner::new(|_| Ok(ok_exit()));

    let result = NativeComponentBuilder::new(temp.path()).build(&runner);
    assert!(result.is_ok());
    assert!(runner.programs().is_empty());
  }

  #[test]
  fn successful_build_runs_cargo_release() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("Cargo.toml"), "[package]").unwrap();
    let runner = FakeRunner::new(|_| Ok(ok_exit()));

    NativeComponentBuilder::new(temp.path()).build(&runner).unwrap();

    let log = runner.log.borrow();
    assert_eq!(log[0].program, "cargo");
    assert_eq!(log[0].args, ["build", "--release"]);
    assert_eq!(log[0].cwd.as_deref(), Some(temp.path()));
  }

  #[test]
  fn failed_compile_surfaces_as_native_error() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("Cargo.toml"), "[package]").unwrap();
    let runner = FakeRunner::new(|_| Ok(fail_exit("error[E0599]: no method")));

    let err = NativeComponentBuilder::new(temp.path()).build(&runner).unwrap_err();
    assert!(matches!(err, BuildError::Native { .. }));
  }
}
