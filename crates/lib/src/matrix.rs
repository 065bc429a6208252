//! Cross-platform matrix builds.
//!
//! The six platform cells are iterated sequentially on purpose: go and
//! cargo share one global build cache per machine, and concurrent
//! invocations targeting different platforms would race on it. Each cell
//! is attempted regardless of earlier failures.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::consts::GO_ENTRYPOINT;
use crate::platform::{CROSS_MATRIX, PlatformTarget};
use crate::process::{CommandRunner, Invocation};

/// Per-cell outcome counts of one matrix run.
#[derive(Debug, Default)]
pub struct MatrixSummary {
  pub succeeded: Vec<PlatformTarget>,
  pub failed: Vec<PlatformTarget>,
}

impl MatrixSummary {
  pub fn attempted(&self) -> usize {
    self.succeeded.len() + self.failed.len()
  }
}

pub struct CrossMatrixBuilder {
  root: PathBuf,
}

impl CrossMatrixBuilder {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Build every matrix cell into `{output_dir}/{os}_{arch}/`.
  ///
  /// Failures are isolated per cell; the summary always accounts for all
  /// six targets.
  pub fn build_all(&self, exec: &dyn CommandRunner, output_dir: &Path) -> MatrixSummary {
    info!("building for multiple platforms");

    let mut summary = MatrixSummary::default();

    for target in CROSS_MATRIX {
      info!("building for {}", target);

      if self.build_cell(exec, output_dir, target) {
        info!("✓ built for {}", target);
        summary.succeeded.push(target);
      } else {
        error!("✗ failed to build for {}", target);
        summary.failed.push(target);
      }
    }

    info!(
      succeeded = summary.succeeded.len(),
      failed = summary.failed.len(),
      "cross-platform build completed"
    );
    summary
  }

  fn build_cell(&self, exec: &dyn CommandRunner, output_dir: &Path, target: PlatformTarget) -> bool {
    let platform_dir = output_dir.join(target.dir_name());
    if let Err(err) = fs::create_dir_all(&platform_dir) {
      warn!("could not create {}: {}", platform_dir.display(), err);
      return false;
    }

    let out = platform_dir.join(target.binary_name());

    // Release command shape without version injection.
    let inv = Invocation::new(
      "go",
      vec![
        "build".to_string(),
        "-trimpath".to_string(),
        "-ldflags".to_string(),
        "-s -w".to_string(),
        "-o".to_string(),
        out.to_string_lossy().into_owned(),
        GO_ENTRYPOINT.to_string(),
      ],
    )
    .cwd(&self.root)
    .env("GOOS", target.os.as_str())
    .env("GOARCH", target.arch.as_str())
    .env("CGO_ENABLED", "1");

    match exec.run(&inv) {
      Ok(exit) if exit.success() => true,
      Ok(exit) => {
        if !exit.stderr.trim().is_empty() {
          error!("{}", exit.stderr.trim());
        }
        false
      }
      Err(err) => {
        warn!("could not spawn go for {}: {}", target, err);
        false
      }
    }
  }
}
