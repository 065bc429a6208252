//! The single error taxonomy raised by pipeline components.
//!
//! Hard failures surface as one of these variants and travel up to the
//! orchestrator; soft failures (captcha build, garble install, matrix
//! cells) are handled where they occur and only produce log output.

use std::io;

use thiserror::Error;

/// Errors raised by build pipeline stages.
#[derive(Debug, Error)]
pub enum BuildError {
  /// One or more required external tools are absent from PATH.
  #[error("missing required dependencies: {}", .missing.join(", "))]
  ToolingMissing { missing: Vec<String> },

  /// Submodule init/update failed, or the root is not a git repository.
  #[error("submodule sync failed: {reason}")]
  Sync { reason: String },

  /// The Rust captcha component failed to compile.
  ///
  /// Swallowed by the pipeline (soft gate); see `pipeline::Stage`.
  #[error("captcha build failed: {reason}")]
  Native { reason: String },

  /// `go mod tidy` exited non-zero.
  #[error("environment preparation failed: {reason}")]
  Prepare { reason: String },

  /// A `go build` (or garble-wrapped build) exited non-zero.
  ///
  /// Carries a remediation hint when stderr pointed at the missing
  /// captcha component.
  #[error("go build failed: {reason}")]
  Compile { reason: String },

  /// A tool could not be spawned at all.
  #[error("failed to run {tool}: {source}")]
  Spawn {
    tool: String,
    #[source]
    source: io::Error,
  },

  #[error("io error: {0}")]
  Io(#[from] io::Error),

  #[error("archive error: {0}")]
  Archive(#[from] zip::result::ZipError),
}
