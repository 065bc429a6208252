//! Blocking subprocess execution with explicit per-invocation environments.
//!
//! Every external-tool call in the pipeline goes through [`CommandRunner`],
//! so components stay unit-testable with a scripted runner. Build
//! parameters (CGO_ENABLED, GOOS, GOARCH) are passed as an explicit env
//! overlay on each invocation; the ambient process environment is never
//! mutated, which keeps cross-matrix cells isolated from one another.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

/// A single external-tool invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  /// Working directory; inherits the current directory when `None`.
  pub cwd: Option<PathBuf>,
  /// Environment overlay merged over the inherited environment.
  pub env: BTreeMap<String, String>,
}

impl Invocation {
  pub fn new<S, I>(program: &str, args: I) -> Self
  where
    S: Into<String>,
    I: IntoIterator<Item = S>,
  {
    Self {
      program: program.to_string(),
      args: args.into_iter().map(Into::into).collect(),
      cwd: None,
      env: BTreeMap::new(),
    }
  }

  pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn env(mut self, key: &str, value: impl Into<String>) -> Self {
    self.env.insert(key.to_string(), value.into());
    self
  }

  /// The invocation rendered as a shell-like string, for log output.
  pub fn display(&self) -> String {
    let mut parts = vec![self.program.clone()];
    parts.extend(self.args.iter().cloned());
    parts.join(" ")
  }
}

/// Captured result of a finished invocation.
#[derive(Debug, Clone)]
pub struct Exit {
  /// Process exit code; `None` when terminated by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl Exit {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Seam for invoking external toolchains.
///
/// The pipeline runs against [`SystemRunner`]; unit tests substitute a
/// scripted fake.
pub trait CommandRunner {
  fn run(&self, inv: &Invocation) -> io::Result<Exit>;
}

/// Runs invocations as real blocking subprocesses with captured output.
///
/// There is no timeout: every invocation blocks until the tool finishes,
/// which is acceptable for an interactively-run local build tool.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, inv: &Invocation) -> io::Result<Exit> {
    debug!(cmd = %inv.display(), cwd = ?inv.cwd, "running command");

    let mut command = Command::new(&inv.program);
    command.args(&inv.args);
    if let Some(cwd) = &inv.cwd {
      command.current_dir(cwd);
    }
    command.envs(&inv.env);

    let output = command.output()?;

    Ok(Exit {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
  }
}
