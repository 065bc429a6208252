//! The Go application build.
//!
//! Dev builds are fast host-platform compiles with debug info; release
//! builds strip symbols, trim paths and inject version metadata through
//! `-ldflags -X`, wrapped by garble when it is on PATH. Cross mode hands
//! the work to the matrix builder.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{error, info};

use crate::consts::{GO_ENTRYPOINT, PROJECT_NAME};
use crate::error::BuildError;
use crate::matrix::CrossMatrixBuilder;
use crate::platform::{Os, PlatformTarget};
use crate::process::{CommandRunner, Invocation};
use crate::version::BuildMeta;

/// Build modes of the main pipeline entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
  Dev,
  Release,
  Cross,
}

impl BuildMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Dev => "dev",
      Self::Release => "release",
      Self::Cross => "cross",
    }
  }
}

impl fmt::Display for BuildMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BuildMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "dev" => Ok(Self::Dev),
      "release" => Ok(Self::Release),
      "cross" => Ok(Self::Cross),
      other => Err(format!("unknown build mode: {} (expected dev, release or cross)", other)),
    }
  }
}

pub struct ApplicationBuilder {
  root: PathBuf,
  meta: BuildMeta,
}

impl ApplicationBuilder {
  pub fn new(root: impl Into<PathBuf>, meta: BuildMeta) -> Self {
    Self { root: root.into(), meta }
  }

  /// Build the application into `output_dir`.
  ///
  /// Dev and release modes produce one binary and return its path. Cross
  /// mode iterates the whole platform matrix and returns `None`. With an
  /// explicit `target` the invocation cross-compiles via GOOS/GOARCH;
  /// otherwise the host platform is assumed.
  pub fn build(
    &self,
    exec: &dyn CommandRunner,
    mode: BuildMode,
    output_dir: &Path,
    target: Option<PlatformTarget>,
  ) -> Result<Option<PathBuf>, BuildError> {
    info!(mode = %mode, "building Go application");

    if mode == BuildMode::Cross {
      CrossMatrixBuilder::new(&self.root).build_all(exec, output_dir);
      return Ok(None);
    }

    fs::create_dir_all(output_dir)?;

    let out_path = output_dir.join(binary_name(target));
    let inv = self.command_for(mode, &out_path, target, garble_available());

    let exit = exec.run(&inv).map_err(|source| BuildError::Spawn {
      tool: inv.program.clone(),
      source,
    })?;

    if !exit.success() {
      error!("go build failed with exit code {:?}", exit.code);
      error!("stderr: {}", exit.stderr.trim());

      let mut reason = format!("`{}` exited with {:?}", inv.display(), exit.code);
      if let Some(hint) = remediation_hint(&exit.stderr) {
        reason.push_str("; ");
        reason.push_str(hint);
      }
      return Err(BuildError::Compile { reason });
    }

    info!("Go application built successfully: {}", out_path.display());
    Ok(Some(out_path))
  }

  /// The compiler invocation for a single-target build.
  ///
  /// Every invocation carries CGO_ENABLED=1: the application always links
  /// against the captcha component's compiled output.
  fn command_for(&self, mode: BuildMode, out_path: &Path, target: Option<PlatformTarget>, garble: bool) -> Invocation {
    let out = out_path.to_string_lossy().into_owned();

    let mut inv = match mode {
      BuildMode::Dev => Invocation::new("go", vec!["build".to_string(), "-o".to_string(), out, GO_ENTRYPOINT.to_string()]),
      BuildMode::Release => {
        let ldflags = self.meta.ldflags();
        if garble {
          Invocation::new(
            "garble",
            vec![
              "-tiny".to_string(),
              "build".to_string(),
              "-trimpath".to_string(),
              "-ldflags".to_string(),
              ldflags,
              "-o".to_string(),
              out,
              GO_ENTRYPOINT.to_string(),
            ],
          )
        } else {
          Invocation::new(
            "go",
            vec![
              "build".to_string(),
              "-trimpath".to_string(),
              "-ldflags".to_string(),
              ldflags,
              "-o".to_string(),
              out,
              GO_ENTRYPOINT.to_string(),
            ],
          )
        }
      }
      BuildMode::Cross => unreachable!("cross mode is dispatched to the matrix builder"),
    };

    inv = inv.cwd(&self.root).env("CGO_ENABLED", "1");
    if let Some(target) = target {
      inv = inv.env("GOOS", target.os.as_str()).env("GOARCH", target.arch.as_str());
    }
    inv
  }
}

/// Binary file name for the given target, falling back to the host OS.
fn binary_name(target: Option<PlatformTarget>) -> String {
  match target {
    Some(target) => target.binary_name(),
    None => {
      let suffix = Os::current().map(|os| os.exe_suffix()).unwrap_or("");
      format!("{}{}", PROJECT_NAME, suffix)
    }
  }
}

fn garble_available() -> bool {
  which::which("garble").is_ok()
}

/// Hint appended to compile errors whose stderr points at the missing
/// captcha component.
fn remediation_hint(stderr: &str) -> Option<&'static str> {
  if stderr.contains("bindings.h") || stderr.to_lowercase().contains("captcha") {
    Some("the captcha component appears to be missing; run `git submodule update --init --recursive` and rebuild")
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;
  use crate::platform::Arch;
  use crate::process::testing::{FakeRunner, fail_exit};

  fn builder() -> ApplicationBuilder {
    ApplicationBuilder::new(
      PathBuf::from("."),
      BuildMeta {
        commit_short: "3f9d2ab".to_string(),
        build_unix: 1700000000,
      },
    )
  }

  #[test]
  fn dev_command_is_a_plain_build() {
    let inv = builder().command_for(BuildMode::Dev, Path::new("dist/bilibili-ticket-go"), None, false);
    assert_eq!(inv.program, "go");
    assert_eq!(inv.args, ["build", "-o", "dist/bilibili-ticket-go", "./main.go"]);
    assert_eq!(inv.env.get("CGO_ENABLED").map(String::as_str), Some("1"));
    assert!(!inv.env.contains_key("GOOS"));
  }

  #[test]
  fn release_without_garble_uses_go_with_strip_flags() {
    let inv = builder().command_for(BuildMode::Release, Path::new("dist/bilibili-ticket-go"), None, false);
    assert_eq!(inv.program, "go");
    assert_eq!(inv.args[0], "build");
    assert!(inv.args.contains(&"-trimpath".to_string()));
    let ldflags = &inv.args[inv.args.iter().position(|a| a == "-ldflags").unwrap() + 1];
    assert!(ldflags.starts_with("-s -w"));
    assert!(ldflags.contains("global.GitCommit=3f9d2ab"));
  }

  #[test]
  fn release_with_garble_wraps_the_compiler() {
    let inv = builder().command_for(BuildMode::Release, Path::new("dist/bilibili-ticket-go"), None, true);
    assert_eq!(inv.program, "garble");
    assert_eq!(&inv.args[..2], ["-tiny", "build"]);
    assert!(inv.args.contains(&"-trimpath".to_string()));
  }

  #[test]
  fn explicit_target_sets_goos_and_goarch() {
    let target = PlatformTarget::new(Os::Windows, Arch::Arm64);
    let inv = builder().command_for(BuildMode::Release, Path::new("out/bilibili-ticket-go.exe"), Some(target), false);
    assert_eq!(inv.env.get("GOOS").map(String::as_str), Some("windows"));
    assert_eq!(inv.env.get("GOARCH").map(String::as_str), Some("arm64"));
    assert_eq!(inv.env.get("CGO_ENABLED").map(String::as_str), Some("1"));
  }

  #[test]
  fn compile_failure_without_captcha_markers_has_no_hint() {
    let temp = tempfile::TempDir::new().unwrap();
    let runner = FakeRunner::new(|_| Ok(fail_exit("syntax error in main.go")));

    let err = builder().build(&runner, BuildMode::Dev, temp.path(), None).unwrap_err();
    assert!(matches!(err, BuildError::Compile { .. }));
    assert!(!err.to_string().contains("submodule"));
  }

  #[test]
  fn missing_bindings_header_appends_submodule_hint() {
    let temp = tempfile::TempDir::new().unwrap();
    let runner = FakeRunner::new(|_| Ok(fail_exit("fatal error: bindings.h: No such file or directory")));

    let err = builder().build(&runner, BuildMode::Dev, temp.path(), None).unwrap_err();
    assert!(err.to_string().contains("git submodule update --init --recursive"));
  }

  #[test]
  fn captcha_symbol_errors_match_case_insensitively() {
    assert!(remediation_hint("undefined reference to Captcha_solve").is_some());
    assert!(remediation_hint("ld: cannot find -lcaptcha").is_some());
    assert!(remediation_hint("plain type error").is_none());
  }

  #[test]
  fn mode_strings_round_trip() {
    for mode in [BuildMode::Dev, BuildMode::Release, BuildMode::Cross] {
      assert_eq!(mode.as_str().parse::<BuildMode>().unwrap(), mode);
    }
    assert!("fast".parse::<BuildMode>().is_err());
  }
}
