//! The top-level build pipeline.
//!
//! Stages run strictly in sequence; each stage descriptor carries an
//! explicit `hard_gate` flag instead of scattering failure policy through
//! the orchestrator. Hard gates abort the run, soft gates log and
//! continue.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::clean::CleanupManager;
use crate::consts::CAPTCHA_DIR;
use crate::error::BuildError;
use crate::gobuild::{ApplicationBuilder, BuildMode};
use crate::native::NativeComponentBuilder;
use crate::prepare::HostEnvironmentPreparer;
use crate::process::CommandRunner;
use crate::sync::SourceSynchronizer;
use crate::tools::DependencyChecker;
use crate::version::BuildMeta;

/// Immutable configuration of one orchestrator invocation.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  pub mode: BuildMode,
  pub output_dir: PathBuf,
  pub clean: bool,
  pub verbose: bool,
  pub skip_native: bool,
}

/// One pipeline stage: a name, a gate policy and the work itself.
pub struct Stage<'a> {
  pub name: &'static str,
  pub hard_gate: bool,
  run: Box<dyn FnOnce(&dyn CommandRunner) -> Result<(), BuildError> + 'a>,
}

pub struct Pipeline {
  root: PathBuf,
  // Tool PATH lookup, swappable in tests.
  lookup: fn(&str) -> bool,
}

impl Pipeline {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      lookup: |tool| which::which(tool).is_ok(),
    }
  }

  #[cfg(test)]
  fn with_lookup(root: impl Into<PathBuf>, lookup: fn(&str) -> bool) -> Self {
    Self {
      root: root.into(),
      lookup,
    }
  }

  fn captcha_dir(&self) -> PathBuf {
    CAPTCHA_DIR.iter().fold(self.root.clone(), |path, part| path.join(part))
  }

  /// Run the whole pipeline for `config`.
  ///
  /// Returns the first hard-gate failure; soft-gate failures are logged
  /// and skipped. The CLI maps the result to the process exit code.
  pub fn run(&self, exec: &dyn CommandRunner, config: &BuildConfig) -> Result<(), BuildError> {
    info!("starting build process (mode: {})", config.mode);
    debug!(?config, "build configuration");

    if config.clean {
      CleanupManager::new(self.captcha_dir()).clean(exec, &config.output_dir)?;
    }

    // Resolved once; shared by every artifact of this run.
    let meta = BuildMeta::resolve(exec, &self.root);

    for stage in self.stages(config, &meta) {
      debug!(stage = stage.name, hard_gate = stage.hard_gate, "entering stage");
      match (stage.run)(exec) {
        Ok(()) => {}
        Err(err) if stage.hard_gate => {
          error!("stage {} failed: {}", stage.name, err);
          return Err(err);
        }
        Err(err) => warn!("stage {} failed, continuing: {}", stage.name, err),
      }
    }

    info!("build completed successfully");
    Ok(())
  }

  fn stages<'a>(&'a self, config: &'a BuildConfig, meta: &'a BuildMeta) -> Vec<Stage<'a>> {
    let mut stages = Vec::new();

    stages.push(Stage {
      name: "dependency-check",
      hard_gate: true,
      run: Box::new(move |exec| {
        let report = DependencyChecker.check_with(exec, self.lookup);
        if report.all_available() {
          Ok(())
        } else {
          Err(BuildError::ToolingMissing { missing: report.missing() })
        }
      }),
    });

    stages.push(Stage {
      name: "submodule-sync",
      hard_gate: true,
      run: Box::new(move |exec| SourceSynchronizer::new(&self.root).sync(exec)),
    });

    if config.skip_native {
      info!("skipping captcha component build");
    } else {
      stages.push(Stage {
        name: "captcha-build",
        hard_gate: false,
        run: Box::new(move |exec| NativeComponentBuilder::new(self.captcha_dir()).build(exec)),
      });
    }

    stages.push(Stage {
      name: "go-mod-tidy",
      hard_gate: true,
      run: Box::new(move |exec| HostEnvironmentPreparer::new(&self.root).tidy(exec)),
    });

    stages.push(Stage {
      name: "garble-install",
      hard_gate: false,
      run: Box::new(move |exec| HostEnvironmentPreparer::new(&self.root).install_garble(exec)),
    });

    stages.push(Stage {
      name: "app-build",
      hard_gate: true,
      run: Box::new(move |exec| {
        ApplicationBuilder::new(&self.root, meta.clone())
          .build(exec, config.mode, &config.output_dir, None)
          .map(|_| ())
      }),
    });

    stages
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::process::testing::{FakeRunner, fail_exit, ok_exit, ok_stdout};

  fn project_root() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join(".git")).unwrap();
    temp
  }

  fn dev_config(root: &TempDir) -> BuildConfig {
    BuildConfig {
      mode: BuildMode::Dev,
      output_dir: root.path().join("dist"),
      clean: false,
      verbose: false,
      skip_native: false,
    }
  }

  fn all_present(_tool: &str) -> bool {
    true
  }

  #[test]
  fn happy_path_runs_stages_in_order() {
    let root = project_root();
    let runner = FakeRunner::new(|inv| {
      if inv.args.first().map(String::as_str) == Some("rev-parse") {
        Ok(ok_stdout("3f9d2ab\n"))
      } else {
        Ok(ok_exit())
      }
    });

    Pipeline::with_lookup(root.path(), all_present)
      .run(&runner, &dev_config(&root))
      .unwrap();

    // rev-parse, 4 version probes, submodule init + update, tidy,
    // garble install, app build. Captcha dir is absent, so no cargo.
    let log = runner.log.borrow();
    assert!(log.iter().any(|inv| inv.args.first().map(String::as_str) == Some("rev-parse")));
    let tidy_at = log.iter().position(|inv| inv.args == ["mod", "tidy"]).unwrap();
    let build_at = log.iter().position(|inv| inv.args.iter().any(|a| a == "./main.go")).unwrap();
    assert!(tidy_at < build_at, "tidy must run before the app build");
    assert!(!runner.programs().contains(&"cargo".to_string()));
  }

  #[test]
  fn missing_tool_aborts_before_sync() {
    let root = project_root();
    let runner = FakeRunner::new(|_| Ok(ok_exit()));

    let err = Pipeline::with_lookup(root.path(), |tool| tool != "go")
      .run(&runner, &dev_config(&root))
      .unwrap_err();

    assert!(matches!(err, BuildError::ToolingMissing { .. }));
    assert!(err.to_string().contains("go (Go programming language)"));
    // Only rev-parse and the three surviving version probes ran; no
    // submodule or build commands.
    assert!(!runner.log.borrow().iter().any(|inv| inv.args.first().map(String::as_str) == Some("submodule")));
  }

  #[test]
  fn sync_failure_aborts_before_tidy() {
    let root = project_root();
    let runner = FakeRunner::new(|inv| {
      if inv.args.first().map(String::as_str) == Some("submodule") {
        Ok(fail_exit("fatal: repository corrupt"))
      } else {
        Ok(ok_exit())
      }
    });

    let err = Pipeline::with_lookup(root.path(), all_present)
      .run(&runner, &dev_config(&root))
      .unwrap_err();

    assert!(matches!(err, BuildError::Sync { .. }));
    assert!(!runner.log.borrow().iter().any(|inv| inv.args == ["mod", "tidy"]));
  }

  #[test]
  fn captcha_failure_is_soft_and_the_build_continues() {
    let root = project_root();
    let captcha = root.path().join("captcha").join("biliTicker");
    std::fs::create_dir_all(&captcha).unwrap();
    std::fs::write(captcha.join("Cargo.toml"), "[package]").unwrap();

    let runner = FakeRunner::new(|inv| {
      if inv.program == "cargo" {
        Ok(fail_exit("error: linking failed"))
      } else {
        Ok(ok_exit())
      }
    });

    Pipeline::with_lookup(root.path(), all_present)
      .run(&runner, &dev_config(&root))
      .unwrap();

    assert!(runner.programs().contains(&"cargo".to_string()));
    // The Go build still ran after the cargo failure.
    assert!(runner.log.borrow().iter().any(|inv| inv.args.iter().any(|a| a == "./main.go")));
  }

  #[test]
  fn garble_install_failure_is_soft() {
    let root = project_root();
    let runner = FakeRunner::new(|inv| {
      if inv.args.first().map(String::as_str) == Some("install") {
        Ok(fail_exit("proxy timeout"))
      } else {
        Ok(ok_exit())
      }
    });

    Pipeline::with_lookup(root.path(), all_present)
      .run(&runner, &dev_config(&root))
      .unwrap();
  }

  #[test]
  fn tidy_failure_is_hard() {
    let root = project_root();
    let runner = FakeRunner::new(|inv| {
      if inv.args == ["mod", "tidy"] {
        Ok(fail_exit("missing go.sum entry"))
      } else {
        Ok(ok_exit())
      }
    });

    let err = Pipeline::with_lookup(root.path(), all_present)
      .run(&runner, &dev_config(&root))
      .unwrap_err();
    assert!(matches!(err, BuildError::Prepare { .. }));
  }

  #[test]
  fn skip_native_leaves_cargo_untouched_even_when_checkout_exists() {
    let root = project_root();
    let captcha = root.path().join("captcha").join("biliTicker");
    std::fs::create_dir_all(&captcha).unwrap();
    std::fs::write(captcha.join("Cargo.toml"), "[package]").unwrap();

    let runner = FakeRunner::new(|_| Ok(ok_exit()));
    let config = BuildConfig {
      skip_native: true,
      ..dev_config(&root)
    };

    Pipeline::with_lookup(root.path(), all_present).run(&runner, &config).unwrap();
    assert!(!runner.programs().contains(&"cargo".to_string()));
  }

  #[test]
  fn cross_mode_attempts_every_matrix_cell() {
    let root = project_root();
    let runner = FakeRunner::new(|_| Ok(ok_exit()));
    let config = BuildConfig {
      mode: BuildMode::Cross,
      ..dev_config(&root)
    };

    Pipeline::with_lookup(root.path(), all_present).run(&runner, &config).unwrap();

    let goos_cells = runner
      .log
      .borrow()
      .iter()
      .filter(|inv| inv.env.contains_key("GOOS"))
      .count();
    assert_eq!(goos_cells, 6);
  }

  #[test]
  fn clean_flag_wipes_output_before_building() {
    let root = project_root();
    let output = root.path().join("dist");
    std::fs::create_dir_all(output.join("stale")).unwrap();

    let runner = FakeRunner::new(|_| Ok(ok_exit()));
    let config = BuildConfig {
      clean: true,
      ..dev_config(&root)
    };

    Pipeline::with_lookup(root.path(), all_present).run(&runner, &config).unwrap();
    assert!(!output.join("stale").exists());
  }
}
