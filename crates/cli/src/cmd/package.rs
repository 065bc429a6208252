//! Implementation of the `btgbuild package` command.
//!
//! Builds one release binary for the requested (or host) platform, then
//! bundles it with its runtime shared libraries into
//! `{output}/bilibili-ticket-go_{os}_{arch}.zip`. The archive is the only
//! durable artifact; the loose binary is removed afterwards.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use btgbuild_lib::package::ArtifactPackager;
use btgbuild_lib::process::SystemRunner;
use btgbuild_lib::{ApplicationBuilder, BuildMeta, BuildMode, PlatformTarget};

use crate::output;

pub fn cmd_package(
  target: Option<String>,
  os: Option<String>,
  arch: Option<String>,
  output: PathBuf,
  deps: Option<PathBuf>,
  commit: Option<String>,
  buildtime: Option<i64>,
) -> Result<()> {
  let exec = SystemRunner;
  let root = std::env::current_dir().context("Could not determine the current directory")?;

  let target = resolve_target(target, os, arch)?;
  output::print_info(&format!("packaging for {}", target));

  let meta = BuildMeta::resolve(&exec, &root).with_overrides(commit, buildtime);

  let binary = ApplicationBuilder::new(&root, meta)
    .build(&exec, BuildMode::Release, &output, Some(target))
    .context("Build failed")?
    .context("release build produced no artifact")?;

  let archive = ArtifactPackager
    .package(&binary, deps.as_deref(), Some(&output), Some(&target.archive_name()))
    .context("Packaging failed")?;

  // The archive is authoritative from here on; a leftover loose binary is
  // only worth a warning.
  if let Err(err) = fs::remove_file(&binary) {
    output::print_warning(&format!("could not remove {}: {}", binary.display(), err));
  }

  output::print_success(&format!("Created {}", archive.display()));
  Ok(())
}

/// Resolve the target platform from a triple, an explicit --os/--arch
/// pair, or host auto-detection.
fn resolve_target(target: Option<String>, os: Option<String>, arch: Option<String>) -> Result<PlatformTarget> {
  if let Some(triple) = target {
    return PlatformTarget::parse_triple(&triple).with_context(|| format!("unrecognized target triple: {}", triple));
  }

  match (os, arch) {
    (Some(os), Some(arch)) => {
      let os = os.parse().map_err(|e: String| anyhow::anyhow!(e))?;
      let arch = arch.parse().map_err(|e: String| anyhow::anyhow!(e))?;
      Ok(PlatformTarget::new(os, arch))
    }
    (None, None) => match PlatformTarget::host() {
      Some(host) => Ok(host),
      None => bail!("could not detect the host platform; pass --target or --os/--arch"),
    },
    // clap's `requires` already rejects a partial pair; keep a guard for
    // programmatic callers.
    _ => bail!("--os and --arch must be given together"),
  }
}
