//! btgbuild: build orchestrator for bilibili-ticket-go.
//!
//! Sequences dependency verification, submodule sync, the Rust captcha
//! build, Go environment preparation and the application build; `package`
//! is the separate distribution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use btgbuild_lib::BuildMode;

mod cmd;
mod output;

#[derive(Parser)]
#[command(name = "btgbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ModeArg {
  #[default]
  Dev,
  Release,
  Cross,
}

impl From<ModeArg> for BuildMode {
  fn from(mode: ModeArg) -> Self {
    match mode {
      ModeArg::Dev => BuildMode::Dev,
      ModeArg::Release => BuildMode::Release,
      ModeArg::Cross => BuildMode::Cross,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Run the build pipeline
  Build {
    /// Build mode
    #[arg(long, value_enum, default_value = "dev")]
    mode: ModeArg,

    /// Output directory for built binaries
    #[arg(long, default_value = "./dist")]
    output: PathBuf,

    /// Clean build artifacts before building
    #[arg(long)]
    clean: bool,

    /// Only check dependencies and exit
    #[arg(long)]
    check_deps: bool,

    /// Skip building the Rust captcha component
    #[arg(long = "skip-captcha", alias = "skip-native")]
    skip_captcha: bool,
  },

  /// Build one release binary and bundle it into a distribution archive
  Package {
    /// Target platform triple (e.g. x86_64-unknown-linux-gnu)
    #[arg(long, conflicts_with_all = ["os", "arch"])]
    target: Option<String>,

    /// Target operating system (linux, windows, darwin)
    #[arg(long, requires = "arch")]
    os: Option<String>,

    /// Target architecture (amd64, arm64)
    #[arg(long, requires = "os")]
    arch: Option<String>,

    /// Output directory for the archive
    #[arg(long, default_value = "./output")]
    output: PathBuf,

    /// Directory of runtime shared libraries to bundle
    #[arg(long)]
    deps: Option<PathBuf>,

    /// Override the embedded commit hash
    #[arg(long)]
    commit: Option<String>,

    /// Override the embedded build timestamp (UTC Unix seconds)
    #[arg(long)]
    buildtime: Option<i64>,
  },

  /// Remove build output and toolchain caches
  Clean {
    /// Output directory to remove
    #[arg(long, default_value = "./dist")]
    output: PathBuf,
  },

  /// Report the status of required build tools
  Deps {
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_directive = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
    .without_time()
    .with_writer(std::io::stderr)
    .init();
  debug!(verbose = cli.verbose, "logging initialized");

  let result = match cli.command {
    Commands::Build {
      mode,
      output,
      clean,
      check_deps,
      skip_captcha,
    } => cmd::cmd_build(mode.into(), output, clean, check_deps, skip_captcha, cli.verbose),
    Commands::Package {
      target,
      os,
      arch,
      output,
      deps,
      commit,
      buildtime,
    } => cmd::cmd_package(target, os, arch, output, deps, commit, buildtime),
    Commands::Clean { output } => cmd::cmd_clean(output),
    Commands::Deps { json } => cmd::cmd_deps(json),
  };

  if let Err(err) = result {
    output::print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
