//! btgbuild-lib: Build pipeline components for bilibili-ticket-go
//!
//! This crate provides the pieces the `btgbuild` CLI sequences into a
//! full build of the project:
//! - `tools`: required-toolchain verification (git, go, cargo, rustc)
//! - `sync`: git submodule initialization and update
//! - `native`: the Rust captcha component build
//! - `prepare`: Go module tidy and optional garble install
//! - `gobuild` / `matrix`: single-target and cross-platform Go builds
//! - `package`: zip packaging of a binary with its shared libraries
//! - `pipeline`: the stage table that ties everything together

pub mod clean;
pub mod consts;
pub mod error;
pub mod gobuild;
pub mod matrix;
pub mod native;
pub mod package;
pub mod pipeline;
pub mod platform;
pub mod prepare;
pub mod process;
pub mod sync;
pub mod tools;
pub mod version;

pub use error::BuildError;
pub use gobuild::{ApplicationBuilder, BuildMode};
pub use pipeline::{BuildConfig, Pipeline};
pub use platform::{Arch, Os, PlatformTarget};
pub use process::{CommandRunner, SystemRunner};
pub use version::BuildMeta;
