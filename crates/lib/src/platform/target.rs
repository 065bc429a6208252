//! Target platform pairs and the fixed cross-compilation matrix.

use std::fmt;

use serde::Serialize;

use super::{Arch, Os};
use crate::consts::PROJECT_NAME;

/// A (GOOS, GOARCH) pair the application is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformTarget {
  pub os: Os,
  pub arch: Arch,
}

/// The fixed matrix attempted by `--mode cross`, in build order.
pub const CROSS_MATRIX: [PlatformTarget; 6] = [
  PlatformTarget { os: Os::Linux, arch: Arch::Amd64 },
  PlatformTarget { os: Os::Linux, arch: Arch::Arm64 },
  PlatformTarget { os: Os::Windows, arch: Arch::Amd64 },
  PlatformTarget { os: Os::Windows, arch: Arch::Arm64 },
  PlatformTarget { os: Os::MacOs, arch: Arch::Amd64 },
  PlatformTarget { os: Os::MacOs, arch: Arch::Arm64 },
];

impl PlatformTarget {
  pub fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Detect the build host's platform
  ///
  /// Returns `None` when the host OS or architecture is unsupported.
  pub fn host() -> Option<Self> {
    Some(Self {
      os: Os::current()?,
      arch: Arch::current()?,
    })
  }

  /// Parse a platform triple such as `x86_64-unknown-linux-gnu` or
  /// `aarch64-apple-darwin`.
  ///
  /// The first component is looked up as the architecture; the remaining
  /// components are scanned against the OS table. Returns `None` when
  /// either lookup fails.
  pub fn parse_triple(triple: &str) -> Option<Self> {
    const ARCHES: &[(&str, Arch)] = &[
      ("x86_64", Arch::Amd64),
      ("amd64", Arch::Amd64),
      ("aarch64", Arch::Arm64),
      ("arm64", Arch::Arm64),
    ];
    const SYSTEMS: &[(&str, Os)] = &[
      ("linux", Os::Linux),
      ("windows", Os::Windows),
      ("darwin", Os::MacOs),
      ("macos", Os::MacOs),
    ];

    let mut components = triple.split('-');
    let first = components.next()?;
    let arch = ARCHES.iter().find(|(name, _)| *name == first).map(|(_, a)| *a)?;
    let os = components.find_map(|c| SYSTEMS.iter().find(|(name, _)| *name == c).map(|(_, o)| *o))?;

    Some(Self { os, arch })
  }

  /// Per-platform subdirectory name used by matrix builds (`linux_amd64`)
  pub fn dir_name(&self) -> String {
    format!("{}_{}", self.os, self.arch)
  }

  /// Binary file name for this target, with `.exe` on Windows
  pub fn binary_name(&self) -> String {
    format!("{}{}", PROJECT_NAME, self.os.exe_suffix())
  }

  /// Distribution archive name (`bilibili-ticket-go_linux_amd64.zip`)
  pub fn archive_name(&self) -> String {
    format!("{}_{}_{}.zip", PROJECT_NAME, self.os, self.arch)
  }
}

impl fmt::Display for PlatformTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.os, self.arch)
  }
}
