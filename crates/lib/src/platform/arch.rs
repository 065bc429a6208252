use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// CPU architectures the Go toolchain is asked to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  Amd64,
  Arm64,
}

impl Arch {
  /// Detect the CPU architecture of the build host at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::Amd64),
      "aarch64" => Some(Self::Arm64),
      _ => None,
    }
  }

  /// Returns the GOARCH identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Amd64 => "amd64",
      Self::Arm64 => "arm64",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "amd64" | "x86_64" => Ok(Self::Amd64),
      "arm64" | "aarch64" => Ok(Self::Arm64),
      other => Err(format!("unknown arch: {} (expected amd64 or arm64)", other)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn go_identifiers() {
    assert_eq!(Arch::Amd64.as_str(), "amd64");
    assert_eq!(Arch::Arm64.as_str(), "arm64");
  }

  #[test]
  fn rust_names_parse_to_go_names() {
    assert_eq!("x86_64".parse::<Arch>().unwrap(), Arch::Amd64);
    assert_eq!("aarch64".parse::<Arch>().unwrap(), Arch::Arm64);
  }

  #[test]
  fn unknown_arch_is_rejected() {
    assert!("riscv64".parse::<Arch>().is_err());
  }
}
