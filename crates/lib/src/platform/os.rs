use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Operating systems the Go toolchain is asked to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  Windows,
  #[serde(rename = "darwin")]
  MacOs,
}

impl Os {
  /// Detect the operating system of the build host at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "windows" => Some(Self::Windows),
      "macos" => Some(Self::MacOs),
      _ => None,
    }
  }

  /// Returns the GOOS identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::Windows => "windows",
      Self::MacOs => "darwin",
    }
  }

  /// Suffix appended to binaries built for this OS
  pub fn exe_suffix(&self) -> &'static str {
    match self {
      Self::Windows => ".exe",
      _ => "",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "linux" => Ok(Self::Linux),
      "windows" => Ok(Self::Windows),
      "darwin" | "macos" => Ok(Self::MacOs),
      other => Err(format!("unknown os: {} (expected linux, windows or darwin)", other)),
    }
  }
}
