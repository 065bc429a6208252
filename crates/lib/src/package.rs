//! Distribution packaging.
//!
//! Bundles a compiled binary with its runtime shared libraries into a zip
//! archive. The archive is the sole durable distribution artifact; the
//! caller removes the loose binary after a successful package.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::consts::SHARED_LIB_EXTENSIONS;
use crate::error::BuildError;

pub struct ArtifactPackager;

impl ArtifactPackager {
  /// Create a zip archive containing `binary` and, when `deps_dir` is
  /// given and exists, every regular shared-library file directly inside
  /// it (no subdirectory traversal).
  ///
  /// `archive_dir` defaults to the binary's own directory and
  /// `archive_name` to the binary's base name with a `.zip` extension.
  /// Returns the archive path.
  pub fn package(
    &self,
    binary: &Path,
    deps_dir: Option<&Path>,
    archive_dir: Option<&Path>,
    archive_name: Option<&str>,
  ) -> Result<PathBuf, BuildError> {
    let dir = archive_dir
      .map(Path::to_path_buf)
      .or_else(|| binary.parent().map(Path::to_path_buf))
      .unwrap_or_else(|| PathBuf::from("."));

    let name = match archive_name {
      Some(name) => name.to_string(),
      None => {
        let stem = binary.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "archive".to_string());
        format!("{}.zip", stem)
      }
    };

    fs::create_dir_all(&dir)?;
    let archive_path = dir.join(name);

    info!("packaging {} into {}", binary.display(), archive_path.display());

    let file = File::create(&archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    // The binary is always the first entry.
    let binary_entry = binary.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "binary".to_string());
    zip.start_file(binary_entry, options)?;
    io::copy(&mut File::open(binary)?, &mut zip)?;

    for dep in shared_libraries(deps_dir)? {
      let entry = dep.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
      debug!("bundling shared library {}", entry);
      zip.start_file(entry, options)?;
      io::copy(&mut File::open(&dep)?, &mut zip)?;
    }

    zip.finish()?;

    info!("created archive {}", archive_path.display());
    Ok(archive_path)
  }
}

/// Regular allow-listed library files directly inside `deps_dir`, sorted
/// by name. A missing or unsupplied directory yields an empty list.
fn shared_libraries(deps_dir: Option<&Path>) -> Result<Vec<PathBuf>, BuildError> {
  let Some(dir) = deps_dir.filter(|d| d.exists()) else {
    return Ok(Vec::new());
  };

  let mut libs = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    if !entry.file_type()?.is_file() {
      continue;
    }
    let path = entry.path();
    let allowed = path
      .extension()
      .and_then(|e| e.to_str())
      .is_some_and(|ext| SHARED_LIB_EXTENSIONS.contains(&ext));
    if allowed {
      libs.push(path);
    }
  }
  libs.sort();
  Ok(libs)
}
