//! Writes generated test files under the output directory.
//!
//! Files are rewritten in full on every run; parent directories are created
//! as needed.

use std::path::{Component, Path, PathBuf};

use prototest_codegen::GeneratedFile;

/// Write every file under `output_dir`, returning the paths written in order.
///
/// # Errors
///
/// Returns error if a path escapes `output_dir` or a file cannot be written.
pub fn write_files(output_dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = resolve(output_dir, &file.path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &file.contents)?;
        tracing::debug!(path = %path.display(), bytes = file.contents.len(), "wrote test file");
        written.push(path);
    }
    Ok(written)
}

/// `output_dir` joined with a relative file path that stays inside it.
fn resolve(output_dir: &Path, relative: &str) -> Result<PathBuf, std::io::Error> {
    let rel = Path::new(relative);
    let escapes = rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("generated path `{relative}` must be relative to the output directory"),
        ));
    }
    Ok(output_dir.join(rel))
}
