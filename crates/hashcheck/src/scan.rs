use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};

/// List the files of `dir` to check, sorted by file name.
///
/// Only direct children are considered. Symlinks are followed when their
/// target is a regular file inside `dir`; links that resolve elsewhere are
/// skipped. An empty `extensions` list accepts every file.
pub fn candidates(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(dir).with_context(|| format!("cannot access {}", dir.display()))?;
    ensure!(meta.is_dir(), "{} is not a directory", dir.display());
    let root = dir
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        let is_file = if file_type.is_symlink() {
            resolve_link(&path, &root)
        } else {
            file_type.is_file()
        };
        if is_file && has_extension(&path, extensions) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!(dir = %dir.display(), files = files.len(), "directory scanned");
    Ok(files)
}

/// Whether the link at `path` points at a regular file under `root`.
fn resolve_link(path: &Path, root: &Path) -> bool {
    match path.canonicalize() {
        Ok(target) if !target.starts_with(root) => {
            tracing::warn!(link = %path.display(), target = %target.display(), "symlink leaves directory; skipped");
            false
        }
        Ok(target) => target.is_file(),
        Err(e) => {
            tracing::warn!(link = %path.display(), error = %e, "dangling symlink; skipped");
            false
        }
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}
