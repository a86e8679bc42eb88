//! Package directory walk.

use std::fs;
use std::path::{Path, PathBuf};

use super::GenerateError;

/// Every directory under `root`, in visit order: a directory comes before
/// its subdirectories, and subdirectories are visited in name order.
///
/// Hidden directories (`.git`, `.cache`) and symlinks are not entered.
pub fn walk_dirs(root: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let mut dirs = Vec::new();
    walk(root, &mut dirs)?;
    Ok(dirs)
}

fn walk(dir: &Path, dirs: &mut Vec<PathBuf>) -> Result<(), GenerateError> {
    let entries = fs::read_dir(dir).map_err(GenerateError::io(dir))?;
    dirs.push(dir.to_path_buf());

    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(GenerateError::io(dir))?;
        let file_type = entry.file_type().map_err(GenerateError::io(dir))?;
        if !file_type.is_dir() {
            continue;
        }
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            tracing::debug!(dir = %path.display(), "skipping hidden directory");
            continue;
        }
        subdirs.push(path);
    }
    subdirs.sort();

    for subdir in subdirs {
        walk(&subdir, dirs)?;
    }
    Ok(())
}
