use crate::application::models::upload::{CandidateFile, ImageKind};
use crate::error::AppError;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Walks `root` recursively and returns every image file, sorted by path.
///
/// Holds no state: each call walks the tree from scratch.
pub fn scan(root: &Path) -> Result<Vec<CandidateFile>, AppError> {
    if !root.is_dir() {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("image directory {} does not exist", root.display()),
        )));
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        // symlinked files count, symlinked directories are not descended into
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        let Some(kind) = entry.file_name().to_str().and_then(ImageKind::from_file_name) else {
            continue;
        };
        match normalize(entry.path()).to_str() {
            Some(path) => images.push(CandidateFile::new(path, kind)),
            None => warn!("Skipping non UTF-8 path {}", entry.path().display()),
        }
    }

    images.sort();
    debug!("Found {} images under {}", images.len(), root.display());
    Ok(images)
}

/// Lexically removes `.` segments and resolves `..` where possible.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
