use crate::error::{Result, UploadError};
use crate::options::UploadOptions;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub file_name: String,
    /// File name without its extension.
    pub identifier: String,
}

/// List the image files directly inside `input_dir`, sorted by file name.
/// Subdirectories are not descended into.
pub fn scan_files(input_dir: &Path, options: &UploadOptions) -> Result<Vec<FileEntry>> {
    if !input_dir.exists() {
        return Err(UploadError::DirectoryNotFound(input_dir.to_path_buf()));
    }
    if !input_dir.is_dir() {
        return Err(UploadError::NotADirectory(input_dir.to_path_buf()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {}", input_dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() {
            log::debug!("skipping non-file {}", path.display());
            continue;
        }

        let accepted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| options.accepts_extension(e));
        if !accepted {
            log::debug!("skipping {}: not an accepted image type", path.display());
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        let identifier = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        files.push(FileEntry {
            path: path.to_path_buf(),
            file_name,
            identifier,
        });
    }

    Ok(files)
}
