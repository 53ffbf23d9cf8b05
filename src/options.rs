use crate::scanner::FileEntry;

pub const DEFAULT_FOLDER: &str = "foods";

/// File suffixes accepted by the scanner, lowercase and without the dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Settings for one batch. Built once from the command line.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    folder: String,
    overwrite: bool,
    dry_run: bool,
    extensions: &'static [&'static str],
}

impl UploadOptions {
    pub fn new(folder: &str, overwrite: bool, dry_run: bool) -> Self {
        Self {
            folder: folder.trim_matches('/').to_string(),
            overwrite,
            dry_run,
            extensions: IMAGE_EXTENSIONS,
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn extensions(&self) -> &[&str] {
        self.extensions
    }

    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }

    /// Remote identifier for a scanned file: `{folder}/{identifier}`.
    ///
    /// The folder lives only in this prefix. It must never also be sent
    /// as a separate upload parameter, or the service nests it twice.
    pub fn public_id_for(&self, entry: &FileEntry) -> String {
        if self.folder.is_empty() {
            entry.identifier.clone()
        } else {
            format!("{}/{}", self.folder, entry.identifier)
        }
    }
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self::new(DEFAULT_FOLDER, false, false)
    }
}
