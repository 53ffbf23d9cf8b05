use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no directory path supplied (usage: cloudinary-batch-upload <DIRECTORY> [OPTIONS], see --help)")]
    MissingArgument,

    /// Any of cloud name, API key or API secret is unset. The cloud name is
    /// required as well because it is part of the upload endpoint.
    #[error("Cloudinary credentials are not configured, set {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("invalid CLOUDINARY_URL: {0}")]
    InvalidCredentialUrl(String),

    #[error("unsupported signature algorithm: {0} (expected sha1 or sha256)")]
    InvalidSignatureAlgorithm(String),

    #[error("directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Remote { status: u16, message: String },

    #[error("asset {0} already exists, pass --overwrite to replace it")]
    AlreadyExists(String),
}

pub type Result<T> = std::result::Result<T, UploadError>;
