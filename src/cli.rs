use crate::options::{UploadOptions, DEFAULT_FOLDER};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cloudinary-batch-upload", version)]
#[command(about = "Upload every image in a directory to Cloudinary")]
#[command(after_help = "\
Environment:
  CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY, CLOUDINARY_API_SECRET
  (or CLOUDINARY_URL=cloudinary://<key>:<secret>@<cloud_name>)

Each file's name without extension becomes its public ID under the
destination folder, e.g. pho-bo.jpg -> foods/pho-bo.")]
pub struct Args {
    /// Directory containing the images to upload (not searched recursively)
    pub directory: Option<PathBuf>,

    /// Destination folder on Cloudinary, used as the public ID prefix
    #[arg(long, default_value = DEFAULT_FOLDER)]
    pub folder: String,

    /// Replace assets that already exist under the same public ID
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// List the files and public IDs without uploading anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl Args {
    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions::new(&self.folder, self.overwrite, self.dry_run)
    }
}
