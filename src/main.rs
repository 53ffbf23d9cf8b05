mod batch;
mod cli;
mod cloudinary;
mod config;
mod error;
mod options;
mod scanner;
mod uploader;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;

fn main() -> Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));
    if let Err(e) = dotenv::dotenv() {
        log::debug!("no .env loaded: {}", e);
    }

    let args = cli::Args::parse();
    run(&args, |key| std::env::var(key).ok(), &mut std::io::stdout())
}

/// Validate arguments and credentials, then run the batch and report to `out`.
fn run<F>(args: &cli::Args, lookup: F, out: &mut dyn Write) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let input = args
        .directory
        .clone()
        .ok_or(error::UploadError::MissingArgument)?;
    let options = args.upload_options();

    // Credentials are checked before the directory is touched.
    let config = config::CloudinaryConfig::from_lookup(lookup)?;
    log::debug!("using {:?}", config);
    let client = cloudinary::CloudinaryClient::new(config)?;

    writeln!(out, "Uploading images to Cloudinary")?;
    writeln!(out, "  Source:      {}", input.display())?;
    writeln!(out, "  Folder:      {}", options.folder())?;
    writeln!(out, "  Overwrite:   {}", if options.overwrite() { "yes" } else { "no" })?;
    writeln!(out, "  Cloud name:  {}", client.cloud_name())?;
    writeln!(out, "  Extensions:  {}", options.extensions().join(", "))?;
    writeln!(out)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Uploading {pos}/{len} {wide_bar} {msg}")?
            .progress_chars("=> "),
    );

    let report = batch::run_batch(&input, &options, &client, &pb, out)?;

    if report.files.is_empty() {
        writeln!(out, "No image files found in {}.", input.display())?;
        return Ok(());
    }

    if options.dry_run() {
        writeln!(out, "[dry-run] No files were uploaded.")?;
        return Ok(());
    }

    writeln!(out, "{}", report)?;
    writeln!(out, "Done.")?;
    Ok(())
}
