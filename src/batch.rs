use crate::error::Result;
use crate::options::UploadOptions;
use crate::scanner::{self, FileEntry};
use crate::uploader::{AssetUploader, ResourceType, UploadRequest};
use indicatif::ProgressBar;
use std::fmt;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Success {
        file_name: String,
        public_id: String,
        secure_url: String,
    },
    Failure {
        file_name: String,
        message: String,
    },
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadResult::Success { .. })
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files found by the scan, in upload order.
    pub files: Vec<FileEntry>,
    pub results: Vec<UploadResult>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Attempted: {}", self.attempted())?;
        writeln!(f, "Succeeded: {}", self.succeeded())?;
        writeln!(f, "Failed:    {}", self.failed())?;

        if self.succeeded() > 0 {
            writeln!(f, "\nUploaded:")?;
            for result in &self.results {
                if let UploadResult::Success {
                    file_name,
                    public_id,
                    secure_url,
                } = result
                {
                    writeln!(f, "  - {}", file_name)?;
                    writeln!(f, "    Public ID: {}", public_id)?;
                    writeln!(f, "    URL: {}", secure_url)?;
                }
            }
        }

        if self.failed() > 0 {
            writeln!(f, "\nFailed:")?;
            for result in &self.results {
                if let UploadResult::Failure { file_name, message } = result {
                    writeln!(f, "  - {}", file_name)?;
                    writeln!(f, "    Error: {}", message)?;
                }
            }
        }

        write!(f, "{}", rule)
    }
}

/// Upload a single file. Errors are folded into `UploadResult::Failure`.
pub fn upload_file(
    entry: &FileEntry,
    options: &UploadOptions,
    uploader: &dyn AssetUploader,
) -> UploadResult {
    let request = UploadRequest {
        path: entry.path.clone(),
        public_id: options.public_id_for(entry),
        overwrite: options.overwrite(),
        resource_type: ResourceType::Image,
    };

    match uploader.upload(&request) {
        Ok(asset) => UploadResult::Success {
            file_name: entry.file_name.clone(),
            public_id: asset.public_id,
            secure_url: asset.secure_url,
        },
        Err(e) => {
            log::debug!("upload of {} failed: {}", entry.path.display(), e);
            UploadResult::Failure {
                file_name: entry.file_name.clone(),
                message: e.to_string(),
            }
        }
    }
}

/// Scan `input_dir` and upload every match in scan order, one at a time.
///
/// Only scan and output errors are returned; per-file failures end up in the
/// report. Progress lines go to `out`, with the bar suspended while writing.
/// With `dry_run` set the files are listed but nothing is sent.
pub fn run_batch(
    input_dir: &Path,
    options: &UploadOptions,
    uploader: &dyn AssetUploader,
    pb: &ProgressBar,
    out: &mut dyn Write,
) -> Result<BatchReport> {
    let files = scanner::scan_files(input_dir, options)?;
    let mut report = BatchReport {
        files,
        results: Vec::new(),
    };
    if report.files.is_empty() {
        return Ok(report);
    }

    writeln!(out, "Found {} image file(s):", report.files.len())?;
    for (i, file) in report.files.iter().enumerate() {
        writeln!(
            out,
            "  {}. {} -> {}",
            i + 1,
            file.file_name,
            options.public_id_for(file)
        )?;
    }
    writeln!(out)?;

    if options.dry_run() {
        return Ok(report);
    }

    let total = report.files.len();
    pb.set_length(total as u64);
    for (i, file) in report.files.iter().enumerate() {
        pb.set_message(file.file_name.clone());

        let result = upload_file(file, options, uploader);
        pb.suspend(|| -> std::io::Result<()> {
            let status = if result.is_success() { "ok" } else { "failed" };
            writeln!(out, "[{}/{}] {} ... {}", i + 1, total, file.file_name, status)?;
            if let UploadResult::Failure { message, .. } = &result {
                writeln!(out, "    Error: {}", message)?;
            }
            out.flush()
        })?;

        report.results.push(result);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::uploader::UploadedAsset;
    use std::cell::RefCell;
    use std::fs;

    /// Records every request and fails the ones whose call index is listed.
    struct RecordingUploader {
        calls: RefCell<Vec<UploadRequest>>,
        fail_on: Vec<usize>,
    }

    impl RecordingUploader {
        fn new(fail_on: Vec<usize>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on,
            }
        }

        fn public_ids(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|r| r.public_id.clone()).collect()
        }
    }

    impl AssetUploader for RecordingUploader {
        fn upload(&self, request: &UploadRequest) -> Result<UploadedAsset> {
            let index = {
                let mut calls = self.calls.borrow_mut();
                calls.push(request.clone());
                calls.len() - 1
            };
            if self.fail_on.contains(&index) {
                return Err(UploadError::Remote {
                    status: 420,
                    message: "Rate limit exceeded".to_string(),
                });
            }
            Ok(UploadedAsset {
                public_id: request.public_id.clone(),
                secure_url: format!("https://cdn.test/{}.jpg", request.public_id),
            })
        }
    }

    fn run(
        dir: &Path,
        options: &UploadOptions,
        uploader: &RecordingUploader,
    ) -> (BatchReport, String) {
        let mut out: Vec<u8> = Vec::new();
        let report = run_batch(dir, options, uploader, &ProgressBar::hidden(), &mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    fn setup_dir(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"img").unwrap();
        }
        dir
    }

    #[test]
    fn test_uploads_only_matching_files_in_order() {
        let dir = setup_dir(&["c.webp", "a.jpg", "notes.txt", "b.PNG", "data.csv"]);
        let uploader = RecordingUploader::new(vec![]);

        let (report, _) = run(dir.path(), &UploadOptions::default(), &uploader);

        assert_eq!(uploader.public_ids(), vec!["foods/a", "foods/b", "foods/c"]);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let dir = setup_dir(&["1.jpg", "2.jpg", "3.jpg"]);
        let uploader = RecordingUploader::new(vec![1]);

        let (report, _) = run(dir.path(), &UploadOptions::default(), &uploader);

        assert_eq!(uploader.calls.borrow().len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.results[1],
            UploadResult::Failure {
                file_name: "2.jpg".to_string(),
                message: "Rate limit exceeded (HTTP 420)".to_string(),
            }
        );
        assert!(report.results[2].is_success());
    }

    #[test]
    fn test_request_fields() {
        let dir = setup_dir(&["pho-bo.jpg"]);
        let uploader = RecordingUploader::new(vec![]);
        let options = UploadOptions::new("menu", true, false);

        run(dir.path(), &options, &uploader);

        let calls = uploader.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].public_id, "menu/pho-bo");
        assert!(calls[0].overwrite);
        assert_eq!(calls[0].resource_type, ResourceType::Image);
        assert_eq!(calls[0].path, dir.path().join("pho-bo.jpg"));
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let dir = setup_dir(&["readme.md"]);
        let uploader = RecordingUploader::new(vec![]);

        let (report, _) = run(dir.path(), &UploadOptions::default(), &uploader);

        assert!(report.files.is_empty());
        assert_eq!(report.attempted(), 0);
        assert!(uploader.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_directory_makes_no_calls() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = RecordingUploader::new(vec![]);

        let err = run_batch(
            &dir.path().join("nope"),
            &UploadOptions::default(),
            &uploader,
            &ProgressBar::hidden(),
            &mut std::io::sink(),
        )
        .unwrap_err();

        assert!(matches!(err, UploadError::DirectoryNotFound(_)));
        assert!(uploader.calls.borrow().is_empty());
    }

    #[test]
    fn test_dry_run_sends_nothing() {
        let dir = setup_dir(&["a.jpg", "b.jpg"]);
        let uploader = RecordingUploader::new(vec![]);
        let options = UploadOptions::new("foods", false, true);

        let (report, output) = run(dir.path(), &options, &uploader);

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.attempted(), 0);
        assert!(uploader.calls.borrow().is_empty());
        assert!(output.contains("Found 2 image file(s):"));
        assert!(output.contains("  1. a.jpg -> foods/a\n"));
        assert!(output.contains("  2. b.jpg -> foods/b\n"));
        assert!(!output.contains("[1/2]"));
    }

    #[test]
    fn test_progress_lines_written_to_output() {
        let dir = setup_dir(&["a.jpg", "b.png"]);
        let uploader = RecordingUploader::new(vec![0]);

        let (_, output) = run(dir.path(), &UploadOptions::default(), &uploader);

        assert!(output.contains("  1. a.jpg -> foods/a\n"));
        assert!(output.contains("  2. b.png -> foods/b\n"));
        assert!(output.contains("[1/2] a.jpg ... failed\n    Error: Rate limit exceeded (HTTP 420)\n"));
        assert!(output.contains("[2/2] b.png ... ok\n"));
        let listing = output.find("2. b.png").unwrap();
        let first = output.find("[1/2]").unwrap();
        let second = output.find("[2/2]").unwrap();
        assert!(listing < first && first < second);
    }

    #[test]
    fn test_summary_lists_successes_and_failures() {
        let report = BatchReport {
            files: Vec::new(),
            results: vec![
                UploadResult::Success {
                    file_name: "pho-bo.jpg".to_string(),
                    public_id: "foods/pho-bo".to_string(),
                    secure_url: "https://cdn.test/foods/pho-bo.jpg".to_string(),
                },
                UploadResult::Failure {
                    file_name: "bun-cha.png".to_string(),
                    message: "Invalid image file".to_string(),
                },
            ],
        };

        let text = report.to_string();
        assert!(text.contains("Attempted: 2"));
        assert!(text.contains("Succeeded: 1"));
        assert!(text.contains("Failed:    1"));
        assert!(text.contains("Public ID: foods/pho-bo"));
        assert!(text.contains("URL: https://cdn.test/foods/pho-bo.jpg"));
        assert!(text.contains("  - bun-cha.png\n    Error: Invalid image file"));
    }
}
