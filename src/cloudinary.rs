use crate::config::{CloudinaryConfig, SignatureAlgorithm};
use crate::error::{Result, UploadError};
use crate::uploader::{AssetUploader, UploadRequest, UploadedAsset};
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use sha2::Sha256;

/// Blocking client for Cloudinary's signed upload endpoint.
pub struct CloudinaryClient {
    client: Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    #[serde(default)]
    existing: bool,
    version: Option<u64>,
    format: Option<String>,
    bytes: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn cloud_name(&self) -> &str {
        &self.config.cloud_name
    }

    fn upload_url(&self, request: &UploadRequest) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.config.upload_prefix, self.config.cloud_name, request.resource_type
        )
    }

    /// Parameters covered by the signature, sorted by name.
    fn signed_params(request: &UploadRequest, timestamp: i64) -> Vec<(&'static str, String)> {
        vec![
            ("overwrite", request.overwrite.to_string()),
            ("public_id", request.public_id.clone()),
            ("timestamp", timestamp.to_string()),
            ("unique_filename", "false".to_string()),
            ("use_filename", "false".to_string()),
        ]
    }
}

/// Cloudinary request signature: `k=v` pairs joined by `&` in name order,
/// followed by the API secret, hex digest.
pub fn sign_params(
    params: &[(&str, String)],
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    to_sign.push_str(api_secret);

    match algorithm {
        SignatureAlgorithm::Sha1 => format!("{:x}", Sha1::digest(to_sign.as_bytes())),
        SignatureAlgorithm::Sha256 => format!("{:x}", Sha256::digest(to_sign.as_bytes())),
    }
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return parsed.error.message;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

impl AssetUploader for CloudinaryClient {
    fn upload(&self, request: &UploadRequest) -> Result<UploadedAsset> {
        let timestamp = chrono::Utc::now().timestamp();
        let params = Self::signed_params(request, timestamp);
        let signature = sign_params(
            &params,
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let mut form = multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }
        let form = form.file("file", &request.path)?;

        let url = self.upload_url(request);
        log::debug!("POST {} public_id={}", url, request.public_id);

        let res = self.client.post(&url).multipart(form).send()?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(UploadError::Remote {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let body: UploadResponse = res.json()?;
        log::debug!(
            "uploaded {} (version {:?}, format {:?}, {:?} bytes)",
            body.public_id,
            body.version,
            body.format,
            body.bytes
        );
        if body.existing && !request.overwrite {
            return Err(UploadError::AlreadyExists(body.public_id));
        }

        Ok(UploadedAsset {
            public_id: body.public_id,
            secure_url: body.secure_url,
        })
    }
}
