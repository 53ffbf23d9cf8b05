use crate::error::{Result, UploadError};
use reqwest::Url;
use std::fmt;

pub const CLOUD_NAME_VAR: &str = "CLOUDINARY_CLOUD_NAME";
pub const API_KEY_VAR: &str = "CLOUDINARY_API_KEY";
pub const API_SECRET_VAR: &str = "CLOUDINARY_API_SECRET";
pub const CLOUDINARY_URL_VAR: &str = "CLOUDINARY_URL";
pub const UPLOAD_PREFIX_VAR: &str = "CLOUDINARY_UPLOAD_PREFIX";
pub const SIGNATURE_ALGORITHM_VAR: &str = "CLOUDINARY_SIGNATURE_ALGORITHM";

pub const DEFAULT_UPLOAD_PREFIX: &str = "https://api.cloudinary.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            _ => Err(UploadError::InvalidSignatureAlgorithm(value.to_string())),
        }
    }
}

/// Account settings needed to sign and send uploads.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_prefix: String,
    pub signature_algorithm: SignatureAlgorithm,
}

// Keep the secret out of debug logs.
impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("upload_prefix", &self.upload_prefix)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

impl CloudinaryConfig {
    /// Read the configuration through `lookup`. Individual variables win
    /// over the matching part of `CLOUDINARY_URL`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let from_url = match get(CLOUDINARY_URL_VAR) {
            Some(raw) => Some(parse_cloudinary_url(&raw)?),
            None => None,
        };
        let (url_cloud, url_key, url_secret) = match from_url {
            Some((cloud, key, secret)) => (cloud, key, secret),
            None => (None, None, None),
        };

        let cloud_name = get(CLOUD_NAME_VAR).or(url_cloud);
        let api_key = get(API_KEY_VAR).or(url_key);
        let api_secret = get(API_SECRET_VAR).or(url_secret);

        let mut missing = Vec::new();
        if cloud_name.is_none() {
            missing.push(CLOUD_NAME_VAR);
        }
        if api_key.is_none() {
            missing.push(API_KEY_VAR);
        }
        if api_secret.is_none() {
            missing.push(API_SECRET_VAR);
        }

        let (Some(cloud_name), Some(api_key), Some(api_secret)) = (cloud_name, api_key, api_secret)
        else {
            return Err(UploadError::MissingCredentials { missing });
        };

        let upload_prefix = get(UPLOAD_PREFIX_VAR)
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_UPLOAD_PREFIX.to_string());

        let signature_algorithm = match get(SIGNATURE_ALGORITHM_VAR) {
            Some(value) => SignatureAlgorithm::parse(&value)?,
            None => SignatureAlgorithm::default(),
        };

        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
            upload_prefix,
            signature_algorithm,
        })
    }
}

type UrlParts = (Option<String>, Option<String>, Option<String>);

/// Split `cloudinary://<api_key>:<api_secret>@<cloud_name>`.
fn parse_cloudinary_url(raw: &str) -> Result<UrlParts> {
    let url = Url::parse(raw.trim())
        .map_err(|e| UploadError::InvalidCredentialUrl(e.to_string()))?;
    if url.scheme() != "cloudinary" {
        return Err(UploadError::InvalidCredentialUrl(format!(
            "expected cloudinary:// scheme, got {}://",
            url.scheme()
        )));
    }

    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    let cloud = url.host_str().and_then(non_empty);
    let key = non_empty(url.username());
    let secret = url.password().and_then(non_empty);
    Ok((cloud, key, secret))
}
