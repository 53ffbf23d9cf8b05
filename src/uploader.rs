use crate::error::Result;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Image,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file to send. There is deliberately no folder field: the folder is
/// already part of `public_id`.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub public_id: String,
    pub overwrite: bool,
    pub resource_type: ResourceType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub public_id: String,
    pub secure_url: String,
}

/// Something that can store a local file under a remote identifier.
/// Each call blocks until the remote side has answered.
pub trait AssetUploader {
    fn upload(&self, request: &UploadRequest) -> Result<UploadedAsset>;
}
