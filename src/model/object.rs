use std::{fmt, path::PathBuf};

use aws_sdk_s3::types::{
    BucketVersioningStatus, ObjectCannedAcl, ServerSideEncryption, StorageClass,
};

#[derive(Debug)]
pub struct WalkError {
    pub message: String,
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for WalkError {}

#[derive(Clone, Debug)]
pub struct CreatedBucket {
    pub name: String,
    pub region: String,
    /// `Location` header returned by the service, if any.
    pub location: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct UploadOptions {
    pub acl: Option<ObjectCannedAcl>,
    pub server_side_encryption: Option<ServerSideEncryption>,
    pub storage_class: Option<StorageClass>,
}

impl UploadOptions {
    pub fn public_read() -> Self {
        Self {
            acl: Some(ObjectCannedAcl::PublicRead),
            ..Default::default()
        }
    }

    pub fn encrypted_infrequent_access() -> Self {
        Self {
            server_side_encryption: Some(ServerSideEncryption::Aes256),
            storage_class: Some(StorageClass::StandardIa),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PutOutcome {
    pub version_id: Option<String>,
    pub e_tag: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectVersion {
    pub key: String,
    pub version_id: Option<String>,
    pub is_latest: bool,
    pub is_delete_marker: bool,
}

impl ObjectVersion {
    pub fn identity(&self) -> ObjectIdentity {
        ObjectIdentity {
            key: self.key.clone(),
            version_id: self.version_id.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectIdentity {
    pub key: String,
    pub version_id: Option<String>,
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version_id {
            Some(version_id) => write!(f, "{}@{}", self.key, version_id),
            None => write!(f, "{}", self.key),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grant {
    pub grantee: String,
    pub permission: String,
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.grantee, self.permission)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ObjectAttributes {
    pub version_id: Option<String>,
    pub content_length: i64,
    pub server_side_encryption: Option<ServerSideEncryption>,
    /// `None` means STANDARD, S3 omits the header for that class.
    pub storage_class: Option<StorageClass>,
}

#[derive(Clone, Debug, Default)]
pub struct WalkReport {
    pub first_bucket: String,
    pub second_bucket: String,
    pub region: String,
    pub versioning_status: Option<BucketVersioningStatus>,
    pub temp_files: Vec<String>,
    pub first_object_versions: Vec<String>,
    pub download_path: PathBuf,
    pub public_grants: Vec<Grant>,
    pub private_grants: Vec<Grant>,
    pub server_side_encryption: Option<ServerSideEncryption>,
    pub storage_class: Option<StorageClass>,
    pub deleted_versions: Vec<ObjectIdentity>,
}

pub fn format_list<T: fmt::Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(|item| item.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
