use std::{fs, path::Path};

use aws_sdk_s3::types::BucketVersioningStatus;
use tracing::info;
use uuid::Uuid;

use crate::{
    adapters::ObjectStore,
    model::object::{
        format_list, CreatedBucket, ObjectIdentity, PutOutcome, UploadOptions, WalkError,
    },
};

pub fn create_bucket_name(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4())
}

pub fn create_bucket(client: &dyn ObjectStore, prefix: &str) -> Result<CreatedBucket, WalkError> {
    let region = client.region()?;
    let bucket_name = create_bucket_name(prefix);

    let created = client.create_bucket(&bucket_name, &region)?;
    info!(
        bucket = %created.name,
        region = %created.region,
        location = created.location.as_deref().unwrap_or(""),
        "bucket created"
    );

    Ok(created)
}

pub fn enable_bucket_versioning(
    client: &dyn ObjectStore,
    bucket: &str,
) -> Result<Option<BucketVersioningStatus>, WalkError> {
    client.put_bucket_versioning(bucket, BucketVersioningStatus::Enabled)?;
    let status = client.get_bucket_versioning(bucket)?;

    info!(
        bucket = bucket,
        status = status.as_ref().map(|s| s.as_str()).unwrap_or("unset"),
        "bucket versioning"
    );

    Ok(status)
}

pub fn copy_to_bucket(
    client: &dyn ObjectStore,
    bucket_from: &str,
    bucket_to: &str,
    key: &str,
) -> Result<(), WalkError> {
    client.copy_object(bucket_from, bucket_to, key)?;
    info!(key = key, from = bucket_from, to = bucket_to, "object copied");

    Ok(())
}

/// Removes every version and delete marker so the bucket can be deleted.
pub fn delete_all_objects(
    client: &dyn ObjectStore,
    bucket: &str,
) -> Result<Vec<ObjectIdentity>, WalkError> {
    let versions = client.list_object_versions(bucket)?;
    let noncurrent = versions.iter().filter(|v| !v.is_latest).count();
    let delete_markers = versions.iter().filter(|v| v.is_delete_marker).count();
    info!(
        bucket = bucket,
        versions = versions.len(),
        noncurrent = noncurrent,
        delete_markers = delete_markers,
        "versions listed"
    );

    let identities: Vec<ObjectIdentity> = versions.iter().map(|v| v.identity()).collect();

    if identities.is_empty() {
        info!(bucket = bucket, "no versions to delete");
        return Ok(Vec::new());
    }

    let deleted = client.delete_objects(bucket, &identities)?;
    info!(bucket = bucket, deleted = %format_list(&deleted), "versions deleted");

    Ok(deleted)
}

pub fn upload_file(
    client: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    path: &Path,
    options: &UploadOptions,
) -> Result<PutOutcome, WalkError> {
    let body = fs::read(path).map_err(|err| WalkError {
        message: format!("failed to read file: {}, {}", path.display(), err),
    })?;

    let outcome = client.put_object(bucket, key, body, options)?;
    info!(
        bucket = bucket,
        key = key,
        file = %path.display(),
        version_id = outcome.version_id.as_deref().unwrap_or("null"),
        e_tag = outcome.e_tag.as_deref().unwrap_or(""),
        "object uploaded"
    );

    Ok(outcome)
}

pub fn download_file(
    client: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    destination: &Path,
) -> Result<(), WalkError> {
    let bytes = client.get_object(bucket, key)?;

    fs::write(destination, bytes).map_err(|err| WalkError {
        message: format!(
            "failed to write download: {}, {}",
            destination.display(),
            err
        ),
    })?;

    info!(
        bucket = bucket,
        key = key,
        destination = %destination.display(),
        "object downloaded"
    );

    Ok(())
}
