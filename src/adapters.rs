use aws_sdk_s3::types::{BucketVersioningStatus, ObjectCannedAcl};

use crate::model::object::{
    CreatedBucket, Grant, ObjectAttributes, ObjectIdentity, ObjectVersion, PutOutcome,
    UploadOptions, WalkError,
};

#[cfg(test)]
pub mod mock;
pub mod s3;

/// Blocking view of the object-storage calls the walkthrough makes.
pub trait ObjectStore {
    fn region(&self) -> Result<String, WalkError>;

    fn create_bucket(&self, bucket: &str, region: &str) -> Result<CreatedBucket, WalkError>;

    fn delete_bucket(&self, bucket: &str) -> Result<(), WalkError>;

    fn put_bucket_versioning(
        &self,
        bucket: &str,
        status: BucketVersioningStatus,
    ) -> Result<(), WalkError>;

    fn get_bucket_versioning(
        &self,
        bucket: &str,
    ) -> Result<Option<BucketVersioningStatus>, WalkError>;

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<PutOutcome, WalkError>;

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, WalkError>;

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectAttributes, WalkError>;

    fn copy_object(
        &self,
        source_bucket: &str,
        destination_bucket: &str,
        key: &str,
    ) -> Result<(), WalkError>;

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), WalkError>;

    /// Every version and delete marker in the bucket, across all pages.
    fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectVersion>, WalkError>;

    fn delete_objects(
        &self,
        bucket: &str,
        objects: &[ObjectIdentity],
    ) -> Result<Vec<ObjectIdentity>, WalkError>;

    fn get_object_acl(&self, bucket: &str, key: &str) -> Result<Vec<Grant>, WalkError>;

    fn put_object_acl(
        &self,
        bucket: &str,
        key: &str,
        acl: ObjectCannedAcl,
    ) -> Result<(), WalkError>;
}
