use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use aws_sdk_s3::types::{
    BucketVersioningStatus, ObjectCannedAcl, ServerSideEncryption, StorageClass,
};
use uuid::Uuid;

use crate::{
    adapters,
    model::object::{
        CreatedBucket, Grant, ObjectAttributes, ObjectIdentity, ObjectVersion, PutOutcome,
        UploadOptions, WalkError,
    },
};

pub const OWNER: &str = "mock-owner";
pub const ALL_USERS: &str = "http://acs.amazonaws.com/groups/global/AllUsers";
const NULL_VERSION: &str = "null";

#[derive(Clone, Debug)]
struct MockVersion {
    key: String,
    version_id: String,
    body: Vec<u8>,
    acl: ObjectCannedAcl,
    server_side_encryption: Option<ServerSideEncryption>,
    storage_class: Option<StorageClass>,
    is_delete_marker: bool,
}

#[derive(Debug, Default)]
struct MockBucket {
    versioning: Option<BucketVersioningStatus>,
    /// Oldest first.
    versions: Vec<MockVersion>,
}

impl MockBucket {
    fn is_versioned(&self) -> bool {
        matches!(self.versioning, Some(BucketVersioningStatus::Enabled))
    }

    fn next_version_id(&self) -> String {
        if self.is_versioned() {
            Uuid::new_v4().simple().to_string()
        } else {
            NULL_VERSION.to_string()
        }
    }

    fn latest(&self, key: &str) -> Option<&MockVersion> {
        self.versions.iter().rev().find(|v| v.key == key)
    }

    fn push(&mut self, version: MockVersion) {
        if version.version_id == NULL_VERSION {
            self.versions
                .retain(|v| !(v.key == version.key && v.version_id == NULL_VERSION));
        }
        self.versions.push(version);
    }
}

/// In-memory store with the S3 behaviors the walkthrough depends on. Clones
/// share state.
#[derive(Clone)]
pub struct MockClient {
    pub region: String,
    buckets: Arc<Mutex<HashMap<String, MockBucket>>>,
}

impl MockClient {
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            buckets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn bucket_names(&self) -> Vec<String> {
        let buckets = self.buckets.lock().expect("failed to acquire `buckets` guard");
        buckets.keys().cloned().collect()
    }

    fn with_bucket<T>(
        &self,
        operation: &str,
        bucket: &str,
        f: impl FnOnce(&mut MockBucket) -> Result<T, WalkError>,
    ) -> Result<T, WalkError> {
        let mut buckets = self.buckets.lock().map_err(|err| WalkError {
            message: format!("failed to acquire `buckets` guard: {}", err),
        })?;

        match buckets.get_mut(bucket) {
            Some(b) => f(b),
            None => Err(error(operation, bucket, "NoSuchBucket")),
        }
    }
}

fn error(operation: &str, subject: &str, code: &str) -> WalkError {
    WalkError {
        message: format!("failed to {}: {}, {}", operation, subject, code),
    }
}

fn grants_for(acl: &ObjectCannedAcl) -> Vec<Grant> {
    let mut grants = vec![Grant {
        grantee: OWNER.to_string(),
        permission: "FULL_CONTROL".to_string(),
    }];

    match acl {
        ObjectCannedAcl::PublicRead => grants.push(Grant {
            grantee: ALL_USERS.to_string(),
            permission: "READ".to_string(),
        }),
        ObjectCannedAcl::PublicReadWrite => {
            grants.push(Grant {
                grantee: ALL_USERS.to_string(),
                permission: "READ".to_string(),
            });
            grants.push(Grant {
                grantee: ALL_USERS.to_string(),
                permission: "WRITE".to_string(),
            });
        }
        _ => {}
    }

    grants
}

impl adapters::ObjectStore for MockClient {
    fn region(&self) -> Result<String, WalkError> {
        Ok(self.region.clone())
    }

    fn create_bucket(&self, bucket: &str, region: &str) -> Result<CreatedBucket, WalkError> {
        let mut buckets = self.buckets.lock().map_err(|err| WalkError {
            message: format!("failed to acquire `buckets` guard: {}", err),
        })?;

        if region != self.region {
            return Err(error("create_bucket", bucket, "IllegalLocationConstraintException"));
        }

        if buckets.contains_key(bucket) {
            return Err(error("create_bucket", bucket, "BucketAlreadyOwnedByYou"));
        }

        buckets.insert(bucket.to_string(), MockBucket::default());

        Ok(CreatedBucket {
            name: bucket.to_string(),
            region: region.to_string(),
            location: Some(format!("/{}", bucket)),
        })
    }

    fn delete_bucket(&self, bucket: &str) -> Result<(), WalkError> {
        let mut buckets = self.buckets.lock().map_err(|err| WalkError {
            message: format!("failed to acquire `buckets` guard: {}", err),
        })?;

        match buckets.get(bucket) {
            None => return Err(error("delete_bucket", bucket, "NoSuchBucket")),
            Some(b) if !b.versions.is_empty() => {
                return Err(error("delete_bucket", bucket, "BucketNotEmpty"))
            }
            Some(_) => {}
        }

        buckets.remove(bucket);
        Ok(())
    }

    fn put_bucket_versioning(
        &self,
        bucket: &str,
        status: BucketVersioningStatus,
    ) -> Result<(), WalkError> {
        self.with_bucket("put_bucket_versioning", bucket, |b| {
            b.versioning = Some(status);
            Ok(())
        })
    }

    fn get_bucket_versioning(
        &self,
        bucket: &str,
    ) -> Result<Option<BucketVersioningStatus>, WalkError> {
        self.with_bucket("get_bucket_versioning", bucket, |b| Ok(b.versioning.clone()))
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<PutOutcome, WalkError> {
        self.with_bucket("put_object", bucket, |b| {
            let version_id = b.next_version_id();
            b.push(MockVersion {
                key: key.to_string(),
                version_id: version_id.clone(),
                body,
                acl: options.acl.clone().unwrap_or(ObjectCannedAcl::Private),
                server_side_encryption: options.server_side_encryption.clone(),
                storage_class: options.storage_class.clone(),
                is_delete_marker: false,
            });

            Ok(PutOutcome {
                version_id: b.is_versioned().then_some(version_id),
                e_tag: Some(format!("\"{}\"", Uuid::new_v4().simple())),
            })
        })
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, WalkError> {
        self.with_bucket("get_object", bucket, |b| match b.latest(key) {
            Some(v) if !v.is_delete_marker => Ok(v.body.clone()),
            _ => Err(error("get_object", key, "NoSuchKey")),
        })
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectAttributes, WalkError> {
        self.with_bucket("head_object", bucket, |b| match b.latest(key) {
            Some(v) if !v.is_delete_marker => Ok(ObjectAttributes {
                version_id: b.is_versioned().then(|| v.version_id.clone()),
                content_length: v.body.len() as i64,
                server_side_encryption: v.server_side_encryption.clone(),
                storage_class: v.storage_class.clone(),
            }),
            _ => Err(error("head_object", key, "NotFound")),
        })
    }

    fn copy_object(
        &self,
        source_bucket: &str,
        destination_bucket: &str,
        key: &str,
    ) -> Result<(), WalkError> {
        let source = self.with_bucket("copy_object", source_bucket, |b| match b.latest(key) {
            Some(v) if !v.is_delete_marker => Ok(v.clone()),
            _ => Err(error("copy_object", key, "NoSuchKey")),
        })?;

        self.with_bucket("copy_object", destination_bucket, |b| {
            let version_id = b.next_version_id();
            b.push(MockVersion {
                key: key.to_string(),
                version_id,
                body: source.body,
                acl: ObjectCannedAcl::Private,
                server_side_encryption: source.server_side_encryption,
                storage_class: None,
                is_delete_marker: false,
            });
            Ok(())
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), WalkError> {
        self.with_bucket("delete_object", bucket, |b| {
            if b.versioning.is_some() {
                let version_id = b.next_version_id();
                b.push(MockVersion {
                    key: key.to_string(),
                    version_id,
                    body: Vec::new(),
                    acl: ObjectCannedAcl::Private,
                    server_side_encryption: None,
                    storage_class: None,
                    is_delete_marker: true,
                });
            } else {
                b.versions.retain(|v| v.key != key);
            }
            Ok(())
        })
    }

    fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectVersion>, WalkError> {
        self.with_bucket("list_object_versions", bucket, |b| {
            Ok(b.versions
                .iter()
                .map(|v| ObjectVersion {
                    key: v.key.clone(),
                    version_id: Some(v.version_id.clone()),
                    is_latest: b
                        .latest(&v.key)
                        .map(|latest| latest.version_id == v.version_id)
                        .unwrap_or(false),
                    is_delete_marker: v.is_delete_marker,
                })
                .collect())
        })
    }

    fn delete_objects(
        &self,
        bucket: &str,
        objects: &[ObjectIdentity],
    ) -> Result<Vec<ObjectIdentity>, WalkError> {
        if objects.is_empty() {
            return Err(error("delete_objects", bucket, "MalformedXML"));
        }

        self.with_bucket("delete_objects", bucket, |b| {
            for object in objects {
                match &object.version_id {
                    Some(version_id) => b
                        .versions
                        .retain(|v| !(v.key == object.key && &v.version_id == version_id)),
                    None => b.versions.retain(|v| v.key != object.key),
                }
            }
            Ok(objects.to_vec())
        })
    }

    fn get_object_acl(&self, bucket: &str, key: &str) -> Result<Vec<Grant>, WalkError> {
        self.with_bucket("get_object_acl", bucket, |b| match b.latest(key) {
            Some(v) if !v.is_delete_marker => Ok(grants_for(&v.acl)),
            _ => Err(error("get_object_acl", key, "NoSuchKey")),
        })
    }

    fn put_object_acl(
        &self,
        bucket: &str,
        key: &str,
        acl: ObjectCannedAcl,
    ) -> Result<(), WalkError> {
        self.with_bucket("put_object_acl", bucket, |b| {
            match b.versions.iter_mut().rev().find(|v| v.key == key) {
                Some(v) if !v.is_delete_marker => {
                    v.acl = acl;
                    Ok(())
                }
                _ => Err(error("put_object_acl", key, "NoSuchKey")),
            }
        })
    }
}
