use aws_sdk_s3::{
    error::DisplayErrorContext,
    primitives::ByteStream,
    types::{
        BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration, Delete,
        ObjectCannedAcl, ObjectIdentifier, VersioningConfiguration,
    },
};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{
    adapters,
    model::object::{
        CreatedBucket, Grant, ObjectAttributes, ObjectIdentity, ObjectVersion, PutOutcome,
        UploadOptions, WalkError,
    },
    util,
};

/// S3 rejects an explicit location constraint for its default region.
const DEFAULT_REGION: &str = "us-east-1";

/// Upper bound on keys in a single DeleteObjects request.
pub const MAX_DELETE_BATCH: usize = 1000;

/// Unreserved characters plus `/`, which S3 keeps literal in `x-amz-copy-source`.
const COPY_SOURCE_KEY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn copy_source(bucket: &str, key: &str) -> String {
    format!("{}/{}", bucket, utf8_percent_encode(key, COPY_SOURCE_KEY))
}

fn sdk_error<E>(operation: &str, subject: &str, err: E) -> WalkError
where
    E: std::error::Error,
{
    WalkError {
        message: format!(
            "failed to {}: {}, {}",
            operation,
            subject,
            DisplayErrorContext(&err)
        ),
    }
}

pub fn location_constraint(region: &str) -> Option<CreateBucketConfiguration> {
    if region == DEFAULT_REGION {
        return None;
    }

    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

fn grantee_name(grant: &aws_sdk_s3::types::Grant) -> String {
    let grantee = match grant.grantee() {
        Some(grantee) => grantee,
        None => return "unknown".to_string(),
    };

    grantee
        .uri()
        .or(grantee.display_name())
        .or(grantee.email_address())
        .or(grantee.id())
        .unwrap_or("unknown")
        .to_string()
}

impl adapters::ObjectStore for aws_sdk_s3::Client {
    fn region(&self) -> Result<String, WalkError> {
        self.config()
            .region()
            .map(|region| region.to_string())
            .ok_or_else(|| WalkError {
                message: "failed to resolve region: no region configured".to_string(),
            })
    }

    fn create_bucket(&self, bucket: &str, region: &str) -> Result<CreatedBucket, WalkError> {
        let req = self
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(location_constraint(region));

        let cb = util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("create_bucket", bucket, err))?;

        Ok(CreatedBucket {
            name: bucket.to_string(),
            region: region.to_string(),
            location: cb.location().map(|location| location.to_string()),
        })
    }

    fn delete_bucket(&self, bucket: &str) -> Result<(), WalkError> {
        let req = self.delete_bucket().bucket(bucket);

        util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("delete_bucket", bucket, err))?;

        Ok(())
    }

    fn put_bucket_versioning(
        &self,
        bucket: &str,
        status: BucketVersioningStatus,
    ) -> Result<(), WalkError> {
        let req = self
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(VersioningConfiguration::builder().status(status).build());

        util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("put_bucket_versioning", bucket, err))?;

        Ok(())
    }

    fn get_bucket_versioning(
        &self,
        bucket: &str,
    ) -> Result<Option<BucketVersioningStatus>, WalkError> {
        let req = self.get_bucket_versioning().bucket(bucket);

        let bv = util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("get_bucket_versioning", bucket, err))?;

        Ok(bv.status().cloned())
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<PutOutcome, WalkError> {
        let req = self
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .set_acl(options.acl.clone())
            .set_server_side_encryption(options.server_side_encryption.clone())
            .set_storage_class(options.storage_class.clone());

        let po = util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("put_object", key, err))?;

        Ok(PutOutcome {
            version_id: po.version_id().map(|id| id.to_string()),
            e_tag: po.e_tag().map(|tag| tag.to_string()),
        })
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, WalkError> {
        let req = self.get_object().bucket(bucket).key(key);

        let o = util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("get_object", key, err))?;

        let bytes = util::poll::poll_until_ready_error(o.body.collect())
            .map_err(|err| sdk_error("collect body", key, err))?;

        Ok(bytes.into_bytes().to_vec())
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectAttributes, WalkError> {
        let req = self.head_object().bucket(bucket).key(key);

        let ho = util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("head_object", key, err))?;

        Ok(ObjectAttributes {
            version_id: ho.version_id().map(|id| id.to_string()),
            content_length: ho.content_length().unwrap_or(0),
            server_side_encryption: ho.server_side_encryption().cloned(),
            storage_class: ho.storage_class().cloned(),
        })
    }

    fn copy_object(
        &self,
        source_bucket: &str,
        destination_bucket: &str,
        key: &str,
    ) -> Result<(), WalkError> {
        let req = self
            .copy_object()
            .copy_source(copy_source(source_bucket, key))
            .bucket(destination_bucket)
            .key(key);

        util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("copy_object", key, err))?;

        Ok(())
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), WalkError> {
        let req = self.delete_object().bucket(bucket).key(key);

        util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("delete_object", key, err))?;

        Ok(())
    }

    fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectVersion>, WalkError> {
        let mut versions = Vec::new();
        let mut key_marker: Option<String> = None;
        let mut version_id_marker: Option<String> = None;

        loop {
            let req = self
                .list_object_versions()
                .bucket(bucket)
                .set_key_marker(key_marker.take())
                .set_version_id_marker(version_id_marker.take());

            let lv = util::poll::poll_until_ready_error(req.send())
                .map_err(|err| sdk_error("list_object_versions", bucket, err))?;

            for v in lv.versions() {
                versions.push(ObjectVersion {
                    key: v.key().unwrap_or("").to_string(),
                    version_id: v.version_id().map(|id| id.to_string()),
                    is_latest: v.is_latest().unwrap_or(false),
                    is_delete_marker: false,
                });
            }

            for m in lv.delete_markers() {
                versions.push(ObjectVersion {
                    key: m.key().unwrap_or("").to_string(),
                    version_id: m.version_id().map(|id| id.to_string()),
                    is_latest: m.is_latest().unwrap_or(false),
                    is_delete_marker: true,
                });
            }

            if !lv.is_truncated().unwrap_or(false) {
                break;
            }

            key_marker = lv.next_key_marker().map(|marker| marker.to_string());
            version_id_marker = lv.next_version_id_marker().map(|marker| marker.to_string());
            if key_marker.is_none() && version_id_marker.is_none() {
                break;
            }
        }

        Ok(versions)
    }

    fn delete_objects(
        &self,
        bucket: &str,
        objects: &[ObjectIdentity],
    ) -> Result<Vec<ObjectIdentity>, WalkError> {
        let mut deleted = Vec::new();

        for batch in objects.chunks(MAX_DELETE_BATCH) {
            let mut identifiers = Vec::with_capacity(batch.len());
            for object in batch {
                let identifier = ObjectIdentifier::builder()
                    .key(&object.key)
                    .set_version_id(object.version_id.clone())
                    .build()
                    .map_err(|err| sdk_error("build object identifier", &object.key, err))?;
                identifiers.push(identifier);
            }

            let delete = Delete::builder()
                .set_objects(Some(identifiers))
                .quiet(false)
                .build()
                .map_err(|err| sdk_error("build delete request", bucket, err))?;

            let req = self.delete_objects().bucket(bucket).delete(delete);

            let dos = util::poll::poll_until_ready_error(req.send())
                .map_err(|err| sdk_error("delete_objects", bucket, err))?;

            if let Some(first) = dos.errors().first() {
                return Err(WalkError {
                    message: format!(
                        "failed to delete_objects: {}, {} of {} entries rejected, first: {} {}",
                        bucket,
                        dos.errors().len(),
                        batch.len(),
                        first.key().unwrap_or(""),
                        first.message().unwrap_or("")
                    ),
                });
            }

            for d in dos.deleted() {
                deleted.push(ObjectIdentity {
                    key: d.key().unwrap_or("").to_string(),
                    version_id: d.version_id().map(|id| id.to_string()),
                });
            }
        }

        Ok(deleted)
    }

    fn get_object_acl(&self, bucket: &str, key: &str) -> Result<Vec<Grant>, WalkError> {
        let req = self.get_object_acl().bucket(bucket).key(key);

        let acl = util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("get_object_acl", key, err))?;

        Ok(acl
            .grants()
            .iter()
            .map(|g| Grant {
                grantee: grantee_name(g),
                permission: g
                    .permission()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default(),
            })
            .collect())
    }

    fn put_object_acl(
        &self,
        bucket: &str,
        key: &str,
        acl: ObjectCannedAcl,
    ) -> Result<(), WalkError> {
        let req = self.put_object_acl().bucket(bucket).key(key).acl(acl);

        util::poll::poll_until_ready_error(req.send())
            .map_err(|err| sdk_error("put_object_acl", key, err))?;

        Ok(())
    }
}
