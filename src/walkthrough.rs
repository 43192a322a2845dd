use aws_sdk_s3::types::ObjectCannedAcl;
use tracing::{info, span, Level};

use crate::{
    adapters::ObjectStore,
    bucket, config,
    model::object::{format_list, UploadOptions, WalkError, WalkReport},
    util,
};

/// (repeat count, base file name, content unit) for each generated file.
pub const TEMP_FILES: [(usize, &str, &str); 3] = [
    (300, "firstfile.txt", "f"),
    (400, "secondfile.txt", "s"),
    (300, "thirdfile.txt", "t"),
];

pub struct Walkthrough {
    pub client: Box<dyn ObjectStore>,
    pub config: config::WalkConfig,
}

impl Walkthrough {
    pub fn new(client: Box<dyn ObjectStore>, config: config::WalkConfig) -> Self {
        Self { client, config }
    }

    pub fn run(&self) -> Result<WalkReport, WalkError> {
        let mut report = WalkReport::default();

        self.create_buckets(&mut report)?;
        self.enable_versioning(&mut report)?;
        self.create_files(&mut report)?;
        self.upload_files(&mut report)?;
        self.download_file(&mut report)?;
        self.copy_file(&report)?;
        self.inspect_acl(&mut report)?;
        self.inspect_metadata(&mut report)?;
        self.teardown(&mut report)?;

        Ok(report)
    }

    pub fn create_buckets(&self, report: &mut WalkReport) -> Result<(), WalkError> {
        let span = span!(Level::INFO, "create_buckets", context = "create_buckets");
        let _e = span.enter();
        info!("called");

        let first = bucket::create_bucket(self.client.as_ref(), &self.config.first_prefix)?;
        let second = bucket::create_bucket(self.client.as_ref(), &self.config.second_prefix)?;

        report.region = first.region;
        report.first_bucket = first.name;
        report.second_bucket = second.name;

        Ok(())
    }

    pub fn enable_versioning(&self, report: &mut WalkReport) -> Result<(), WalkError> {
        let span = span!(Level::INFO, "enable_versioning", context = "enable_versioning");
        let _e = span.enter();
        info!("called");

        report.versioning_status =
            bucket::enable_bucket_versioning(self.client.as_ref(), &report.first_bucket)?;

        Ok(())
    }

    pub fn create_files(&self, report: &mut WalkReport) -> Result<(), WalkError> {
        let span = span!(Level::INFO, "create_files", context = "create_files");
        let _e = span.enter();
        info!("called");

        for (size, file_name, content) in TEMP_FILES {
            let name =
                util::temp::create_temp_file(&self.config.work_dir, size, file_name, content)?;
            report.temp_files.push(name);
        }

        Ok(())
    }

    pub fn upload_files(&self, report: &mut WalkReport) -> Result<(), WalkError> {
        let span = span!(Level::INFO, "upload_files", context = "upload_files");
        let _e = span.enter();
        info!("called");

        let (first, second, third) = self.file_names(report)?;
        let first_bucket = &report.first_bucket;
        let work_dir = &self.config.work_dir;
        let plain = UploadOptions::default();

        // same key twice, the second upload becomes a new version
        let v1 = bucket::upload_file(
            self.client.as_ref(),
            first_bucket,
            &first,
            &work_dir.join(&first),
            &plain,
        )?;
        let v2 = bucket::upload_file(
            self.client.as_ref(),
            first_bucket,
            &first,
            &work_dir.join(&third),
            &plain,
        )?;
        info!(
            key = %first,
            version_id = v2.version_id.as_deref().unwrap_or("null"),
            "version of first file"
        );

        report.first_object_versions = [v1.version_id, v2.version_id]
            .into_iter()
            .flatten()
            .collect();

        bucket::upload_file(
            self.client.as_ref(),
            first_bucket,
            &second,
            &work_dir.join(&second),
            &UploadOptions::public_read(),
        )?;
        bucket::upload_file(
            self.client.as_ref(),
            first_bucket,
            &third,
            &work_dir.join(&third),
            &UploadOptions::encrypted_infrequent_access(),
        )?;

        Ok(())
    }

    pub fn download_file(&self, report: &mut WalkReport) -> Result<(), WalkError> {
        let span = span!(Level::INFO, "download_file", context = "download_file");
        let _e = span.enter();
        info!("called");

        let (first, _, _) = self.file_names(report)?;
        let destination = self.config.download_dir.join(&first);

        bucket::download_file(
            self.client.as_ref(),
            &report.first_bucket,
            &first,
            &destination,
        )?;
        report.download_path = destination;

        Ok(())
    }

    pub fn copy_file(&self, report: &WalkReport) -> Result<(), WalkError> {
        let span = span!(Level::INFO, "copy_file", context = "copy_file");
        let _e = span.enter();
        info!("called");

        let (first, _, _) = self.file_names(report)?;

        bucket::copy_to_bucket(
            self.client.as_ref(),
            &report.first_bucket,
            &report.second_bucket,
            &first,
        )
    }

    pub fn inspect_acl(&self, report: &mut WalkReport) -> Result<(), WalkError> {
        let span = span!(Level::INFO, "inspect_acl", context = "inspect_acl");
        let _e = span.enter();
        info!("called");

        let (_, second, _) = self.file_names(report)?;
        let first_bucket = &report.first_bucket;

        let public_grants = self.client.get_object_acl(first_bucket, &second)?;
        info!(key = %second, grants = %format_list(&public_grants), "acl public");

        self.client
            .put_object_acl(first_bucket, &second, ObjectCannedAcl::Private)?;

        let private_grants = self.client.get_object_acl(first_bucket, &second)?;
        info!(key = %second, grants = %format_list(&private_grants), "acl private");

        report.public_grants = public_grants;
        report.private_grants = private_grants;

        Ok(())
    }

    pub fn inspect_metadata(&self, report: &mut WalkReport) -> Result<(), WalkError> {
        let span = span!(Level::INFO, "inspect_metadata", context = "inspect_metadata");
        let _e = span.enter();
        info!("called");

        let (_, _, third) = self.file_names(report)?;
        let attributes = self.client.head_object(&report.first_bucket, &third)?;

        info!(
            key = %third,
            version_id = attributes.version_id.as_deref().unwrap_or("null"),
            content_length = attributes.content_length,
            encryption = attributes
                .server_side_encryption
                .as_ref()
                .map(|sse| sse.as_str())
                .unwrap_or("none"),
            storage_class = attributes
                .storage_class
                .as_ref()
                .map(|sc| sc.as_str())
                .unwrap_or("STANDARD"),
            "object metadata"
        );

        report.server_side_encryption = attributes.server_side_encryption;
        report.storage_class = attributes.storage_class;

        Ok(())
    }

    pub fn teardown(&self, report: &mut WalkReport) -> Result<(), WalkError> {
        let span = span!(Level::INFO, "teardown", context = "teardown");
        let _e = span.enter();
        info!("called");

        let (first, second, third) = self.file_names(report)?;
        let client = self.client.as_ref();

        // on the versioned bucket these only leave delete markers behind
        client.delete_object(&report.first_bucket, &first)?;
        client.delete_object(&report.first_bucket, &second)?;
        client.delete_object(&report.first_bucket, &third)?;
        client.delete_object(&report.second_bucket, &first)?;
        info!("objects deleted");

        report.deleted_versions = bucket::delete_all_objects(client, &report.first_bucket)?;

        client.delete_bucket(&report.first_bucket)?;
        client.delete_bucket(&report.second_bucket)?;
        info!(
            first_bucket = %report.first_bucket,
            second_bucket = %report.second_bucket,
            "buckets deleted"
        );

        Ok(())
    }

    fn file_names(&self, report: &WalkReport) -> Result<(String, String, String), WalkError> {
        match report.temp_files.as_slice() {
            [first, second, third] => Ok((first.clone(), second.clone(), third.clone())),
            _ => Err(WalkError {
                message: format!(
                    "expected {} temp files, found {}",
                    TEMP_FILES.len(),
                    report.temp_files.len()
                ),
            }),
        }
    }
}
