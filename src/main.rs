use std::process;

use tracing::{error, info, span, Level};

mod adapters;
mod bucket;
mod config;
mod model;
mod util;
mod walkthrough;

fn main() {
    tracing_subscriber::fmt().json().init();

    let span = span!(Level::INFO, "main", context = "main");
    let _e = span.enter();
    info!("called");

    let matches = config::command().get_matches();
    let config = match config::WalkConfig::from_matches(&matches) {
        Err(err) => {
            error!(error_message=%err, error_group="config");
            process::exit(2);
        }
        Ok(config) => config,
    };
    info!(
        first_prefix = %config.first_prefix,
        second_prefix = %config.second_prefix,
        work_dir = %config.work_dir.display(),
        download_dir = %config.download_dir.display(),
        endpoint_url = config.endpoint_url.as_deref().unwrap_or("default"),
        path_style = config.path_style,
        "args"
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Err(err) => {
            error!(error_message=%err, error_group="runtime");
            process::exit(1);
        }
        Ok(runtime) => runtime,
    };
    let _guard = runtime.enter();

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let sdk_config = util::poll::poll_until_ready(loader.load());

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.path_style)
        .build();
    let client = aws_sdk_s3::Client::from_conf(s3_config);

    let walk = walkthrough::Walkthrough::new(Box::new(client), config);
    match walk.run() {
        Err(err) => {
            error!(error_message=%err, error_group="walkthrough");
            process::exit(1);
        }
        Ok(report) => {
            info!(
                first_bucket = %report.first_bucket,
                second_bucket = %report.second_bucket,
                region = %report.region,
                versioning = report
                    .versioning_status
                    .as_ref()
                    .map(|s| s.as_str())
                    .unwrap_or("unset"),
                files = %report.temp_files.join(","),
                first_object_versions = %report.first_object_versions.join(","),
                public_grants = %model::object::format_list(&report.public_grants),
                private_grants = %model::object::format_list(&report.private_grants),
                encryption = report
                    .server_side_encryption
                    .as_ref()
                    .map(|sse| sse.as_str())
                    .unwrap_or("none"),
                storage_class = report
                    .storage_class
                    .as_ref()
                    .map(|sc| sc.as_str())
                    .unwrap_or("STANDARD"),
                deleted_versions = %model::object::format_list(&report.deleted_versions),
                download = %report.download_path.display(),
                "walkthrough complete"
            );
        }
    }
}
