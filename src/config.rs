use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::model::object::WalkError;

/// prefix + 36-char UUID must fit the 63-char bucket name limit
pub const MAX_PREFIX_LEN: usize = 27;

#[derive(Clone, Debug)]
pub struct WalkConfig {
    pub first_prefix: String,
    pub second_prefix: String,
    pub work_dir: PathBuf,
    pub download_dir: PathBuf,
    pub endpoint_url: Option<String>,
    pub path_style: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            first_prefix: "firstrustbucket".to_string(),
            second_prefix: "secondrustbucket".to_string(),
            work_dir: PathBuf::from("."),
            download_dir: PathBuf::from("/tmp"),
            endpoint_url: None,
            path_style: false,
        }
    }
}

pub fn command() -> Command {
    Command::new("bucketwalk")
        .about("Walks through bucket and object operations against S3")
        .arg(
            Arg::new("first-prefix")
                .long("first-prefix")
                .default_value("firstrustbucket")
                .help("Name prefix of the versioned bucket"),
        )
        .arg(
            Arg::new("second-prefix")
                .long("second-prefix")
                .default_value("secondrustbucket")
                .help("Name prefix of the unversioned bucket"),
        )
        .arg(
            Arg::new("work-dir")
                .long("work-dir")
                .default_value(".")
                .help("Directory for generated temp files"),
        )
        .arg(
            Arg::new("download-dir")
                .long("download-dir")
                .default_value("/tmp")
                .help("Directory the downloaded object is written to"),
        )
        .arg(
            Arg::new("endpoint-url")
                .long("endpoint-url")
                .help("S3-compatible endpoint to use instead of AWS"),
        )
        .arg(
            Arg::new("path-style")
                .long("path-style")
                .action(ArgAction::SetTrue)
                .help("Force path-style bucket addressing"),
        )
}

pub fn validate_prefix(prefix: &str) -> Result<(), WalkError> {
    if prefix.is_empty() || prefix.len() > MAX_PREFIX_LEN {
        return Err(WalkError {
            message: format!(
                "invalid bucket prefix: {}, length must be 1 to {}",
                prefix, MAX_PREFIX_LEN
            ),
        });
    }

    let valid_chars = prefix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let valid_start = prefix
        .chars()
        .next()
        .map(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .unwrap_or(false);

    if !valid_chars || !valid_start {
        return Err(WalkError {
            message: format!(
                "invalid bucket prefix: {}, use lowercase letters, digits, '-' or '.'",
                prefix
            ),
        });
    }

    Ok(())
}

/// The download is named after the first temp file, so a shared directory
/// would overwrite that file.
pub fn validate_dirs(work_dir: &Path, download_dir: &Path) -> Result<(), WalkError> {
    let same = match (fs::canonicalize(work_dir), fs::canonicalize(download_dir)) {
        (Ok(work), Ok(download)) => work == download,
        _ => work_dir == download_dir,
    };

    if same {
        return Err(WalkError {
            message: format!(
                "invalid directories: work dir and download dir are both {}",
                work_dir.display()
            ),
        });
    }

    Ok(())
}

impl WalkConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, WalkError> {
        let defaults = WalkConfig::default();

        let first_prefix = matches
            .get_one::<String>("first-prefix")
            .cloned()
            .unwrap_or(defaults.first_prefix);
        let second_prefix = matches
            .get_one::<String>("second-prefix")
            .cloned()
            .unwrap_or(defaults.second_prefix);

        validate_prefix(&first_prefix)?;
        validate_prefix(&second_prefix)?;

        let work_dir = matches
            .get_one::<String>("work-dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.work_dir);
        let download_dir = matches
            .get_one::<String>("download-dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        validate_dirs(&work_dir, &download_dir)?;

        Ok(Self {
            first_prefix,
            second_prefix,
            work_dir,
            download_dir,
            endpoint_url: matches.get_one::<String>("endpoint-url").cloned(),
            path_style: matches.get_flag("path-style"),
        })
    }
}
