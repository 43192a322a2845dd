use std::{fs, path::Path};

use tracing::info;
use uuid::Uuid;

use crate::model::object::WalkError;

const RANDOM_PREFIX_LEN: usize = 6;

pub fn random_file_name(file_name: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", &hex[..RANDOM_PREFIX_LEN], file_name)
}

/// Writes `content` repeated `size` times to a fresh file in `dir` and returns
/// the generated file name.
pub fn create_temp_file(
    dir: &Path,
    size: usize,
    file_name: &str,
    content: &str,
) -> Result<String, WalkError> {
    let random_file_name = random_file_name(file_name);
    let path = dir.join(&random_file_name);

    fs::write(&path, content.repeat(size)).map_err(|err| WalkError {
        message: format!(
            "failed to write temp file: {}, {}",
            path.display(),
            err
        ),
    })?;

    info!(file = %path.display(), size = size, "file created");

    Ok(random_file_name)
}
