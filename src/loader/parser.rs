use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::api::dataset_dto::DatasetDto;
use crate::domain::dataset::dataset::Dataset;
use crate::error::{Error, Result};

/// Parses a JSON file into a given type `T`.
///
/// Errors are automatically converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let data = fs::read_to_string(file_path).map_err(Error::IoError)?;

    let parsed_data: T = serde_json::from_str(&data).map_err(Error::DeserializationError)?;

    Ok(parsed_data)
}

/// Parses JSON from any reader (stdin when no dataset file is given).
pub fn parse_json_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    Ok(serde_json::from_reader(reader)?)
}

/// Loads and validates a dataset from `file_path`, or from stdin if it is `None`.
pub fn load_dataset(file_path: Option<&Path>) -> Result<Dataset> {
    let dto: DatasetDto = match file_path {
        Some(path) => {
            log::info!("Loading dataset from '{}'.", path.display());
            parse_json_file(path)?
        }
        None => {
            log::info!("Loading dataset from stdin.");
            parse_json_reader(std::io::stdin().lock())?
        }
    };

    let dataset = Dataset::from_dto(dto)?;
    log::info!(
        "Dataset loaded: {} workflows, {} tasks, {} VMs, {} hosts.",
        dataset.workflows.len(),
        dataset.task_count(),
        dataset.vms.len(),
        dataset.hosts.len()
    );

    Ok(dataset)
}
