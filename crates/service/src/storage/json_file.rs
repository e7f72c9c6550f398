use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::errors::ServiceError;

/// Read the file at `path` and decode it as a JSON array.
pub async fn read_json_vec<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ServiceError> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| ServiceError::Persistence(format!("read {}: {}", path.display(), e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::Persistence(format!("parse {}: {}", path.display(), e)))
}

/// Serialize `value` and replace the whole file at `path`.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ServiceError> {
    let data = serde_json::to_vec(value)
        .map_err(|e| ServiceError::Persistence(format!("serialize {}: {}", path.display(), e)))?;
    fs::write(path, data)
        .await
        .map_err(|e| ServiceError::Persistence(format!("write {}: {}", path.display(), e)))
}
