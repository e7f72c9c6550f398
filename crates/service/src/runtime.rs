//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Make sure the directory of the backing file exists before the store loads.
pub async fn ensure_env(products_file: &Path) -> anyhow::Result<()> {
    common::env::ensure_data_dir(products_file).await
}
