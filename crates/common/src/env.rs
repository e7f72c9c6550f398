//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the directory holding the backing file exists.
pub async fn ensure_data_dir(file_path: &Path) -> anyhow::Result<()> {
    let Some(dir) = file_path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        debug!(path = %file_path.display(), "backing file lives in the working directory");
        return Ok(());
    };
    if tokio::fs::metadata(dir).await.is_err() {
        warn!(dir = %dir.display(), "data directory missing; creating it");
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    Ok(())
}
