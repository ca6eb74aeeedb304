//! Runtime environment helpers

use tracing::info;

/// Ensure the uploads directory tree exists before the server starts
/// accepting files.
pub async fn ensure_env(uploads_root: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(uploads_root).await?;
    info!(dir = uploads_root, "uploads directory ready");
    Ok(())
}
