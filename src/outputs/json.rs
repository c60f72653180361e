//! JSON output of a [`Digest`], one file per date.

use crate::models::Digest;
use chrono::NaiveDate;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the digest file for `date` under `json_output_dir`.
pub fn digest_path(json_output_dir: &str, date: NaiveDate) -> PathBuf {
    PathBuf::from(json_output_dir).join(format!("{}.json", date.format("%Y-%m-%d")))
}

/// Write `digest` to `{json_output_dir}/{date}.json`, replacing any earlier run.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, %date))]
pub async fn write_digest(
    digest: &Digest,
    json_output_dir: &str,
    date: NaiveDate,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = digest_path(json_output_dir, date);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote digest JSON");
    Ok(path)
}
