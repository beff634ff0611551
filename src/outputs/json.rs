//! JSON output for drafts.
//!
//! Each draft is written as `{json_output_dir}/{date}_{slug}.json`, where the
//! slug comes from the draft title (or the URL when the title slugs to
//! nothing). The file holds the draft fields plus the source URL. Existing
//! files are never replaced: a taken name gets a `-2`, `-3`, ... suffix.

use crate::error::Result;
use crate::models::ArticleDraft;
use crate::utils::slugify_title;
use chrono::Local;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument, warn};

#[derive(Serialize)]
struct DraftFile<'a> {
    url: &'a str,
    #[serde(flatten)]
    draft: &'a ArticleDraft,
}

/// Base name (without extension) for a draft written on `date`.
pub fn draft_stem(draft: &ArticleDraft, url: &str, date: &str) -> String {
    let slug = slugify_title(&draft.title);
    let slug = if slug.trim_matches('-').is_empty() {
        slugify_title(url.trim_start_matches("https://").trim_start_matches("http://"))
    } else {
        slug
    };
    let slug: String = slug.chars().take(80).collect();
    format!("{date}_{slug}")
}

/// Write a draft to a new JSON file under `json_output_dir`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_draft(draft: &ArticleDraft, url: &str, json_output_dir: &str) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&DraftFile { url, draft })?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(%json_output_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let local_date = Local::now().date_naive().to_string();
    let stem = draft_stem(draft, url, &local_date);
    let dir = Path::new(json_output_dir);

    let mut attempt = 1usize;
    loop {
        let path = if attempt == 1 {
            dir.join(format!("{stem}.json"))
        } else {
            dir.join(format!("{stem}-{attempt}.json"))
        };
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(mut file) => {
                if attempt > 1 {
                    warn!(path = %path.display(), %url, "Draft file name taken; wrote with suffix");
                }
                file.write_all(json.as_bytes()).await?;
                file.flush().await?;
                info!(path = %path.display(), "Wrote draft JSON file");
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to create draft JSON file");
                return Err(e.into());
            }
        }
    }
}
