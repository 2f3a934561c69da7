//! Document task source: open tasks from the newest notes export.
//!
//! OneNote pages are exported to `.docx` files in a configured folder. The
//! most recently modified export wins, and every non-empty paragraph that
//! does not start with the done marker counts as an open task. No structural
//! list detection beyond the marker check.

pub mod docx;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::source::SourceData;

pub trait TaskSource: Send + Sync {
    fn fetch(&self) -> SourceData<Vec<String>>;
}

pub struct NotesExportSource {
    folder: Option<PathBuf>,
    done_marker: String,
}

impl NotesExportSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            folder: config.notes_export_folder.clone(),
            done_marker: config.done_marker.clone(),
        }
    }
}

impl TaskSource for NotesExportSource {
    fn fetch(&self) -> SourceData<Vec<String>> {
        let Some(folder) = &self.folder else {
            warn!("Notes export folder not configured (NOTES_EXPORT_FOLDER)");
            return SourceData::Failed("notes export folder not configured".to_string());
        };

        let path = match latest_export(folder) {
            Ok(path) => path,
            Err(reason) => {
                warn!("Notes export scan failed: {}", reason);
                return SourceData::Failed(reason);
            }
        };

        info!("Parsing notes export: {}", path.display());
        let paragraphs = match docx::extract_paragraphs(&path) {
            Ok(paragraphs) => paragraphs,
            Err(reason) => {
                warn!("Notes export parse failed: {}", reason);
                return SourceData::Failed(reason);
            }
        };

        let tasks = filter_open_tasks(paragraphs.iter().map(String::as_str), &self.done_marker);
        if tasks.is_empty() {
            info!("No open tasks found in the document");
            SourceData::Empty
        } else {
            info!("Found {} open tasks", tasks.len());
            SourceData::Ready(tasks)
        }
    }
}

/// Most recently modified `.docx` in `folder`.
///
/// Equal modification times resolve to the lexicographically last path, so
/// the choice is deterministic either way.
pub fn latest_export(folder: &Path) -> Result<PathBuf, String> {
    if !folder.is_dir() {
        return Err(format!("export folder not found: {}", folder.display()));
    }

    let entries = std::fs::read_dir(folder)
        .map_err(|e| format!("could not read export folder {}: {}", folder.display(), e))?;

    let mut exports: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_docx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
        if !is_docx {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
        exports.push((modified, path));
    }

    exports
        .into_iter()
        .max()
        .map(|(_, path)| path)
        .ok_or_else(|| format!("no .docx exports found in {}", folder.display()))
}

/// Keep every trimmed non-empty paragraph that does not start with the done
/// marker (case-insensitive).
pub fn filter_open_tasks<'a>(
    paragraphs: impl IntoIterator<Item = &'a str>,
    done_marker: &str,
) -> Vec<String> {
    paragraphs
        .into_iter()
        .map(str::trim)
        .filter(|text| !text.is_empty() && !has_done_prefix(text, done_marker))
        .map(str::to_string)
        .collect()
}

fn has_done_prefix(text: &str, marker: &str) -> bool {
    text.len() >= marker.len()
        && text.is_char_boundary(marker.len())
        && text[..marker.len()].eq_ignore_ascii_case(marker)
}
