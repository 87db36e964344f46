//! Loading a document directory.

use crate::error::{CliError, Result};
use distill_domain::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load every `*.md` file in `dir` as a document.
///
/// Files are ordered by file name and numbered `doc_000`, `doc_001`, ...
/// Subdirectories are not searched.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(CliError::DocumentsNotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut documents = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        let content = fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!("Loaded {} ({} bytes)", filename, content.len());
        documents.push(Document::new(format!("doc_{:03}", index), filename, content));
    }

    info!("Loaded {} documents from {}", documents.len(), dir.display());
    Ok(documents)
}
