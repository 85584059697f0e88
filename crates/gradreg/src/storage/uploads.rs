//! Upload store for student portraits and research documents.
//!
//! Stored references are bare filenames (no path separators); names are
//! prefixed with a timestamp so re-uploads never collide. Deletion is
//! best-effort: a failure is logged and reported as `false`, never raised,
//! so row deletion can proceed and an orphaned file is an accepted leak.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::StorageError;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pdf", "doc", "docx"];

/// Checks the upload's extension against the allow-list (case-insensitive).
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.iter().any(|a| *a == ext)
        })
        .unwrap_or(false)
}

/// Strips any directory components from a client-supplied filename.
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}

pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<(), StorageError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| StorageError::CreateDirectory {
                path: self.root.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Saves a portrait upload as `YYYYmmdd_HHMMSS_<name>` and returns the
    /// stored filename.
    pub fn save_portrait(
        &self,
        original_name: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        let name = base_name(original_name);
        if !allowed_file(name) {
            return Err(StorageError::DisallowedExtension(name.to_string()));
        }
        let stored = format!("{}_{}", Local::now().format("%Y%m%d_%H%M%S"), name);
        self.write(&stored, content)?;
        Ok(stored)
    }

    /// Saves a research document as
    /// `research_<student>_<YYYYmmddHHMMSS>_<name>` and returns the stored
    /// filename.
    pub fn save_research(
        &self,
        student_id: i64,
        original_name: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        let name = base_name(original_name);
        if !allowed_file(name) {
            return Err(StorageError::DisallowedExtension(name.to_string()));
        }
        let stored = format!(
            "research_{}_{}_{}",
            student_id,
            Local::now().format("%Y%m%d%H%M%S"),
            name
        );
        self.write(&stored, content)?;
        Ok(stored)
    }

    fn write(&self, filename: &str, content: &[u8]) -> Result<(), StorageError> {
        self.ensure_root()?;
        let path = self.root.join(filename);
        std::fs::write(&path, content).map_err(|e| StorageError::WriteFile { path, source: e })
    }

    /// Resolves a stored reference to its on-disk path, refusing anything
    /// that could escape the uploads root.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return None;
        }
        Some(self.root.join(filename))
    }

    /// Best-effort delete. Returns `true` when the file is gone; a failure
    /// is logged and swallowed.
    pub fn delete(&self, filename: &str) -> bool {
        let Some(path) = self.resolve(filename) else {
            log::warn!("Refusing to delete suspicious upload reference '{}'", filename);
            return false;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to delete upload '{}': {}", path.display(), e);
                false
            }
        }
    }
}
