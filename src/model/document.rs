// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The single editing record: what the browser currently holds vs. what was
/// last written to disk.
///
/// `last_persisted_content` is only ever set to a value that has actually been
/// written to `path`; it is never updated ahead of a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    current_content: String,
    last_persisted_content: String,
}

impl Document {
    /// Reads the target file if it exists, else starts from an empty string.
    ///
    /// A freshly loaded document is never dirty: both fields start at the
    /// loaded value.
    pub fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err),
        };
        Ok(Self {
            path,
            current_content: content.clone(),
            last_persisted_content: content,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base filename of the target, used as the backup name prefix.
    pub fn base_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn current_content(&self) -> &str {
        &self.current_content
    }

    pub fn last_persisted_content(&self) -> &str {
        &self.last_persisted_content
    }

    pub fn is_dirty(&self) -> bool {
        self.current_content != self.last_persisted_content
    }

    pub fn set_current(&mut self, content: String) {
        self.current_content = content;
    }

    /// Call only after `content` has been successfully written to `path`.
    pub fn mark_persisted(&mut self, content: String) {
        self.last_persisted_content = content;
    }

    /// Resets both fields to `content`, e.g. after a backup restore replaced
    /// the on-disk file.
    pub fn reset_to(&mut self, content: String) {
        self.current_content = content.clone();
        self.last_persisted_content = content;
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::Document;

    fn temp_file(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        env::temp_dir().join(format!("blocked-doc-{name}-{}-{nanos}", std::process::id()))
    }

    #[test]
    fn load_missing_file_starts_empty_and_clean() {
        let path = temp_file("missing");
        let doc = Document::load(&path).expect("load");
        assert_eq!(doc.current_content(), "");
        assert_eq!(doc.last_persisted_content(), "");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn load_existing_file_is_never_dirty() {
        let path = temp_file("existing");
        std::fs::write(&path, "a: 1\n").unwrap();
        let doc = Document::load(&path).expect("load");
        assert_eq!(doc.current_content(), "a: 1\n");
        assert!(!doc.is_dirty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn set_current_marks_dirty_until_persisted() {
        let path = temp_file("dirty");
        let mut doc = Document::load(&path).expect("load");
        doc.set_current("foo: 2\n".to_owned());
        assert!(doc.is_dirty());

        doc.mark_persisted("foo: 2\n".to_owned());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn reset_to_clears_dirtiness_with_restored_content() {
        let path = temp_file("reset");
        let mut doc = Document::load(&path).expect("load");
        doc.set_current("pending edits".to_owned());
        assert!(doc.is_dirty());

        doc.reset_to("restored".to_owned());
        assert_eq!(doc.current_content(), "restored");
        assert_eq!(doc.last_persisted_content(), "restored");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn base_name_is_the_file_name() {
        let doc = Document::load(temp_file("base.yaml")).expect("load");
        assert!(doc.base_name().starts_with("blocked-doc-base.yaml"));
    }
}
