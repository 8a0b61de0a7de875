// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::model::{Document, FileType};
use crate::store::{write_atomic, BackupFolder, StoreError, WriteDurability};

pub const DEFAULT_BACKUP_LIST_LIMIT: usize = 10;

/// The facade every save, restore, and list operation funnels through.
///
/// The document is the only state shared between HTTP handlers and the
/// auto-save task; the whole read-modify-write sequence (set current, compare
/// against last persisted, write, mark persisted) runs under one lock, so
/// concurrent manual and auto saves serialize and the last writer wins with
/// no torn or interleaved writes.
#[derive(Clone)]
pub struct PersistenceService {
    document: Arc<Mutex<Document>>,
    backups: BackupFolder,
    durability: WriteDurability,
}

impl PersistenceService {
    pub fn new(document: Document, backups: BackupFolder) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            backups,
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn backups(&self) -> &BackupFolder {
        &self.backups
    }

    pub async fn document_path(&self) -> PathBuf {
        self.document.lock().await.path().to_path_buf()
    }

    pub async fn base_name(&self) -> String {
        self.document.lock().await.base_name()
    }

    pub async fn file_type(&self) -> FileType {
        FileType::detect(self.document.lock().await.path())
    }

    pub async fn current_content(&self) -> String {
        self.document.lock().await.current_content().to_owned()
    }

    pub async fn is_dirty(&self) -> bool {
        self.document.lock().await.is_dirty()
    }

    /// Records `content` as the editor's current state and conditionally
    /// writes it to disk.
    ///
    /// Manual saves always hit disk; auto-saves only write when the content
    /// differs from what was last persisted. On a write failure the current
    /// content stays updated (no rollback), so the user's edits survive for
    /// the next attempt.
    pub async fn save(&self, content: String, auto_save: bool) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        document.set_current(content.clone());

        // Auto-saves skip redundant writes; explicit saves always hit disk so
        // a user-initiated action is never silently dropped.
        if auto_save && content == document.last_persisted_content() {
            return Ok(());
        }

        write_atomic(document.path(), content.as_bytes(), self.durability)?;
        document.mark_persisted(content);
        Ok(())
    }

    /// Writes the current content if it is ahead of disk.
    ///
    /// Returns whether a write happened. This is the auto-save path; it is
    /// equivalent to `save(current_content, true)` under a single lock
    /// acquisition.
    pub async fn flush_dirty(&self) -> Result<bool, StoreError> {
        let mut document = self.document.lock().await;
        if !document.is_dirty() {
            return Ok(false);
        }

        let content = document.current_content().to_owned();
        write_atomic(document.path(), content.as_bytes(), self.durability)?;
        document.mark_persisted(content);
        Ok(true)
    }

    /// Backup names for the current document, newest first.
    ///
    /// The timestamp suffix makes lexical descending order newest-first.
    pub async fn list_backups(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let prefix = self.base_name().await;
        let mut names = self.backups.list_matching(&prefix)?;
        names.sort_by(|a, b| b.cmp(a));
        names.truncate(limit);
        Ok(names)
    }

    /// Replaces the live file with the named backup and resets the in-memory
    /// document to the restored content.
    ///
    /// Without the reset, the next auto-save tick would overwrite the
    /// just-restored file with stale pre-restore content.
    pub async fn restore_backup(&self, name: &str) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        let restored = self.backups.restore(name, document.path(), self.durability)?;
        document.reset_to(String::from_utf8_lossy(&restored).into_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests;
