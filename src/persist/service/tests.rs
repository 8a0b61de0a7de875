// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::PersistenceService;
use crate::model::Document;
use crate::store::{BackupFolder, StoreError};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("blocked-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn service_in(tmp: &TempDir, file_name: &str) -> (PersistenceService, std::path::PathBuf) {
    let live_path = tmp.path().join(file_name);
    let document = Document::load(&live_path).expect("load document");
    let backups = BackupFolder::new(tmp.path().join(".blocked"));
    (PersistenceService::new(document, backups), live_path)
}

#[tokio::test]
async fn manual_save_always_writes_to_disk() {
    let tmp = TempDir::new("svc-manual");
    let (service, live_path) = service_in(&tmp, "test.yaml");
    std::fs::write(&live_path, "a: 1\n").unwrap();

    service.save("foo: 2\n".to_owned(), false).await.expect("save");
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "foo: 2\n");
    assert!(!service.is_dirty().await);
}

#[tokio::test]
async fn manual_save_of_unchanged_content_still_writes() {
    let tmp = TempDir::new("svc-rewrite");
    let (service, live_path) = service_in(&tmp, "test.yaml");

    service.save("same\n".to_owned(), false).await.expect("save");
    // Clobber the file behind the service's back; the second identical manual
    // save must still write.
    std::fs::write(&live_path, "clobbered\n").unwrap();
    service.save("same\n".to_owned(), false).await.expect("save again");
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "same\n");
}

#[tokio::test]
async fn auto_save_of_unchanged_content_skips_the_write() {
    let tmp = TempDir::new("svc-auto-skip");
    let (service, live_path) = service_in(&tmp, "test.yaml");

    service.save("x: 1\n".to_owned(), true).await.expect("first auto save");
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "x: 1\n");

    // Sentinel written behind the service's back: a second identical
    // auto-save must not touch the file.
    std::fs::write(&live_path, "sentinel\n").unwrap();
    service.save("x: 1\n".to_owned(), true).await.expect("second auto save");
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "sentinel\n");
    assert!(!service.is_dirty().await);
}

#[tokio::test]
async fn failed_save_keeps_current_content_for_retry() {
    let tmp = TempDir::new("svc-fail");
    let live_path = tmp.path().join("missing-dir").join("test.yaml");
    let document = Document::load(&live_path).expect("load document");
    let backups = BackupFolder::new(tmp.path().join(".blocked"));
    let service = PersistenceService::new(document, backups);

    let err = service.save("unsaved edits\n".to_owned(), false).await.unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "unexpected error: {err}");

    // The in-browser edits survive and the document stays dirty.
    assert_eq!(service.current_content().await, "unsaved edits\n");
    assert!(service.is_dirty().await);

    // Once the directory exists, the retry succeeds with the same content.
    std::fs::create_dir_all(live_path.parent().unwrap()).unwrap();
    let flushed = service.flush_dirty().await.expect("flush");
    assert!(flushed);
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "unsaved edits\n");
    assert!(!service.is_dirty().await);
}

#[tokio::test]
async fn flush_dirty_is_a_noop_when_clean() {
    let tmp = TempDir::new("svc-flush-clean");
    let (service, live_path) = service_in(&tmp, "test.yaml");

    service.save("y: 2\n".to_owned(), false).await.expect("save");
    std::fs::write(&live_path, "sentinel\n").unwrap();

    let flushed = service.flush_dirty().await.expect("flush");
    assert!(!flushed);
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "sentinel\n");
}

#[tokio::test]
async fn list_backups_is_newest_first_and_truncated() {
    let tmp = TempDir::new("svc-list");
    let (service, _live_path) = service_in(&tmp, "test.yaml");

    let dir = service.backups().dir().to_path_buf();
    std::fs::create_dir_all(&dir).unwrap();
    for day in 1..=12 {
        let name = format!("test.yaml.202401{day:02}_120000");
        std::fs::write(dir.join(name), "x").unwrap();
    }
    std::fs::write(dir.join("other.yaml.20240101_120000"), "x").unwrap();

    let names = service.list_backups(10).await.expect("list");
    assert_eq!(names.len(), 10);
    assert_eq!(names[0], "test.yaml.20240112_120000");
    assert_eq!(names[9], "test.yaml.20240103_120000");
    assert!(names.iter().all(|name| name.starts_with("test.yaml.")));
}

#[tokio::test]
async fn restore_resets_in_memory_state() {
    let tmp = TempDir::new("svc-restore");
    let (service, live_path) = service_in(&tmp, "test.yaml");

    std::fs::write(&live_path, "a: 1\n").unwrap();
    let name = service
        .backups()
        .create_backup(&live_path)
        .expect("create backup")
        .expect("source exists");

    service.save("b: 3\n".to_owned(), false).await.expect("save");
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "b: 3\n");

    service.restore_backup(&name).await.expect("restore");
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "a: 1\n");
    assert_eq!(service.current_content().await, "a: 1\n");
    assert!(!service.is_dirty().await);

    // A later auto-save tick must not resurrect the pre-restore content.
    let flushed = service.flush_dirty().await.expect("flush");
    assert!(!flushed);
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "a: 1\n");
}

#[tokio::test]
async fn restore_of_unknown_backup_fails_without_touching_the_file() {
    let tmp = TempDir::new("svc-restore-missing");
    let (service, live_path) = service_in(&tmp, "test.yaml");
    service.save("keep\n".to_owned(), false).await.expect("save");

    let err = service.restore_backup("nonexistent.20000101_000000").await.unwrap_err();
    assert!(matches!(err, StoreError::BackupNotFound { .. }), "unexpected error: {err}");
    assert_eq!(std::fs::read_to_string(&live_path).unwrap(), "keep\n");
    assert_eq!(service.current_content().await, "keep\n");
}

#[tokio::test]
async fn racing_manual_and_auto_saves_never_tear() {
    let tmp = TempDir::new("svc-race");
    let (service, live_path) = service_in(&tmp, "test.yaml");

    let manual = {
        let service = service.clone();
        tokio::spawn(async move { service.save("X".repeat(4096), false).await })
    };
    let auto = {
        let service = service.clone();
        tokio::spawn(async move { service.save("Y".repeat(4096), true).await })
    };

    manual.await.unwrap().expect("manual save");
    auto.await.unwrap().expect("auto save");

    let on_disk = std::fs::read_to_string(&live_path).unwrap();
    assert!(
        on_disk == "X".repeat(4096) || on_disk == "Y".repeat(4096),
        "torn write: {} bytes, starts with {:?}",
        on_disk.len(),
        &on_disk[..1.min(on_disk.len())]
    );
    // Whichever writer acquired the critical section last owns both the file
    // and the in-memory state.
    assert_eq!(on_disk, service.current_content().await);
    assert!(!service.is_dirty().await);
}
