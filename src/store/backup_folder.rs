// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Local;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    BackupNotFound {
        name: String,
    },
    /// A requested backup name contained a path separator, `..`, or was
    /// otherwise not a plain file name under the backup directory.
    InvalidBackupName {
        name: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::BackupNotFound { name } => write!(f, "backup not found: {name:?}"),
            Self::InvalidBackupName { name } => write!(f, "invalid backup name: {name:?}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::BackupNotFound { .. } => None,
            Self::InvalidBackupName { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable
    /// storage where possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// A directory of timestamped snapshots of the edited file.
///
/// Backup names follow `{base_name}.{YYYYMMDD_HHMMSS}`. Second resolution:
/// two snapshots of the same file within the same second collide and the
/// second silently overwrites the first. Backups are never evicted.
#[derive(Debug, Clone)]
pub struct BackupFolder {
    dir: PathBuf,
}

impl BackupFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshots `source` into the backup directory.
    ///
    /// Returns the created backup name, or `None` when `source` does not exist
    /// yet (nothing to snapshot). The source modification time is carried over
    /// to the snapshot on a best-effort basis.
    pub fn create_backup(&self, source: &Path) -> Result<Option<String>, StoreError> {
        let metadata = match fs::metadata(source) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source_err) => {
                return Err(StoreError::Io {
                    path: source.to_path_buf(),
                    source: source_err,
                })
            }
        };

        fs::create_dir_all(&self.dir).map_err(|source_err| StoreError::Io {
            path: self.dir.clone(),
            source: source_err,
        })?;

        let base_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!("{base_name}.{}", backup_timestamp());
        let backup_path = self.dir.join(&name);

        fs::copy(source, &backup_path).map_err(|source_err| StoreError::Io {
            path: backup_path.clone(),
            source: source_err,
        })?;

        if let Ok(mtime) = metadata.modified() {
            if let Ok(file) = fs::OpenOptions::new().write(true).open(&backup_path) {
                let _ = file.set_modified(mtime);
            }
        }

        Ok(Some(name))
    }

    /// File names under the backup directory starting with `prefix`.
    ///
    /// A missing backup directory is not an error; it simply holds no backups.
    pub fn list_matching(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(prefix) {
                names.push(name);
            }
        }

        Ok(names)
    }

    /// Copies the named backup's bytes over `dest` via an atomic replace and
    /// returns the restored bytes.
    ///
    /// A partial failure never truncates `dest`; the destination either keeps
    /// its old bytes or holds the full backup content.
    pub fn restore(
        &self,
        name: &str,
        dest: &Path,
        durability: WriteDurability,
    ) -> Result<Vec<u8>, StoreError> {
        validate_backup_name(name)?;

        let backup_path = self.dir.join(name);
        let contents = match fs::read(&backup_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::BackupNotFound {
                    name: name.to_owned(),
                })
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: backup_path,
                    source,
                })
            }
        };

        write_atomic(dest, &contents, durability)?;
        Ok(contents)
    }
}

fn backup_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn validate_backup_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidBackupName {
            name: name.to_owned(),
        })
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Writes `contents` to `path` via a temp file in the same directory plus an
/// atomic rename. Readers never observe a torn or partially written file.
pub fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".blocked.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
