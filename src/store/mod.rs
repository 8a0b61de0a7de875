// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for the edited file and its backups on disk.
//!
//! The store module owns the timestamped backup directory (`.blocked/` by
//! default) and the atomic write helpers used for every live-file write.

pub mod backup_folder;

pub use backup_folder::{write_atomic, BackupFolder, StoreError, WriteDurability};
