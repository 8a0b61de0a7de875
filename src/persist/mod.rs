// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The persistence engine: the save/restore facade and the auto-save task.
//!
//! Manual saves (HTTP) and the periodic auto-save both funnel through
//! [`PersistenceService`], which is what keeps the two write paths from
//! diverging.

pub mod autosave;
pub mod service;

pub use autosave::AUTO_SAVE_INTERVAL;
pub use service::{PersistenceService, DEFAULT_BACKUP_LIST_LIMIT};
