// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Blocked — a browser editor for a single YAML, docker-compose, or
//! Dockerfile file with auto-save and timestamped backups.
//!
//! The crate keeps one file durable while edits arrive from two sources: the
//! browser's explicit saves and a periodic auto-save task. Both funnel
//! through [`persist::PersistenceService`].

pub mod check;
pub mod model;
pub mod persist;
pub mod store;
pub mod web;
