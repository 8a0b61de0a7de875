// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The browser-facing surface: editor page plus JSON endpoints.
//!
//! Handlers are thin; every persistence decision lives in
//! [`crate::persist::PersistenceService`].

pub mod server;
pub mod types;

pub use server::router;
