// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory model: the edited document and its detected file type.

pub mod document;
pub mod file_type;

pub use document::Document;
pub use file_type::FileType;
