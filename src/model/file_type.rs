// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::Path;

/// What kind of file is being edited, detected from the base filename.
///
/// Drives the editor banner and which Docker check command applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    DockerCompose,
    Dockerfile,
    Yaml,
}

impl FileType {
    /// `docker-compose` wins over `dockerfile`; anything else is plain YAML.
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if name.contains("docker-compose") || name.contains("compose.y") {
            Self::DockerCompose
        } else if name.contains("dockerfile") {
            Self::Dockerfile
        } else {
            Self::Yaml
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DockerCompose => "docker-compose",
            Self::Dockerfile => "dockerfile",
            Self::Yaml => "yaml",
        }
    }

    pub fn is_docker(self) -> bool {
        matches!(self, Self::DockerCompose | Self::Dockerfile)
    }
}
