// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pass-through Docker validation for the edited file.
//!
//! Compose files run through `docker compose config` (with a `docker-compose`
//! fallback for older installs); Dockerfiles run a quiet `docker build`.
//! Deeper content validation stays delegated to these external tools.

use std::fmt;
use std::io;
use std::path::Path;

use tokio::process::Command;

use crate::model::FileType;

/// Successful check output is truncated to this many characters before it is
/// sent to the browser.
const OUTPUT_LIMIT: usize = 500;

#[derive(Debug)]
pub enum CheckError {
    /// The check command could not be spawned (Docker not installed, not on
    /// PATH, ...).
    Spawn { command: String, source: io::Error },
    /// The check command ran and reported a problem with the file.
    Failed { stderr: String },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { command, source } => {
                write!(f, "cannot run {command:?}: {source}")
            }
            Self::Failed { stderr } => write!(f, "{stderr}"),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::Failed { .. } => None,
        }
    }
}

/// Runs the Docker check appropriate for `file_type` against `path`.
///
/// Returns the (truncated) stdout of the successful command.
pub async fn run_docker_check(path: &Path, file_type: FileType) -> Result<String, CheckError> {
    let attempts: Vec<Vec<String>> = match file_type {
        FileType::DockerCompose | FileType::Yaml => vec![
            command_line(&["docker", "compose", "-f"], path, &["config"]),
            command_line(&["docker-compose", "-f"], path, &["config"]),
        ],
        FileType::Dockerfile => vec![command_line(&["docker", "build", "-q", "-f"], path, &["."])],
    };

    let mut last_err = None;
    for attempt in attempts {
        match run_attempt(&attempt).await {
            Ok(output) => return Ok(truncate_output(&output)),
            Err(err) => last_err = Some(err),
        }
    }

    Err(last_err.unwrap_or(CheckError::Failed {
        stderr: "no check command available".to_owned(),
    }))
}

fn command_line(prefix: &[&str], path: &Path, suffix: &[&str]) -> Vec<String> {
    let mut line: Vec<String> = prefix.iter().map(|part| (*part).to_owned()).collect();
    line.push(path.to_string_lossy().into_owned());
    line.extend(suffix.iter().map(|part| (*part).to_owned()));
    line
}

async fn run_attempt(line: &[String]) -> Result<String, CheckError> {
    let output = Command::new(&line[0])
        .args(&line[1..])
        .output()
        .await
        .map_err(|source| CheckError::Spawn {
            command: line.join(" "),
            source,
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(CheckError::Failed {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn truncate_output(output: &str) -> String {
    output.chars().take(OUTPUT_LIMIT).collect()
}
