// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::check::run_docker_check;
use crate::persist::{PersistenceService, DEFAULT_BACKUP_LIST_LIMIT};

use super::types::{
    CheckDockerResponse, ListBackupsResponse, RestoreBackupRequest, SaveRequest, SaveResponse,
};

const EDITOR_TEMPLATE: &str = include_str!("assets/editor.html");

pub fn router(service: PersistenceService) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/save", post(save))
        .route("/list-backups", get(list_backups))
        .route("/restore-backup", post(restore_backup))
        .route("/test-docker", post(test_docker))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(service)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Renders the editor page seeded with the current in-memory content.
async fn index(State(service): State<PersistenceService>) -> Html<String> {
    let file_type = service.file_type().await;
    let docker_button_style = if file_type.is_docker() { "" } else { "display:none;" };

    let page = EDITOR_TEMPLATE
        .replace("{{filename}}", &escape_html(&service.base_name().await))
        .replace("{{file_type}}", file_type.as_str())
        .replace("{{docker_button_style}}", docker_button_style)
        .replace("{{initial_content}}", &escape_html(&service.current_content().await));

    Html(page)
}

async fn save(
    State(service): State<PersistenceService>,
    Json(request): Json<SaveRequest>,
) -> Json<SaveResponse> {
    match service.save(request.content, request.auto_save).await {
        Ok(()) => Json(SaveResponse::ok()),
        Err(err) => {
            error!("save failed: {err}");
            Json(SaveResponse::err(err.to_string()))
        }
    }
}

/// Errors degrade to an empty list plus an error string; the editor's backup
/// dialog treats both the same way.
async fn list_backups(State(service): State<PersistenceService>) -> Json<ListBackupsResponse> {
    match service.list_backups(DEFAULT_BACKUP_LIST_LIMIT).await {
        Ok(backups) => Json(ListBackupsResponse { backups, error: None }),
        Err(err) => {
            error!("list backups failed: {err}");
            Json(ListBackupsResponse {
                backups: Vec::new(),
                error: Some(err.to_string()),
            })
        }
    }
}

async fn restore_backup(
    State(service): State<PersistenceService>,
    Json(request): Json<RestoreBackupRequest>,
) -> Json<SaveResponse> {
    match service.restore_backup(&request.backup).await {
        Ok(()) => {
            info!(backup = %request.backup, "backup restored");
            Json(SaveResponse::ok())
        }
        Err(err) => {
            error!(backup = %request.backup, "restore failed: {err}");
            Json(SaveResponse::err(err.to_string()))
        }
    }
}

async fn test_docker(State(service): State<PersistenceService>) -> Json<CheckDockerResponse> {
    let path = service.document_path().await;
    let file_type = service.file_type().await;

    match run_docker_check(&path, file_type).await {
        Ok(output) => Json(CheckDockerResponse {
            success: true,
            output: Some(output),
            error: None,
        }),
        Err(err) => Json(CheckDockerResponse {
            success: false,
            output: None,
            error: Some(err.to_string()),
        }),
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
