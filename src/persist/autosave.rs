// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::service::PersistenceService;

pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(10);

/// Spawns the background auto-save task.
///
/// Every `period` the task checks whether the document is dirty and flushes it
/// through the same save contract manual saves use. A failed flush is logged,
/// not retried immediately; the document stays dirty, so the next tick picks
/// it up again. The task stops when `true` arrives on the shutdown channel;
/// the final best-effort flush is the owner's responsibility.
pub fn spawn(
    service: PersistenceService,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick of a tokio interval fires immediately; consume it so
        // the first real check happens one period after startup.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("auto-save scheduler stopping");
                        return;
                    }
                    continue;
                }
            }

            match service.flush_dirty().await {
                Ok(true) => {
                    let path = service.document_path().await;
                    info!(path = ?path, "auto-saved");
                }
                Ok(false) => {}
                Err(err) => error!("auto-save error: {err}"),
            }
        }
    })
}
