// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blocked-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blocked and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Blocked CLI entrypoint.
//!
//! Serves the editor UI at `http://127.0.0.1:<port>/` for the given file,
//! snapshots the file into the backup directory before the first edit, and
//! runs the auto-save task until shutdown.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, Level};

use blocked::model::Document;
use blocked::persist::{self, PersistenceService};
use blocked::store::{BackupFolder, WriteDurability};
use blocked::web;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BACKUP_DIR: &str = ".blocked";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <file> [--host <host>] [--port <port>] [--backup-dir <dir>] [--durable-writes] [--auto-save-secs <secs>]\n\nEdits <file> (YAML, docker-compose, or Dockerfile) through a browser UI at\n`http://127.0.0.1:<port>/` (default port {DEFAULT_PORT}; 0 = ephemeral).\n\nA timestamped backup of <file> is taken into the backup directory (default\n`{DEFAULT_BACKUP_DIR}/`) before the first edit. While the server runs, unsaved editor\ncontent is flushed to disk every --auto-save-secs seconds (default 10).\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    file: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    backup_dir: Option<String>,
    durable_writes: bool,
    auto_save_secs: Option<u64>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--host" => {
                if options.host.is_some() {
                    return Err(());
                }
                let host = args.next().ok_or(())?;
                if host.is_empty() {
                    return Err(());
                }
                options.host = Some(host);
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--backup-dir" => {
                if options.backup_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.backup_dir = Some(dir);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--auto-save-secs" => {
                if options.auto_save_secs.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let secs: u64 = raw.parse().map_err(|_| ())?;
                if secs == 0 {
                    return Err(());
                }
                options.auto_save_secs = Some(secs);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(arg);
            }
        }
    }

    if options.file.is_none() {
        return Err(());
    }

    Ok(options)
}

fn absolute_path(raw: &str) -> std::io::Result<PathBuf> {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn init_tracing() {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info,axum=info".to_owned());
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(err) => {
                    error!("cannot install SIGTERM handler: {err}");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "blocked".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        let file = options.file.expect("parse_options requires a file");
        let live_path = absolute_path(&file)?;
        let host = options.host.unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = options.port.unwrap_or(DEFAULT_PORT);
        let backup_dir = options.backup_dir.unwrap_or_else(|| DEFAULT_BACKUP_DIR.to_owned());
        let auto_save_period = options
            .auto_save_secs
            .map(Duration::from_secs)
            .unwrap_or(persist::AUTO_SAVE_INTERVAL);
        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };

        // Pre-edit snapshot, before any editor content can reach the file.
        let backups = BackupFolder::new(&backup_dir);
        match backups.create_backup(&live_path)? {
            Some(name) => info!(backup = %name, dir = %backup_dir, "backup created"),
            None => info!(path = ?live_path, "no existing file to back up"),
        }

        let document = Document::load(&live_path)?;
        let service = PersistenceService::new(document, backups).with_durability(durability);

        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

        runtime.block_on(async move {
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let scheduler = persist::autosave::spawn(service.clone(), auto_save_period, shutdown_rx);

            let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
            let local_addr = listener.local_addr()?;
            info!(path = ?live_path, "editing");
            info!("serving editor at http://127.0.0.1:{}/", local_addr.port());
            info!("press Ctrl+C to save and exit");

            let router = web::router(service.clone());
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            // Stop the scheduler before the final flush so the two cannot
            // interleave.
            let _ = shutdown_tx.send(true);
            let _ = scheduler.await;

            match service.flush_dirty().await {
                Ok(true) => info!("final flush wrote pending edits"),
                Ok(false) => {}
                Err(err) => error!("final flush failed: {err}"),
            }

            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("blocked: {err}");
        std::process::exit(1);
    }
}
