use std::fs;
use std::path::{Path, PathBuf};

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use outpost::game::GamePlugin;

const LOG_DIR: &str = "logs";
const LOG_PREFIX: &str = "outpost";
const LOGS_TO_KEEP: usize = 25;
const DEFAULT_FILTER: &str = "wgpu=error,bevy_render=info,bevy_ecs=info,outpost=info";

/// Install stdout logging plus, when the log directory is usable, a
/// per-run file. Returns the file path if one was opened.
fn setup_logging() -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);

    let log_dir = PathBuf::from(LOG_DIR);
    if let Err(e) = fs::create_dir_all(&log_dir) {
        tracing_subscriber::registry().with(filter).with(stdout_layer).init();
        warn!("Cannot create {}: {}; logging to stdout only", log_dir.display(), e);
        return None;
    }

    // Make room for this run's file.
    prune_old_logs(&log_dir, LOGS_TO_KEEP.saturating_sub(1));

    let file_name = format!("{}_{}.log", LOG_PREFIX, chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &file_name);
    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Some(log_dir.join(file_name))
}

fn is_run_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(LOG_PREFIX) && name.ends_with(".log"))
}

/// Delete the oldest run logs until at most `keep` remain.
fn prune_old_logs(log_dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|entry| is_run_log(&entry.path()))
        .collect();
    if logs.len() <= keep {
        return;
    }

    // Oldest first
    logs.sort_by_key(|entry| entry.metadata().and_then(|m| m.modified()).ok());
    for entry in &logs[..logs.len() - keep] {
        let _ = fs::remove_file(entry.path());
    }
}

fn main() {
    match setup_logging() {
        Some(path) => info!("Logging to {}", path.display()),
        None => info!("File logging disabled"),
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Outpost".into(),
                resolution: WindowResolution::new(1280, 720),
                resizable: true,
                ..default()
            }),
            ..default()
        }).build().disable::<LogPlugin>()) // Logging is set up above
        .add_plugins(GamePlugin)
        .run();
}
