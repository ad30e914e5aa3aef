//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { project_root } => {
                info!(project = %project_root, "Starting setup");
            }
            ProgressEvent::TargetsResolved { targets, inferred } => {
                info!(targets, inferred, "Build targets resolved");
            }
            ProgressEvent::GeneratorStarted { generator } => {
                debug!(generator = %generator, "Running generator");
            }
            ProgressEvent::GeneratorComplete {
                generator,
                fragments,
                duration,
            } => {
                debug!(
                    generator = %generator,
                    fragments,
                    duration_ms = duration.as_millis(),
                    "Generator complete"
                );
            }
            ProgressEvent::Completed {
                scripts,
                dependencies,
                total_time,
            } => {
                info!(
                    scripts,
                    dependencies,
                    total_time_ms = total_time.as_millis(),
                    "Setup complete"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Setup failed");
            }
        }
    }
}
