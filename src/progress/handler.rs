//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a setup run progresses
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Setup started
    Started { project_root: String },

    /// Build targets resolved, explicitly or by layout classification
    TargetsResolved { targets: usize, inferred: bool },

    /// Generator started
    GeneratorStarted { generator: String },

    /// Generator finished writing its fragments
    GeneratorComplete {
        generator: String,
        fragments: usize,
        duration: Duration,
    },

    /// Plan merged and returned
    Completed {
        scripts: usize,
        dependencies: usize,
        total_time: Duration,
    },

    /// Setup failed
    Failed { error: String },
}

/// Trait for handling progress events during setup
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}
