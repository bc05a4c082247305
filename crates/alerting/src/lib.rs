//! Alerting System
//!
//! Alert sinks observed by the fatigue monitor, sink selection from
//! configuration, and a dispatcher that applies re-trigger cooldowns.

mod manager;
mod sink;

pub use manager::{sink_from_config, AlertConfig, AlertDispatcher, AlertStats};
pub use sink::{AudioSink, BeepFallback, CommandPlayback, NullSink, Playback};

use std::path::PathBuf;
use thiserror::Error;

/// Something that reacts to a severe alert.
///
/// `trigger` may be called on every frame while the alert persists;
/// implementations decide whether to start new output.
pub trait AlertSink {
    fn trigger(&mut self);

    /// Short name for logs
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<S: AlertSink + ?Sized> AlertSink for Box<S> {
    fn trigger(&mut self) {
        (**self).trigger()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Alerting error types
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Alarm sound not found: {}", .0.display())]
    SoundNotFound(PathBuf),

    #[error("Failed to start player: {0}")]
    Playback(#[from] std::io::Error),

    #[error("Player failed: {0}")]
    PlayerFailed(String),
}
