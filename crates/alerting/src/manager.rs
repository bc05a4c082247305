//! Alert dispatch and sink selection

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::sink::{AudioSink, BeepFallback, CommandPlayback, NullSink};
use crate::AlertSink;

/// Alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Whether severe alerts produce any output
    pub enabled: bool,
    /// Alarm sound file; terminal bell is used when absent or missing
    pub sound_path: Option<PathBuf>,
    /// External program used to play the alarm
    pub player_command: String,
    /// Extra arguments placed before the sound path
    pub player_args: Vec<String>,
    /// Minimum gap between delivered alerts (0 = deliver every trigger)
    pub retrigger_cooldown_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_path: Some(PathBuf::from("alarm.wav")),
            player_command: "aplay".to_string(),
            player_args: vec!["-q".to_string()],
            retrigger_cooldown_ms: 0,
        }
    }
}

/// Pick the sink for a configuration: alarm sound if the file exists,
/// terminal bell otherwise, nothing when alerts are disabled.
pub fn sink_from_config(config: &AlertConfig) -> Box<dyn AlertSink> {
    if !config.enabled {
        info!("Alerts disabled");
        return Box::new(NullSink);
    }

    let Some(path) = &config.sound_path else {
        info!("No alarm sound configured, using terminal bell");
        return Box::new(BeepFallback::stderr());
    };

    match CommandPlayback::new(&config.player_command, config.player_args.clone(), path) {
        Ok(playback) => {
            info!("Alarm sound {} via {}", path.display(), config.player_command);
            Box::new(AudioSink::new(playback))
        }
        Err(e) => {
            warn!("{}; falling back to terminal bell", e);
            Box::new(BeepFallback::stderr())
        }
    }
}

/// Dispatcher counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertStats {
    /// Triggers received
    pub triggered: u64,
    /// Triggers passed on to the inner sink
    pub delivered: u64,
    /// Triggers dropped by the cooldown
    pub suppressed: u64,
}

/// Wraps a sink with an optional re-trigger cooldown and counters
pub struct AlertDispatcher {
    sink: Box<dyn AlertSink>,
    cooldown: Duration,
    last_delivered: Option<Instant>,
    stats: AlertStats,
}

impl AlertDispatcher {
    /// Create a new alert dispatcher
    pub fn new(sink: Box<dyn AlertSink>, config: &AlertConfig) -> Self {
        Self {
            sink,
            cooldown: Duration::from_millis(config.retrigger_cooldown_ms),
            last_delivered: None,
            stats: AlertStats::default(),
        }
    }

    /// Dispatcher built from configuration via [`sink_from_config`]
    pub fn from_config(config: &AlertConfig) -> Self {
        Self::new(sink_from_config(config), config)
    }

    /// Check if a trigger at `now` should reach the sink
    fn should_deliver(&self, now: Instant) -> bool {
        match self.last_delivered {
            Some(last) if !self.cooldown.is_zero() => now.duration_since(last) >= self.cooldown,
            _ => true,
        }
    }

    /// Handle a trigger at an explicit instant
    pub fn trigger_at(&mut self, now: Instant) {
        self.stats.triggered += 1;

        if !self.should_deliver(now) {
            debug!("Alert suppressed: in cooldown period");
            self.stats.suppressed += 1;
            return;
        }

        self.sink.trigger();
        self.last_delivered = Some(now);
        self.stats.delivered += 1;
    }

    pub fn stats(&self) -> AlertStats {
        self.stats
    }
}

impl AlertSink for AlertDispatcher {
    fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    fn name(&self) -> &'static str {
        self.sink.name()
    }
}
