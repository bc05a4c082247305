//! Session statistics and processing rate

use alerting::AlertStats;
use dms::{AlertLevel, FrameAnalysis};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

/// Measures frames per second over one-second windows
#[derive(Debug, Clone)]
pub struct FrameRateCounter {
    window_start: Instant,
    frames: u32,
    fps: f64,
}

impl FrameRateCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            window_start: start,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count a frame; returns the new rate when a window closes
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed <= Self::WINDOW {
            return None;
        }

        self.fps = self.frames as f64 / elapsed.as_secs_f64();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }

    /// Rate from the last completed window
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FrameRateCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters for one replay session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSummary {
    pub frames: u64,
    pub no_face_frames: u64,
    pub normal_frames: u64,
    pub mild_frames: u64,
    pub severe_frames: u64,
    /// Separate runs of Severe frames
    pub severe_episodes: u64,
    pub alert_triggers: u64,
    /// Alerts that reached the sink after cooldown
    pub alerts_delivered: u64,
    /// Alerts dropped by the re-trigger cooldown
    pub alerts_suppressed: u64,
    /// Input lines that did not parse
    pub malformed_lines: u64,
    /// Frames the module refused (e.g. zero dimensions)
    pub rejected_frames: u64,
    pub fps: f64,
    #[serde(skip)]
    last_level: AlertLevel,
}

impl SessionSummary {
    /// Fold one frame's output into the counters
    pub fn record(&mut self, analysis: &FrameAnalysis) {
        self.frames += 1;
        if !analysis.face_detected {
            self.no_face_frames += 1;
            return;
        }

        match analysis.alert_level {
            AlertLevel::Normal => self.normal_frames += 1,
            AlertLevel::Mild => self.mild_frames += 1,
            AlertLevel::Severe => {
                self.severe_frames += 1;
                if self.last_level != AlertLevel::Severe {
                    self.severe_episodes += 1;
                }
            }
        }
        if analysis.alert_triggered {
            self.alert_triggers += 1;
        }
        self.last_level = analysis.alert_level;
    }

    /// Take delivery counts from the alert dispatcher
    pub fn set_alert_stats(&mut self, stats: AlertStats) {
        self.alerts_delivered = stats.delivered;
        self.alerts_suppressed = stats.suppressed;
    }

    pub fn log(&self) {
        info!(
            frames = self.frames,
            no_face = self.no_face_frames,
            normal = self.normal_frames,
            mild = self.mild_frames,
            severe = self.severe_frames,
            episodes = self.severe_episodes,
            alerts = self.alert_triggers,
            delivered = self.alerts_delivered,
            suppressed = self.alerts_suppressed,
            skipped = self.malformed_lines + self.rejected_frames,
            "Session finished at {:.1} fps",
            self.fps
        );
    }
}
