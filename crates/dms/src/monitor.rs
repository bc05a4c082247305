//! Temporal fatigue monitor: PERCLOS window, closure debounce, alert level

use alerting::AlertSink;
use ring_buffer::RingBuffer;
use tracing::{debug, info, trace, warn};

use crate::analysis::{compose_status, FrameAnalysis};
use crate::config::MonitorConfig;
use crate::state::{AlertLevel, MonitorState};
use crate::DmsError;

/// Stateful per-session fatigue monitor.
///
/// Single writer: the host calls [`FatigueMonitor::update`] once per frame
/// that has landmarks, from one thread.
#[derive(Debug, Clone)]
pub struct FatigueMonitor {
    config: MonitorConfig,
    /// Per-frame "EAR below threshold" flags, oldest first
    history: RingBuffer<bool>,
    /// Number of `true` flags currently in `history`
    closed_in_window: usize,
    state: MonitorState,
}

impl FatigueMonitor {
    /// Create a monitor, refusing configurations that fail validation
    pub fn new(config: MonitorConfig) -> Result<Self, DmsError> {
        config.validate()?;
        let history = RingBuffer::new(config.history_window)
            .map_err(|e| DmsError::Config(e.to_string()))?;

        info!(
            "Fatigue monitor: EAR < {} for {} frames, PERCLOS > {} over {} frames",
            config.eye_ar_thresh,
            config.eye_ar_consec_frames,
            config.perclos_thresh,
            config.history_window
        );

        Ok(Self {
            config,
            history,
            closed_in_window: 0,
            state: MonitorState::default(),
        })
    }

    /// Feed one frame's EAR and distraction flag.
    ///
    /// Fires `sink` on every frame that evaluates to Severe; sinks are
    /// responsible for not overlapping their own output.
    pub fn update<S>(&mut self, ear: f32, distracted: bool, sink: &mut S) -> FrameAnalysis
    where
        S: AlertSink + ?Sized,
    {
        let below_threshold = ear < self.config.eye_ar_thresh;

        self.record_sample(below_threshold);
        self.debounce(below_threshold);
        self.state.distracted = distracted;

        let previous = self.state.alert_level;
        self.state.alert_level =
            AlertLevel::evaluate(self.state.eye_closed, self.perclos_high(), distracted);

        if self.state.alert_level != previous {
            if self.state.alert_level == AlertLevel::Severe {
                warn!(
                    "Severe fatigue: eyes closed {} frames, PERCLOS {:.2}",
                    self.state.consecutive_closed_frames, self.state.perclos
                );
            } else {
                debug!("Alert level {} -> {}", previous.as_str(), self.state.alert_level.as_str());
            }
        }

        let alert_triggered = self.state.alert_level == AlertLevel::Severe;
        if alert_triggered {
            sink.trigger();
        }

        trace!(
            ear,
            perclos = self.state.perclos,
            closed_frames = self.state.consecutive_closed_frames,
            "frame updated"
        );

        FrameAnalysis {
            face_detected: true,
            alert_level: self.state.alert_level,
            ear: Some(ear),
            perclos: self.state.perclos,
            status: self.status_text(),
            distracted,
            eye_closed: self.state.eye_closed,
            consecutive_closed_frames: self.state.consecutive_closed_frames,
            alert_triggered,
        }
    }

    /// Status line for the current state
    pub fn status_text(&self) -> String {
        compose_status(self.state.eye_closed || self.perclos_high(), self.state.distracted)
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn alert_level(&self) -> AlertLevel {
        self.state.alert_level
    }

    pub fn perclos(&self) -> f32 {
        self.state.perclos
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Number of frames currently in the PERCLOS window
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Reset state (on driver change)
    pub fn reset(&mut self) {
        self.history.clear();
        self.closed_in_window = 0;
        self.state.reset();
    }

    /// Push one flag; PERCLOS is only recomputed once the window is full
    fn record_sample(&mut self, closed: bool) {
        if closed {
            self.closed_in_window += 1;
        }
        if let Some(true) = self.history.push(closed) {
            self.closed_in_window -= 1;
        }

        if self.history.is_full() {
            self.state.perclos = self.closed_in_window as f32 / self.history.capacity() as f32;
        }
    }

    /// Slow to declare closed, instant to declare open
    fn debounce(&mut self, below_threshold: bool) {
        if below_threshold {
            self.state.consecutive_closed_frames =
                self.state.consecutive_closed_frames.saturating_add(1);
            if self.state.consecutive_closed_frames >= self.config.eye_ar_consec_frames {
                self.state.eye_closed = true;
            }
        } else {
            self.state.consecutive_closed_frames = 0;
            self.state.eye_closed = false;
        }
    }

    fn perclos_high(&self) -> bool {
        self.state.perclos > self.config.perclos_thresh
    }
}
