//! DMS configuration

use serde::{Deserialize, Serialize};

use crate::DmsError;

/// Fatigue monitor tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// EAR below this marks a frame as "eye closed"
    pub eye_ar_thresh: f32,

    /// Consecutive closed frames before the eye is declared closed
    pub eye_ar_consec_frames: u32,

    /// PERCLOS above this counts as fatigue (0-1)
    pub perclos_thresh: f32,

    /// Number of frames in the PERCLOS window
    pub history_window: usize,

    /// Face centroid offset, as a fraction of frame width, beyond which
    /// the driver is considered distracted
    pub distraction_offset_ratio: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            eye_ar_thresh: 0.25,
            eye_ar_consec_frames: 5,
            perclos_thresh: 0.35,
            history_window: 50,
            distraction_offset_ratio: 0.15,
        }
    }
}

impl MonitorConfig {
    /// Create strict config (earlier alarms)
    pub fn strict() -> Self {
        Self {
            eye_ar_consec_frames: 3,
            perclos_thresh: 0.25,
            distraction_offset_ratio: 0.10,
            ..Default::default()
        }
    }

    /// Create lenient config (fewer alarms)
    pub fn lenient() -> Self {
        Self {
            eye_ar_consec_frames: 8,
            perclos_thresh: 0.45,
            distraction_offset_ratio: 0.20,
            ..Default::default()
        }
    }

    /// Reject settings that would yield meaningless alert levels
    pub fn validate(&self) -> Result<(), DmsError> {
        if !(self.eye_ar_thresh.is_finite() && self.eye_ar_thresh > 0.0) {
            return Err(DmsError::Config(format!(
                "eye_ar_thresh must be positive, got {}",
                self.eye_ar_thresh
            )));
        }
        if self.eye_ar_consec_frames == 0 {
            return Err(DmsError::Config("eye_ar_consec_frames must be at least 1".into()));
        }
        if !(self.perclos_thresh > 0.0 && self.perclos_thresh < 1.0) {
            return Err(DmsError::Config(format!(
                "perclos_thresh must lie in (0, 1), got {}",
                self.perclos_thresh
            )));
        }
        if self.history_window == 0 {
            return Err(DmsError::Config("history_window must be at least 1".into()));
        }
        if !(self.distraction_offset_ratio.is_finite() && self.distraction_offset_ratio > 0.0) {
            return Err(DmsError::Config(format!(
                "distraction_offset_ratio must be positive, got {}",
                self.distraction_offset_ratio
            )));
        }
        Ok(())
    }
}
