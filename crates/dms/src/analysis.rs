//! DMS analysis results and status text

use serde::{Deserialize, Serialize};

use crate::state::{AlertLevel, MonitorState};

pub const STATUS_NORMAL: &str = "Normal";
pub const STATUS_FATIGUE: &str = "Fatigue Driving";
pub const STATUS_DISTRACTED: &str = "Distracted";
pub const STATUS_NO_FACE: &str = "No Face Detected";

/// Separator between status fragments
const STATUS_SEPARATOR: &str = " ";

/// Human-readable status for the current flags
pub fn compose_status(fatigued: bool, distracted: bool) -> String {
    let mut parts = Vec::with_capacity(2);
    if fatigued {
        parts.push(STATUS_FATIGUE);
    }
    if distracted {
        parts.push(STATUS_DISTRACTED);
    }

    if parts.is_empty() {
        STATUS_NORMAL.to_string()
    } else {
        parts.join(STATUS_SEPARATOR)
    }
}

/// Per-frame monitor output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Whether landmarks were supplied for this frame
    pub face_detected: bool,

    pub alert_level: AlertLevel,

    /// Mean eye aspect ratio (absent without a face)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f32>,

    pub perclos: f32,

    pub status: String,

    pub distracted: bool,

    pub eye_closed: bool,

    pub consecutive_closed_frames: u32,

    /// Alert sink was triggered this frame
    pub alert_triggered: bool,
}

impl FrameAnalysis {
    /// Output for a frame without landmarks. Reports the monitor state
    /// held across the gap; nothing is triggered.
    pub fn no_face(state: &MonitorState) -> Self {
        Self {
            face_detected: false,
            alert_level: state.alert_level,
            ear: None,
            perclos: state.perclos,
            status: STATUS_NO_FACE.to_string(),
            distracted: state.distracted,
            eye_closed: state.eye_closed,
            consecutive_closed_frames: state.consecutive_closed_frames,
            alert_triggered: false,
        }
    }
}
