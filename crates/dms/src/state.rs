//! Driver state tracking

use serde::{Deserialize, Serialize};

/// Alert level, recomputed every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    #[default]
    Normal,
    Mild,
    Severe,
}

impl AlertLevel {
    /// Level for the current flags. Severe needs both a closed eye and a
    /// high PERCLOS; any single condition is Mild.
    pub fn evaluate(eye_closed: bool, perclos_high: bool, distracted: bool) -> Self {
        if eye_closed && perclos_high {
            AlertLevel::Severe
        } else if eye_closed || perclos_high || distracted {
            AlertLevel::Mild
        } else {
            AlertLevel::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Normal => "normal",
            AlertLevel::Mild => "mild",
            AlertLevel::Severe => "severe",
        }
    }

    /// Overlay colour for the status line (RGB): green, orange, red
    pub fn overlay_rgb(&self) -> [u8; 3] {
        match self {
            AlertLevel::Normal => [0, 255, 0],
            AlertLevel::Mild => [255, 165, 0],
            AlertLevel::Severe => [255, 0, 0],
        }
    }
}

/// Monitor state for one driver session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorState {
    /// Eye closure accepted after debounce
    pub eye_closed: bool,

    /// Current run of frames with EAR below threshold
    pub consecutive_closed_frames: u32,

    /// Fraction of closed frames in the last full window
    pub perclos: f32,

    pub alert_level: AlertLevel,

    pub distracted: bool,
}

impl MonitorState {
    /// Reset state (on driver change)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
