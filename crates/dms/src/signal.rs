//! Per-frame signal extraction: eye aspect ratio and distraction

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::MonitorConfig;
use crate::landmarks::{EyeRegion, LandmarkSet};

/// EAR reported when an eye region is degenerate (zero width).
///
/// Sits above every closure threshold so a bad frame reads as "open" and
/// never counts toward fatigue. Same value callers use when no face is found.
pub const DEGENERATE_EAR_SENTINEL: f32 = 0.8;

/// Horizontal eye widths below this are treated as degenerate
const MIN_EYE_WIDTH: f32 = 1e-6;

/// Eye aspect ratio of one eye.
///
/// `(|p1 - p5| + |p2 - p4|) / (2 * |p0 - p3|)`; roughly 0.25-0.35 when open,
/// approaching zero as the lids close.
pub fn eye_aspect_ratio(eye: &EyeRegion) -> f32 {
    let [p0, p1, p2, p3, p4, p5] = eye.points();

    let vertical_a = p1.distance(p5);
    let vertical_b = p2.distance(p4);
    let horizontal = p0.distance(p3);

    if !(horizontal >= MIN_EYE_WIDTH) {
        trace!("Degenerate eye region (width {}), using sentinel EAR", horizontal);
        return DEGENERATE_EAR_SENTINEL;
    }

    let ear = (vertical_a + vertical_b) / (2.0 * horizontal);
    if ear.is_finite() {
        ear
    } else {
        DEGENERATE_EAR_SENTINEL
    }
}

/// Signals derived from one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSignal {
    /// Mean EAR of both eyes
    pub ear: f32,
    pub distracted: bool,
}

/// Stateless converter from landmark geometry to scalar signals
#[derive(Debug, Clone, Copy)]
pub struct SignalExtractor {
    distraction_offset_ratio: f32,
}

impl SignalExtractor {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            distraction_offset_ratio: config.distraction_offset_ratio,
        }
    }

    /// Average EAR across both eyes
    pub fn frame_ear(&self, landmarks: &LandmarkSet) -> f32 {
        let left = eye_aspect_ratio(&landmarks.left_eye());
        let right = eye_aspect_ratio(&landmarks.right_eye());
        (left + right) / 2.0
    }

    /// True when the landmark centroid sits further than
    /// `offset_ratio * frame_width` from the image center.
    pub fn is_distracted(&self, landmarks: &LandmarkSet, frame_width: u32, frame_height: u32) -> bool {
        let centroid = landmarks.centroid();
        let center_x = (frame_width / 2) as f32;
        let center_y = (frame_height / 2) as f32;
        let offset = (centroid.x - center_x).hypot(centroid.y - center_y);
        let threshold = self.distraction_offset_ratio * frame_width as f32;

        offset > threshold
    }

    /// Compute all per-frame signals
    pub fn extract(&self, landmarks: &LandmarkSet, frame_width: u32, frame_height: u32) -> FrameSignal {
        FrameSignal {
            ear: self.frame_ear(landmarks),
            distracted: self.is_distracted(landmarks, frame_width, frame_height),
        }
    }
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}
