//! Driver Monitoring System (DMS)
//!
//! Per-frame driver state analysis from facial landmarks:
//! - Eye aspect ratio (EAR) from the 68-point eye contours
//! - Blink-debounced eye closure and rolling PERCLOS
//! - Distraction from face centroid offset
//! - Normal / Mild / Severe alert level

pub mod analysis;
pub mod config;
pub mod landmarks;
pub mod monitor;
pub mod signal;
pub mod state;

pub use analysis::FrameAnalysis;
pub use config::MonitorConfig;
pub use landmarks::{Eye, EyeRegion, LandmarkSet, Point};
pub use monitor::FatigueMonitor;
pub use signal::{eye_aspect_ratio, FrameSignal, SignalExtractor};
pub use state::{AlertLevel, MonitorState};

use alerting::{AlertSink, NullSink};
use thiserror::Error;
use tracing::{debug, info};

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },
}

/// Driver monitoring module: signal extraction, fatigue monitor and alert sink
pub struct DmsModule<S: AlertSink = Box<dyn AlertSink>> {
    extractor: SignalExtractor,
    monitor: FatigueMonitor,
    sink: S,
    face_absent_frames: u32,
}

impl DmsModule<NullSink> {
    /// Module whose severe alerts go nowhere
    pub fn without_alerts(config: MonitorConfig) -> Result<Self, DmsError> {
        Self::new(config, NullSink)
    }
}

impl<S: AlertSink> DmsModule<S> {
    /// Create a new DMS module with configuration
    pub fn new(config: MonitorConfig, sink: S) -> Result<Self, DmsError> {
        info!("DMS module using {} alert sink", sink.name());
        Ok(Self {
            extractor: SignalExtractor::new(&config),
            monitor: FatigueMonitor::new(config)?,
            sink,
            face_absent_frames: 0,
        })
    }

    /// Analyze a single frame for driver state.
    ///
    /// `None` means the detector found no face: the frame is reported as
    /// such and does not enter the PERCLOS window or the closure counter.
    pub fn analyze(
        &mut self,
        landmarks: Option<&LandmarkSet>,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<FrameAnalysis, DmsError> {
        let Some(landmarks) = landmarks else {
            self.face_absent_frames = self.face_absent_frames.saturating_add(1);
            debug!("No face ({} consecutive frames)", self.face_absent_frames);
            return Ok(FrameAnalysis::no_face(self.monitor.state()));
        };

        if frame_width == 0 || frame_height == 0 {
            return Err(DmsError::InvalidFrame {
                width: frame_width,
                height: frame_height,
            });
        }

        self.face_absent_frames = 0;
        let signal = self.extractor.extract(landmarks, frame_width, frame_height);
        Ok(self
            .monitor
            .update(signal.ear, signal.distracted, &mut self.sink))
    }

    pub fn monitor(&self) -> &FatigueMonitor {
        &self.monitor
    }

    /// Alert sink the monitor triggers
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consecutive frames without a face
    pub fn face_absent_frames(&self) -> u32 {
        self.face_absent_frames
    }

    /// Reset driver state (on driver change)
    pub fn reset_state(&mut self) {
        self.monitor.reset();
        self.face_absent_frames = 0;
    }
}
