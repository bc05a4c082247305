//! Driver Monitor Pipeline
//!
//! Host side of the monitoring core: loads layered configuration, installs
//! logging, feeds recorded landmark frames through [`dms::DmsModule`] and
//! reports per-frame results plus a session summary.

pub mod logging;
pub mod replay;
pub mod settings;
pub mod summary;

pub use logging::init_logging;
pub use replay::{replay, FrameRecord};
pub use settings::{LogSettings, Settings};
pub use summary::{FrameRateCounter, SessionSummary};
