//! JSON-lines frame replay

use alerting::AlertSink;
use anyhow::Context;
use dms::{DmsModule, FrameAnalysis, LandmarkSet};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, warn};

use crate::summary::{FrameRateCounter, SessionSummary};

/// One recorded frame: dimensions plus the detector's landmarks
/// (`null` when no face was found)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub landmarks: Option<LandmarkSet>,
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    frame: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp_ms: Option<u64>,
    #[serde(flatten)]
    analysis: &'a FrameAnalysis,
}

/// Run every record in `input` through `module`, writing one JSON result
/// per frame to `output`. Blank lines and `#` comments are ignored;
/// malformed lines are logged and skipped.
pub fn replay<R, W, S>(input: R, mut output: W, module: &mut DmsModule<S>) -> anyhow::Result<SessionSummary>
where
    R: BufRead,
    W: Write,
    S: AlertSink,
{
    let mut summary = SessionSummary::default();
    let mut rate = FrameRateCounter::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("reading input line {}", line_no))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record: FrameRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no, e);
                summary.malformed_lines += 1;
                continue;
            }
        };

        let analysis = match module.analyze(record.landmarks.as_ref(), record.width, record.height) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Skipping frame on line {}: {}", line_no, e);
                summary.rejected_frames += 1;
                continue;
            }
        };

        summary.record(&analysis);
        if let Some(fps) = rate.tick(Instant::now()) {
            debug!("Processing at {:.1} fps", fps);
        }

        let out = FrameOutput {
            frame: summary.frames,
            timestamp_ms: record.timestamp_ms,
            analysis: &analysis,
        };
        serde_json::to_writer(&mut output, &out).context("writing result")?;
        output.write_all(b"\n").context("writing result")?;
    }

    output.flush().context("flushing output")?;
    summary.fps = rate.fps();
    Ok(summary)
}
