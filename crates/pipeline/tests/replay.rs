use dms::landmarks::{LANDMARK_COUNT, LEFT_EYE, RIGHT_EYE};
use dms::{DmsModule, MonitorConfig, Point};
use pipeline::{replay, FrameRecord};
use serde_json::Value;

/// Face centred at (320, 240) with both eyes at `ear`
fn record(ear: f32) -> FrameRecord {
    let mut points = vec![Point::new(320.0, 240.0); LANDMARK_COUNT];
    for (range, cx) in [(RIGHT_EYE, 300.0), (LEFT_EYE, 340.0)] {
        let h = ear * 5.0;
        points[range].copy_from_slice(&[
            Point::new(cx - 5.0, 240.0),
            Point::new(cx - 2.0, 240.0 - h),
            Point::new(cx + 2.0, 240.0 - h),
            Point::new(cx + 5.0, 240.0),
            Point::new(cx + 2.0, 240.0 + h),
            Point::new(cx - 2.0, 240.0 + h),
        ]);
    }
    FrameRecord {
        timestamp_ms: None,
        width: 640,
        height: 480,
        landmarks: Some(dms::LandmarkSet::new(points).unwrap()),
    }
}

fn run(input: &str) -> (pipeline::SessionSummary, Vec<Value>) {
    let mut module = DmsModule::without_alerts(MonitorConfig::default()).unwrap();
    let mut out = Vec::new();
    let summary = replay(input.as_bytes(), &mut out, &mut module).unwrap();
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (summary, lines)
}

#[test]
fn drowsy_session_reaches_severe() {
    let line = serde_json::to_string(&record(0.15)).unwrap();
    let input = vec![line; 55].join("\n");

    let (summary, outputs) = run(&input);

    assert_eq!(outputs.len(), 55);
    assert_eq!(summary.frames, 55);
    assert_eq!(summary.severe_frames, 6);
    assert_eq!(summary.severe_episodes, 1);
    assert_eq!(summary.alert_triggers, 6);

    let last = outputs.last().unwrap();
    assert_eq!(last["frame"], 55);
    assert_eq!(last["alert_level"], "severe");
    assert_eq!(last["status"], "Fatigue Driving");
    assert_eq!(last["perclos"], 1.0);
}

#[test]
fn gaps_comments_and_bad_lines_are_skipped() {
    let face = serde_json::to_string(&record(0.3)).unwrap();
    let input = format!(
        "# recorded session\n{face}\n\n{{\"width\":640,\"height\":480,\"landmarks\":null,\"timestamp_ms\":40}}\nnot json\n{{\"width\":0,\"height\":480,\"landmarks\":{landmarks}}}\n{face}\n",
        face = face,
        landmarks = serde_json::to_string(record(0.3).landmarks.as_ref().unwrap()).unwrap(),
    );

    let (summary, outputs) = run(&input);

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.no_face_frames, 1);
    assert_eq!(summary.malformed_lines, 1);
    assert_eq!(summary.rejected_frames, 1);

    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[1]["status"], "No Face Detected");
    assert_eq!(outputs[1]["face_detected"], false);
    assert_eq!(outputs[1]["timestamp_ms"], 40);
    assert!(outputs[1].get("ear").is_none());
    assert_eq!(outputs[2]["status"], "Normal");
}
