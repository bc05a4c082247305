use alerting::NullSink;
use dms::{FatigueMonitor, MonitorConfig};
use proptest::prelude::*;

proptest! {
    #[test]
    fn open_eyes_never_close(ears in proptest::collection::vec(0.25_f32..1.0, 1..300)) {
        let mut monitor = FatigueMonitor::new(MonitorConfig::default()).unwrap();
        for ear in ears {
            let out = monitor.update(ear, false, &mut NullSink);
            prop_assert!(!out.eye_closed);
            prop_assert_eq!(out.consecutive_closed_frames, 0);
        }
    }

    #[test]
    fn perclos_tracks_last_window(flags in proptest::collection::vec(any::<bool>(), 1..200)) {
        let mut monitor = FatigueMonitor::new(MonitorConfig::default()).unwrap();
        for (i, &closed) in flags.iter().enumerate() {
            let ear = if closed { 0.1 } else { 0.3 };
            let out = monitor.update(ear, false, &mut NullSink);

            if i + 1 < 50 {
                prop_assert_eq!(out.perclos, 0.0);
            } else {
                let window = &flags[i + 1 - 50..=i];
                let expected = window.iter().filter(|&&c| c).count() as f32 / 50.0;
                prop_assert!((out.perclos - expected).abs() < 1e-6);
            }
            prop_assert!((0.0..=1.0).contains(&out.perclos));
        }
    }

    #[test]
    fn perclos_matches_any_window_size(
        window in 1_usize..40,
        flags in proptest::collection::vec(any::<bool>(), 1..160),
    ) {
        let config = MonitorConfig { history_window: window, ..Default::default() };
        let mut monitor = FatigueMonitor::new(config).unwrap();
        for (i, &closed) in flags.iter().enumerate() {
            let ear = if closed { 0.1 } else { 0.3 };
            let out = monitor.update(ear, false, &mut NullSink);
            if i + 1 >= window {
                let closed_count = flags[i + 1 - window..=i].iter().filter(|&&c| c).count();
                prop_assert_eq!(out.perclos, closed_count as f32 / window as f32);
            }
        }
    }

    #[test]
    fn repeated_input_converges(ear in 0.0_f32..0.6, distracted in any::<bool>()) {
        let mut monitor = FatigueMonitor::new(MonitorConfig::default()).unwrap();
        let mut settled = None;
        for _ in 0..60 {
            settled = Some(monitor.update(ear, distracted, &mut NullSink));
        }
        let settled = settled.unwrap();
        for _ in 0..20 {
            let out = monitor.update(ear, distracted, &mut NullSink);
            prop_assert_eq!(out.perclos, settled.perclos);
            prop_assert_eq!(out.alert_level, settled.alert_level);
            prop_assert_eq!(&out.status, &settled.status);
            prop_assert_eq!(out.eye_closed, settled.eye_closed);
        }
    }
}
