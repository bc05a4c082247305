//! Alert sink implementations

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{trace, warn};

use crate::{AlertError, AlertSink};

/// Sink that ignores alerts
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AlertSink for NullSink {
    fn trigger(&mut self) {}

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Terminal bell, used when no alarm sound is available
#[derive(Debug)]
pub struct BeepFallback<W: Write = io::Stderr> {
    out: W,
    beeps: u64,
}

impl BeepFallback<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> BeepFallback<W> {
    pub fn new(out: W) -> Self {
        Self { out, beeps: 0 }
    }

    pub fn beeps(&self) -> u64 {
        self.beeps
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AlertSink for BeepFallback<W> {
    fn trigger(&mut self) {
        let result = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        match result {
            Ok(()) => self.beeps += 1,
            Err(e) => warn!("Terminal bell failed: {}", e),
        }
    }

    fn name(&self) -> &'static str {
        "beep"
    }
}

/// Sound output device
pub trait Playback {
    /// Whether a previously started sound is still playing.
    ///
    /// An error means the device cannot be relied on (e.g. the player
    /// exited with a failure status).
    fn is_busy(&mut self) -> Result<bool, AlertError>;

    /// Start playing the alarm
    fn play(&mut self) -> Result<(), AlertError>;
}

/// Plays the alarm through an external player process (e.g. `aplay`)
#[derive(Debug)]
pub struct CommandPlayback {
    program: String,
    args: Vec<String>,
    sound: PathBuf,
    child: Option<Child>,
}

impl CommandPlayback {
    /// Fails if the sound file does not exist
    pub fn new(program: impl Into<String>, args: Vec<String>, sound: &Path) -> Result<Self, AlertError> {
        if !sound.is_file() {
            return Err(AlertError::SoundNotFound(sound.to_path_buf()));
        }
        Ok(Self {
            program: program.into(),
            args,
            sound: sound.to_path_buf(),
            child: None,
        })
    }
}

impl Playback for CommandPlayback {
    fn is_busy(&mut self) -> Result<bool, AlertError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(false);
        };
        let status = child.try_wait();
        if !matches!(status, Ok(None)) {
            self.child = None;
        }
        match status {
            Ok(None) => Ok(true),
            Ok(Some(status)) if status.success() => Ok(false),
            Ok(Some(status)) => Err(AlertError::PlayerFailed(format!("{} exited with {}", self.program, status))),
            Err(e) => Err(AlertError::Playback(e)),
        }
    }

    fn play(&mut self) -> Result<(), AlertError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        self.child = Some(child);
        Ok(())
    }
}

impl Drop for CommandPlayback {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Alarm sound sink. Never overlaps playback: triggers that arrive while
/// the sound is still playing are skipped. The first playback failure is
/// logged once and every later trigger rings the terminal bell instead.
#[derive(Debug)]
pub struct AudioSink<P: Playback, W: Write = io::Stderr> {
    playback: P,
    fallback: BeepFallback<W>,
    degraded: bool,
    played: u64,
    skipped: u64,
}

impl<P: Playback> AudioSink<P, io::Stderr> {
    pub fn new(playback: P) -> Self {
        Self::with_fallback(playback, BeepFallback::stderr())
    }
}

impl<P: Playback, W: Write> AudioSink<P, W> {
    pub fn with_fallback(playback: P, fallback: BeepFallback<W>) -> Self {
        Self {
            playback,
            fallback,
            degraded: false,
            played: 0,
            skipped: 0,
        }
    }

    /// Playbacks started
    pub fn played(&self) -> u64 {
        self.played
    }

    /// Triggers skipped because the alarm was still playing
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Whether playback failed and alerts now go to the terminal bell
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    fn degrade(&mut self, error: AlertError) {
        warn!("Alarm playback failed: {}; falling back to terminal bell", error);
        self.degraded = true;
        self.fallback.trigger();
    }
}

impl<P: Playback, W: Write> AlertSink for AudioSink<P, W> {
    fn trigger(&mut self) {
        if self.degraded {
            self.fallback.trigger();
            return;
        }

        match self.playback.is_busy() {
            Ok(true) => {
                trace!("Alarm still playing, trigger skipped");
                self.skipped += 1;
                return;
            }
            Ok(false) => {}
            Err(e) => return self.degrade(e),
        }

        match self.playback.play() {
            Ok(()) => self.played += 1,
            Err(e) => self.degrade(e),
        }
    }

    fn name(&self) -> &'static str {
        if self.degraded {
            "beep"
        } else {
            "audio"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Playback that stays busy for a fixed number of polls
    struct FakePlayback {
        busy_polls: u32,
        remaining: u32,
        started: u32,
        fail: bool,
        crash_after_start: bool,
    }

    impl FakePlayback {
        fn new(busy_polls: u32) -> Self {
            Self { busy_polls, remaining: 0, started: 0, fail: false, crash_after_start: false }
        }
    }

    impl Playback for FakePlayback {
        fn is_busy(&mut self) -> Result<bool, AlertError> {
            if self.crash_after_start && self.started > 0 {
                return Err(AlertError::PlayerFailed("player exited with status 1".into()));
            }
            if self.remaining > 0 {
                self.remaining -= 1;
                Ok(true)
            } else {
                Ok(false)
            }
        }

        fn play(&mut self) -> Result<(), AlertError> {
            if self.fail {
                return Err(AlertError::Playback(io::Error::new(io::ErrorKind::NotFound, "no device")));
            }
            self.started += 1;
            self.remaining = self.busy_polls;
            Ok(())
        }
    }

    /// Shared in-memory log output
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn warnings(&self) -> usize {
            String::from_utf8_lossy(&self.0.lock().unwrap()).matches("WARN").count()
        }
    }

    /// Run `f` with warnings captured into the returned buffer
    fn capture_warnings<F: FnOnce()>(f: F) -> LogBuffer {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        logs
    }

    #[test]
    fn test_audio_does_not_overlap() {
        let mut sink = AudioSink::with_fallback(FakePlayback::new(3), BeepFallback::new(Vec::new()));
        for _ in 0..8 {
            sink.trigger();
        }
        // play, skip x3, play, skip x3
        assert_eq!(sink.played(), 2);
        assert_eq!(sink.skipped(), 6);
        assert_eq!(sink.playback.started, 2);
        assert!(!sink.is_degraded());
        assert!(sink.fallback.into_inner().is_empty());
    }

    #[test]
    fn test_unplayable_alarm_falls_back_to_bell() {
        let mut playback = FakePlayback::new(0);
        playback.fail = true;
        let mut sink = AudioSink::with_fallback(playback, BeepFallback::new(Vec::new()));

        let logs = capture_warnings(|| {
            for _ in 0..30 {
                sink.trigger();
            }
        });

        assert_eq!(logs.warnings(), 1);
        assert!(sink.is_degraded());
        assert_eq!(sink.name(), "beep");
        assert_eq!(sink.played(), 0);
        assert_eq!(sink.fallback.into_inner(), vec![0x07; 30]);
    }

    #[test]
    fn test_failing_player_is_not_respawned() {
        let mut playback = FakePlayback::new(0);
        playback.crash_after_start = true;
        let mut sink = AudioSink::with_fallback(playback, BeepFallback::new(Vec::new()));

        let logs = capture_warnings(|| {
            for _ in 0..10 {
                sink.trigger();
            }
        });

        // first trigger started the player, the rest rang the bell
        assert_eq!(sink.playback.started, 1);
        assert_eq!(sink.played(), 1);
        assert_eq!(logs.warnings(), 1);
        assert_eq!(sink.fallback.into_inner(), vec![0x07; 9]);
    }

    #[test]
    fn test_beep_writes_bell() {
        let mut sink = BeepFallback::new(Vec::new());
        sink.trigger();
        sink.trigger();
        assert_eq!(sink.beeps(), 2);
        assert_eq!(sink.into_inner(), b"\x07\x07".to_vec());
    }

    #[test]
    fn test_missing_sound_rejected() {
        let err = CommandPlayback::new("aplay", vec![], Path::new("/nonexistent/alarm.wav")).unwrap_err();
        assert!(matches!(err, AlertError::SoundNotFound(_)));
    }

    #[test]
    fn test_missing_player_falls_back_to_bell() {
        let sound = std::env::temp_dir().join(format!("dms-alarm-{}.wav", std::process::id()));
        std::fs::write(&sound, b"RIFF").unwrap();

        let playback = CommandPlayback::new("/nonexistent/player", vec![], &sound).unwrap();
        let mut sink = AudioSink::with_fallback(playback, BeepFallback::new(Vec::new()));
        for _ in 0..3 {
            sink.trigger();
        }
        std::fs::remove_file(&sound).unwrap();

        assert!(sink.is_degraded());
        assert_eq!(sink.fallback.into_inner(), vec![0x07; 3]);
    }

    #[test]
    fn test_sink_names() {
        assert_eq!(NullSink.name(), "null");
        assert_eq!(BeepFallback::new(Vec::new()).name(), "beep");
        assert_eq!(AudioSink::new(FakePlayback::new(0)).name(), "audio");
    }
}
