use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, Sink};

use crate::error::PlayerError;

/// Terminal outcome of playing one clip.
///
/// Every clip reaches exactly one of these before the next clip starts.
/// The queue engine treats everything except `Completed` as
/// skip-and-continue; nothing here aborts the remaining sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Completed,
    FileMissing,
    DecodeError,
    DeviceError,
}

impl PlayOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Playback capability for a single clip at a time.
///
/// `play` blocks the calling thread until the clip reaches a terminal
/// outcome. Implementations are selected explicitly at construction time:
/// `RodioPlayer` for a real output device, `SimulatedPlayer` for headless
/// operation and tests.
pub trait Player: Send + Sync {
    /// Render one clip to completion or failure
    fn play(&self, clip: &Path) -> PlayOutcome;

    /// Forcibly terminate the in-flight clip, if any
    fn stop(&self);
}

/// Device-backed player using rodio.
///
/// The output stream is opened per clip on the playing thread (cpal
/// streams are not `Send`); the active `Sink` is shared so `stop` can
/// reach it from another thread.
pub struct RodioPlayer {
    active_sink: Arc<Mutex<Option<Arc<Sink>>>>,
}

impl RodioPlayer {
    /// Create a new rodio player, probing the default output device so
    /// a missing device fails fast instead of on the first clip.
    pub fn new() -> Result<Self, PlayerError> {
        let (_stream, _handle) =
            OutputStream::try_default().map_err(|e| PlayerError::StreamInitFailed(Box::new(e)))?;

        Ok(Self {
            active_sink: Arc::new(Mutex::new(None)),
        })
    }
}

impl Player for RodioPlayer {
    fn play(&self, clip: &Path) -> PlayOutcome {
        if !clip.exists() {
            tracing::warn!("Audio file not found: {}", clip.display());
            return PlayOutcome::FileMissing;
        }

        let file = match File::open(clip) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", clip.display(), e);
                return PlayOutcome::FileMissing;
            }
        };

        let decoder = match Decoder::new(BufReader::new(file)) {
            Ok(decoder) => decoder,
            Err(e) => {
                tracing::warn!("Failed to decode {}: {}", clip.display(), e);
                return PlayOutcome::DecodeError;
            }
        };

        // Stream must stay alive on this thread for the whole clip
        let (stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("Failed to open output stream: {}", e);
                return PlayOutcome::DeviceError;
            }
        };

        let sink = match Sink::try_new(&handle) {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                tracing::warn!("Failed to create sink: {}", e);
                return PlayOutcome::DeviceError;
            }
        };

        tracing::debug!("Playing clip: {}", clip.display());

        // Register before appending so stop() can always reach the sink
        *self.active_sink.lock() = Some(Arc::clone(&sink));
        sink.append(decoder);

        // A stop() between registration and append takes the sink out of
        // the slot but stops it before the clip was queued
        if self.active_sink.lock().is_none() {
            sink.stop();
        }

        // Returns early if stop() empties the sink
        sink.sleep_until_end();

        *self.active_sink.lock() = None;
        drop(stream);

        PlayOutcome::Completed
    }

    fn stop(&self) {
        if let Some(sink) = self.active_sink.lock().take() {
            sink.stop();
        }
    }
}

/// Simulated player for headless environments and tests.
///
/// Records every clip it "plays" and optionally sleeps per clip so tests
/// can observe in-flight state. `stop` interrupts the current clip.
pub struct SimulatedPlayer {
    played: Mutex<Vec<PathBuf>>,
    clip_delay: Duration,
    interrupted: AtomicBool,
}

impl SimulatedPlayer {
    pub fn new() -> Self {
        Self::with_clip_delay(Duration::ZERO)
    }

    /// Simulate each clip taking `clip_delay` of wall time
    pub fn with_clip_delay(clip_delay: Duration) -> Self {
        Self {
            played: Mutex::new(Vec::new()),
            clip_delay,
            interrupted: AtomicBool::new(false),
        }
    }

    /// Paths of all clips played to completion, in order
    pub fn played(&self) -> Vec<PathBuf> {
        self.played.lock().clone()
    }

    pub fn play_count(&self) -> usize {
        self.played.lock().len()
    }
}

impl Default for SimulatedPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for SimulatedPlayer {
    fn play(&self, clip: &Path) -> PlayOutcome {
        self.interrupted.store(false, Ordering::SeqCst);

        // Sleep in small slices so stop() takes effect promptly
        let mut remaining = self.clip_delay;
        let slice = Duration::from_millis(2);
        while remaining > Duration::ZERO {
            if self.interrupted.load(Ordering::SeqCst) {
                tracing::debug!("Simulated clip interrupted: {}", clip.display());
                return PlayOutcome::Completed;
            }
            let step = remaining.min(slice);
            std::thread::sleep(step);
            remaining = remaining.saturating_sub(step);
        }

        if self.interrupted.load(Ordering::SeqCst) {
            return PlayOutcome::Completed;
        }

        self.played.lock().push(clip.to_path_buf());
        PlayOutcome::Completed
    }

    fn stop(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }
}
