use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;
use parking_lot::{Mutex, RwLock};

use crate::config::{AnnouncerConfig, ConfigOverrides};
use crate::error::CallError;
use crate::events::{Event, EventBus};
use crate::player::Player;
use crate::request::CallRequest;
use crate::resolver::ClipResolver;
use crate::sequence;

/// The announcement queue engine.
///
/// Owns the pending call queue and serializes playback so that at most
/// one call is ever in flight. Calls drain in strict FIFO order; each clip
/// of a call reaches a terminal outcome before the next begins. Cloning
/// is cheap and shares the same queue.
///
/// `enqueue` paths are synchronous and return before any clip plays;
/// playback itself runs on a drain worker thread spawned on demand. The
/// `playing` flag, toggled with compare-exchange, is the sole guard
/// against two workers acquiring the output device at once.
pub struct Announcer {
    inner: Arc<Inner>,
}

struct Inner {
    config: RwLock<AnnouncerConfig>,
    pending: Mutex<VecDeque<CallRequest>>,
    playing: AtomicBool,
    /// Bumped by `stop_all`; an in-flight task abandons its remaining
    /// clips when the value it sampled at start no longer matches.
    stop_generation: AtomicU64,
    player: Arc<dyn Player>,
    bus: EventBus,
}

impl Announcer {
    /// Create an engine with an explicitly chosen player implementation
    pub fn new(config: AnnouncerConfig, player: Arc<dyn Player>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: RwLock::new(config),
                pending: Mutex::new(VecDeque::new()),
                playing: AtomicBool::new(false),
                stop_generation: AtomicU64::new(0),
                player,
                bus: EventBus::new(),
            }),
        }
    }

    /// Merge partial configuration overrides over the current values.
    /// The clip-map merge is key-wise: unspecified symbols keep their
    /// existing mapping.
    pub fn configure(&self, overrides: ConfigOverrides) {
        let mut config = self.inner.config.write();
        config.apply(overrides);
        tracing::debug!("Configuration updated: {:?}", *config);
    }

    /// Apply overrides supplied as a JSON object, e.g.
    /// `{"resource_root": "/opt/clips", "verbose": true}`
    pub fn configure_json(&self, json: &str) -> crate::error::AppResult<()> {
        let overrides: ConfigOverrides = serde_json::from_str(json)?;
        self.configure(overrides);
        Ok(())
    }

    /// Validate and enqueue a normal customer call
    pub fn add_normal_call(
        &self,
        queue_number: impl Into<String>,
        window_number: impl ToString,
        chime: bool,
    ) -> Result<(), CallError> {
        self.enqueue(CallRequest::normal(queue_number, window_number, chime))
    }

    /// Enqueue a normal customer call with the chime enabled, the common case
    pub fn add_normal_call_default(
        &self,
        queue_number: impl Into<String>,
        window_number: impl ToString,
    ) -> Result<(), CallError> {
        self.add_normal_call(queue_number, window_number, true)
    }

    /// Validate and enqueue a lobby-manager call
    pub fn add_manager_call(
        &self,
        window_number: impl ToString,
        chime: bool,
    ) -> Result<(), CallError> {
        self.enqueue(CallRequest::manager(window_number, chime))
    }

    /// Enqueue a lobby-manager call with the chime enabled
    pub fn add_manager_call_default(&self, window_number: impl ToString) -> Result<(), CallError> {
        self.add_manager_call(window_number, true)
    }

    /// Number of pending calls, excluding the one in flight
    pub fn queue_len(&self) -> usize {
        self.inner.pending.lock().len()
    }

    /// Whether a call is currently being announced
    pub fn is_playing(&self) -> bool {
        self.inner.playing.load(Ordering::SeqCst)
    }

    /// Drop all pending calls. In-flight playback is unaffected.
    pub fn clear_queue(&self) {
        self.inner.pending.lock().clear();
        tracing::info!("Play queue cleared");
        self.inner.bus.publish(Event::QueueCleared);
    }

    /// Halt in-flight playback and drop all pending calls.
    ///
    /// Synchronous best-effort: the active output handle is stopped and
    /// released before this returns; the drain worker abandons the
    /// interrupted call's remaining clips at its next check.
    pub fn stop_all(&self) {
        self.inner.stop_generation.fetch_add(1, Ordering::SeqCst);
        self.inner.pending.lock().clear();
        self.inner.player.stop();
        tracing::info!("Stopped playback and cleared queue");
        self.inner.bus.publish(Event::PlaybackStopped);
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> Receiver<Event> {
        let (rx, _id) = self.inner.bus.subscribe();
        rx
    }

    /// Validate, append to the pending queue and kick the drain worker.
    /// Rejected calls leave the queue untouched.
    fn enqueue(&self, request: CallRequest) -> Result<(), CallError> {
        if let Err(err) = request.validate() {
            tracing::error!("Rejected call: {}", err);
            self.inner.bus.publish(Event::CallRejected {
                reason: err.to_string(),
            });
            return Err(err);
        }

        let queue_len = {
            let mut pending = self.inner.pending.lock();
            pending.push_back(request.clone());
            pending.len()
        };

        tracing::info!(
            "Enqueued call: {} (queue length {})",
            request.description(),
            queue_len
        );
        self.inner.bus.publish(Event::CallEnqueued { request, queue_len });

        self.drain();
        Ok(())
    }

    /// Start the drain worker unless one is already running or there is
    /// nothing to play. Safe to call from any thread at any time.
    fn drain(&self) {
        if self.inner.pending.lock().is_empty() {
            return;
        }

        // Only one worker may ever hold the playing flag
        if self
            .inner
            .playing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let engine = self.clone();
        thread::spawn(move || {
            tracing::debug!("Drain worker started");

            loop {
                let task = engine.inner.pending.lock().pop_front();
                let Some(task) = task else { break };
                engine.run_task(task);
            }

            engine.inner.playing.store(false, Ordering::SeqCst);
            tracing::debug!("Drain worker finished");

            // A call enqueued between the final pop and the flag clearing
            // would otherwise sit idle until the next enqueue
            if !engine.inner.pending.lock().is_empty() {
                engine.drain();
            }
        });
    }

    /// Play one call end-to-end: build its clip sequence and play each
    /// clip to a terminal outcome. Clip failures are swallowed; only a
    /// `stop_all` abandons the remaining clips.
    fn run_task(&self, request: CallRequest) {
        let generation = self.inner.stop_generation.load(Ordering::SeqCst);

        tracing::info!("Announcing: {}", request.description());
        self.inner.bus.publish(Event::TaskStarted {
            request: request.clone(),
        });

        let config = self.inner.config.read().clone();
        let resolver = ClipResolver::new(config);
        let clips = sequence::build(&request, &resolver);

        for clip in clips {
            if self.inner.stop_generation.load(Ordering::SeqCst) != generation {
                tracing::debug!("Playback stopped, abandoning remaining clips");
                return;
            }

            let outcome = self.inner.player.play(&clip);
            if !outcome.is_completed() {
                tracing::warn!("Skipped clip {} ({:?})", clip.display(), outcome);
                self.inner.bus.publish(Event::ClipSkipped { clip, outcome });
            }
        }

        tracing::info!("Finished announcing: {}", request.description());
        self.inner.bus.publish(Event::TaskFinished { request });
    }
}

impl Clone for Announcer {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::SimulatedPlayer;
    use std::time::{Duration, Instant};

    fn wait_until_idle(engine: &Announcer) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while engine.queue_len() > 0 || engine.is_playing() {
            assert!(Instant::now() < deadline, "engine did not go idle in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn simulated_engine() -> (Announcer, Arc<SimulatedPlayer>) {
        let player = Arc::new(SimulatedPlayer::new());
        let engine = Announcer::new(AnnouncerConfig::default(), player.clone());
        (engine, player)
    }

    #[test]
    fn test_rejected_call_leaves_queue_untouched() {
        let (engine, player) = simulated_engine();

        assert!(engine.add_normal_call("a100", 3, true).is_err());
        assert_eq!(engine.queue_len(), 0);

        thread::sleep(Duration::from_millis(20));
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn test_single_call_plays_full_sequence() {
        let (engine, player) = simulated_engine();

        engine.add_normal_call("B2002", 5, false).unwrap();
        wait_until_idle(&engine);

        let played = player.played();
        assert_eq!(played.len(), 10);
        assert!(played[0].ends_with("please.wav"));
        assert!(played[1].ends_with("B.wav"));
        assert!(played[5].ends_with("2.wav"));
        assert!(played[9].ends_with("window-number.wav"));
    }

    #[test]
    fn test_manager_call_plays_with_chime() {
        let (engine, player) = simulated_engine();

        engine.add_manager_call(7, true).unwrap();
        wait_until_idle(&engine);

        let played = player.played();
        assert_eq!(played.len(), 4);
        assert!(played[0].ends_with("chime.wav"));
        assert!(played[1].ends_with("lobby-manager.wav"));
        assert!(played[2].ends_with("7.wav"));
        assert!(played[3].ends_with("window-number.wav"));
    }

    #[test]
    fn test_default_call_variants_enable_chime() {
        let (engine, player) = simulated_engine();

        engine.add_normal_call_default("A1001", 3).unwrap();
        wait_until_idle(&engine);

        let played = player.played();
        assert_eq!(played.len(), 11);
        assert!(played[0].ends_with("chime.wav"));

        engine.add_manager_call_default(2).unwrap();
        wait_until_idle(&engine);

        let played = player.played();
        assert_eq!(played.len(), 11 + 4);
        assert!(played[11].ends_with("chime.wav"));
    }

    #[test]
    fn test_queue_len_is_idempotent() {
        let (engine, _player) = simulated_engine();
        assert_eq!(engine.queue_len(), 0);
        assert_eq!(engine.queue_len(), 0);
        assert_eq!(engine.queue_len(), 0);
    }

    #[test]
    fn test_clear_queue_drops_pending_only() {
        let player = Arc::new(SimulatedPlayer::with_clip_delay(Duration::from_millis(20)));
        let engine = Announcer::new(AnnouncerConfig::default(), player.clone());

        engine.add_manager_call(1, false).unwrap();
        engine.add_manager_call(2, false).unwrap();
        engine.add_manager_call(3, false).unwrap();

        // Wait until the first call is demonstrably in flight, then drop the rest
        let deadline = Instant::now() + Duration::from_secs(5);
        while player.play_count() == 0 {
            assert!(Instant::now() < deadline, "first clip never played");
            thread::sleep(Duration::from_millis(2));
        }
        engine.clear_queue();
        assert_eq!(engine.queue_len(), 0);

        wait_until_idle(&engine);

        // Only the in-flight call finished (3 clips, no chime)
        assert_eq!(player.play_count(), 3);
    }

    #[test]
    fn test_configure_json_overrides() {
        let (engine, _player) = simulated_engine();
        engine
            .configure_json(r#"{"resource_root": "/opt/clips", "verbose": true}"#)
            .unwrap();

        let config = engine.inner.config.read();
        assert_eq!(config.resource_root, std::path::PathBuf::from("/opt/clips"));
        assert!(config.verbose);
        // Unspecified fields keep their values
        assert_eq!(config.clip_map.len(), 45);
    }

    #[test]
    fn test_configure_overrides_clip_map() {
        let (engine, player) = simulated_engine();

        let mut clip_map = std::collections::HashMap::new();
        clip_map.insert("chime".to_string(), "bell.wav".to_string());
        engine.configure(ConfigOverrides {
            clip_map: Some(clip_map),
            ..Default::default()
        });

        engine.add_manager_call(7, true).unwrap();
        wait_until_idle(&engine);

        assert!(player.played()[0].ends_with("bell.wav"));
    }
}
