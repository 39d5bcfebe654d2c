//! Hand-written fakes shared by the playback integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    AudioElement, AudioElementFactory, BindingId, ManualClock, MediaMetadata, MediaPlaybackState,
    MediaSessionPort, PositionState,
};
use core_playback::{PlaybackSessionManager, SessionBackend, Track, TrackId};
use core_runtime::config::PlaybackSettings;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

// ============================================================================
// Audio element
// ============================================================================

#[derive(Debug, Default)]
pub struct ElementState {
    pub attached: Option<BindingId>,
    pub source: Option<String>,
    pub paused: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub volume: f32,
    pub play_calls: usize,
    /// Attach/detach calls in order, e.g. `["detach", "attach:1"]`.
    pub log: Vec<String>,
}

pub struct FakeAudioElement {
    pub state: Mutex<ElementState>,
    play_results: Mutex<VecDeque<BridgeResult<()>>>,
    gates: Mutex<VecDeque<Arc<Notify>>>,
    waiting: AtomicUsize,
}

impl FakeAudioElement {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ElementState {
                paused: true,
                volume: 1.0,
                ..ElementState::default()
            }),
            play_results: Mutex::new(VecDeque::new()),
            gates: Mutex::new(VecDeque::new()),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Queue the outcome of the next `play()` call. Unqueued calls succeed.
    pub fn push_play_result(&self, result: BridgeResult<()>) {
        self.play_results.lock().push_back(result);
    }

    /// Make the next `play()` call wait until the returned gate is notified.
    pub fn hold_next_play(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().push_back(Arc::clone(&gate));
        gate
    }

    /// Number of `play()` calls currently parked on a gate.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn set_duration(&self, duration: f64) {
        self.state.lock().duration = Some(duration);
    }

    pub fn attached(&self) -> Option<BindingId> {
        self.state.lock().attached
    }

    pub fn source(&self) -> Option<String> {
        self.state.lock().source.clone()
    }

    pub fn is_element_paused(&self) -> bool {
        self.state.lock().paused
    }
}

#[async_trait]
impl AudioElement for FakeAudioElement {
    fn attach(&self, binding: BindingId) {
        let mut state = self.state.lock();
        state.attached = Some(binding);
        state.log.push(format!("attach:{}", binding.generation()));
    }

    fn detach(&self) {
        let mut state = self.state.lock();
        state.attached = None;
        state.log.push("detach".to_string());
    }

    fn set_source(&self, url: &str) {
        let mut state = self.state.lock();
        state.source = Some(url.to_string());
        state.current_time = 0.0;
    }

    fn clear_source(&self) {
        self.state.lock().source = None;
    }

    async fn play(&self) -> BridgeResult<()> {
        let gate = self.gates.lock().pop_front();
        if let Some(gate) = gate {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
            self.waiting.fetch_sub(1, Ordering::SeqCst);
        }

        let result = self.play_results.lock().pop_front().unwrap_or(Ok(()));
        let mut state = self.state.lock();
        state.play_calls += 1;
        if result.is_ok() {
            state.paused = false;
        }
        result
    }

    fn pause(&self) {
        self.state.lock().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        self.state.lock().current_time = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.state.lock().duration
    }

    fn set_volume(&self, volume: f32) {
        self.state.lock().volume = volume;
    }
}

pub struct FakeElementFactory {
    pub element: Arc<FakeAudioElement>,
    pub created: AtomicUsize,
}

impl FakeElementFactory {
    pub fn new(element: Arc<FakeAudioElement>) -> Self {
        Self {
            element,
            created: AtomicUsize::new(0),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl AudioElementFactory for FakeElementFactory {
    fn create(&self) -> BridgeResult<Arc<dyn AudioElement>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.element) as Arc<dyn AudioElement>)
    }
}

// ============================================================================
// Backend
// ============================================================================

pub struct RecordingBackend {
    pub plays: Mutex<Vec<TrackId>>,
    pub listening: Mutex<Vec<u64>>,
    pub authenticated: AtomicBool,
    pub fail_calls: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            plays: Mutex::new(Vec::new()),
            listening: Mutex::new(Vec::new()),
            authenticated: AtomicBool::new(true),
            fail_calls: AtomicBool::new(false),
        }
    }

    pub fn signed_out(self) -> Self {
        self.authenticated.store(false, Ordering::SeqCst);
        self
    }

    pub fn plays(&self) -> Vec<String> {
        self.plays.lock().iter().map(|id| id.to_string()).collect()
    }

    pub fn listening(&self) -> Vec<u64> {
        self.listening.lock().clone()
    }
}

#[async_trait]
impl SessionBackend for RecordingBackend {
    async fn play_song(&self, track_id: &TrackId) -> core_playback::Result<()> {
        self.plays.lock().push(track_id.clone());
        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(core_playback::PlaybackError::Backend("unavailable".to_string()));
        }
        Ok(())
    }

    async fn add_listening_time(&self, seconds: u64) -> core_playback::Result<()> {
        self.listening.lock().push(seconds);
        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(core_playback::PlaybackError::Backend("unavailable".to_string()));
        }
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Media session
// ============================================================================

#[derive(Default)]
pub struct RecordingMediaSession {
    pub metadata: Mutex<Vec<Option<MediaMetadata>>>,
    pub states: Mutex<Vec<MediaPlaybackState>>,
    pub positions: Mutex<Vec<PositionState>>,
}

impl RecordingMediaSession {
    pub fn last_metadata(&self) -> Option<Option<MediaMetadata>> {
        self.metadata.lock().last().cloned()
    }

    pub fn last_state(&self) -> Option<MediaPlaybackState> {
        self.states.lock().last().copied()
    }
}

impl MediaSessionPort for RecordingMediaSession {
    fn set_metadata(&self, metadata: Option<MediaMetadata>) {
        self.metadata.lock().push(metadata);
    }

    fn set_playback_state(&self, state: MediaPlaybackState) {
        self.states.lock().push(state);
    }

    fn set_position_state(&self, state: PositionState) {
        self.positions.lock().push(state);
    }
}

// ============================================================================
// Harness
// ============================================================================

pub fn tracks(n: usize) -> Vec<Arc<Track>> {
    (0..n)
        .map(|i| {
            Arc::new(
                Track::new(
                    format!("t{i}"),
                    format!("Song {i}"),
                    format!("Artist {i}"),
                    format!("https://cdn.example/audio/{i}.mp3?sig=abc"),
                )
                .with_artwork(format!("https://cdn.example/art/{i}.jpg")),
            )
        })
        .collect()
}

pub struct Harness {
    pub session: Arc<PlaybackSessionManager>,
    pub element: Arc<FakeAudioElement>,
    pub factory: Arc<FakeElementFactory>,
    pub backend: Arc<RecordingBackend>,
    pub clock: Arc<ManualClock>,
    pub media: Arc<RecordingMediaSession>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_backend(RecordingBackend::new())
    }

    pub fn with_backend(backend: RecordingBackend) -> Self {
        Self::build(PlaybackSettings::default(), backend, |session| session)
    }

    pub fn build(
        settings: PlaybackSettings,
        backend: RecordingBackend,
        configure: impl FnOnce(PlaybackSessionManager) -> PlaybackSessionManager,
    ) -> Self {
        let element = Arc::new(FakeAudioElement::new());
        let factory = Arc::new(FakeElementFactory::new(Arc::clone(&element)));
        let backend = Arc::new(backend);
        let clock = Arc::new(ManualClock::default());
        let media = Arc::new(RecordingMediaSession::default());

        let session = PlaybackSessionManager::new(
            settings,
            Arc::clone(&backend) as Arc<dyn SessionBackend>,
            Arc::clone(&factory) as Arc<dyn AudioElementFactory>,
            Arc::clone(&clock) as Arc<dyn bridge_traits::Clock>,
        )
        .with_media_session(Arc::clone(&media) as Arc<dyn MediaSessionPort>)
        .with_rng_seed(7);

        Self {
            session: Arc::new(configure(session)),
            element,
            factory,
            backend,
            clock,
            media,
        }
    }

    /// Feed `count` time updates `step_millis` apart to the current binding.
    pub async fn play_for(&self, count: usize, step_millis: i64) {
        let binding = self.session.binding();
        for _ in 0..count {
            self.session
                .handle_audio_event(binding, bridge_traits::AudioEvent::TimeUpdate)
                .await;
            self.clock.advance_millis(step_millis);
        }
    }
}
