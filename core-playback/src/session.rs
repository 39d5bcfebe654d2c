//! # Playback Session Manager
//!
//! Single authority over the one audio element: what it is bound to, whether
//! it is playing, and how much listening time it has produced.
//!
//! ## Binding
//!
//! Every track change detaches the element's listeners, bumps the
//! [`BindingId`] generation and attaches again under the new id. Audio events
//! and `play()` completions carrying an older generation are dropped, so a
//! slow load that finishes after the user picked another track cannot touch
//! the current session.
//!
//! ## Locking
//!
//! State lives behind a `parking_lot::Mutex` that is released before every
//! `.await`. Code that resumes after an await re-checks the generation before
//! mutating anything.
//!
//! ## Listening time
//!
//! Time updates feed a [`ListeningLedger`]. The ledger is flushed to the
//! backend on pause, on track end (before advancing) and from the periodic
//! timer once the threshold is reached. Flushes send whole seconds, only for a
//! signed-in identity, and never retry.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, trace, warn};

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    AudioElement, AudioElementFactory, AudioEvent, BindingId, BridgeError, Clock, MediaAction,
    MediaMetadata, MediaSessionPort, PositionState,
};
use core_runtime::config::PlaybackSettings;
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};

use crate::error::{PlaybackError, Result};
use crate::ledger::{ListeningLedger, SampleOutcome};
use crate::queue::PlaybackQueue;
use crate::state::{PlayRequest, PlaybackState, SessionSnapshot};
use crate::track::Track;
use crate::traits::SessionBackend;

struct SessionInner {
    /// Created on the first bind and reused for every later track.
    element: Option<Arc<dyn AudioElement>>,
    binding: BindingId,
    bound_track: Option<Arc<Track>>,
    state: PlaybackState,
    queue: PlaybackQueue,
    shuffle: bool,
    repeat: bool,
    volume: f32,
    play_counted: bool,
    ledger: ListeningLedger,
    rng: StdRng,
}

impl SessionInner {
    fn is_bound(&self, binding: BindingId) -> bool {
        self.binding == binding && self.bound_track.is_some()
    }

    fn queue_event(&self) -> PlaybackEvent {
        PlaybackEvent::QueueChanged {
            length: self.queue.len(),
            cursor: self.queue.cursor(),
            shuffle: self.shuffle,
            repeat: self.repeat,
        }
    }

    fn apply_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
        if shuffle {
            if !self.queue.is_shuffled() {
                self.queue.shuffle(&mut self.rng);
            }
        } else {
            self.queue.unshuffle();
        }
    }

    fn position(&self) -> f64 {
        self.element
            .as_ref()
            .map(|element| element.current_time())
            .unwrap_or(0.0)
    }

    fn bound_id(&self) -> Option<String> {
        self.bound_track.as_ref().map(|track| track.id.to_string())
    }
}

/// Element and generation captured by a bind, used after the lock is released.
struct Bound {
    element: Arc<dyn AudioElement>,
    binding: BindingId,
    track: Arc<Track>,
    queue_event: PlaybackEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartKind {
    Bind,
    Resume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    Moved,
    Exhausted,
    Superseded,
}

/// Owns the audio element, the queue and the transport state.
pub struct PlaybackSessionManager {
    settings: PlaybackSettings,
    backend: Arc<dyn SessionBackend>,
    element_factory: Arc<dyn AudioElementFactory>,
    clock: Arc<dyn Clock>,
    media_session: Option<Arc<dyn MediaSessionPort>>,
    event_bus: Option<EventBus>,
    inner: Mutex<SessionInner>,
}

impl PlaybackSessionManager {
    pub fn new(
        settings: PlaybackSettings,
        backend: Arc<dyn SessionBackend>,
        element_factory: Arc<dyn AudioElementFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let inner = SessionInner {
            element: None,
            binding: BindingId::new(0),
            bound_track: None,
            state: PlaybackState::Idle,
            queue: PlaybackQueue::new(),
            shuffle: false,
            repeat: false,
            volume: settings.initial_volume,
            play_counted: false,
            ledger: ListeningLedger::new(settings.max_sample_gap),
            rng: StdRng::from_entropy(),
        };

        Self {
            settings,
            backend,
            element_factory,
            clock,
            media_session: None,
            event_bus: None,
            inner: Mutex::new(inner),
        }
    }

    /// Publish now-playing state to OS transport controls.
    pub fn with_media_session(mut self, port: Arc<dyn MediaSessionPort>) -> Self {
        self.media_session = Some(port);
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Seed the shuffle generator for reproducible orderings.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.inner.get_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Bind `track` and start playing it.
    ///
    /// A supplied queue replaces the current one; the track is appended when
    /// it is not part of the resulting queue. The backend play count is
    /// incremented on the first successful start of this binding only.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::PlaybackBlocked`] when the platform refused to start;
    ///   the session is left `Paused` on the new track
    /// - [`PlaybackError::SourceUnavailable`] when the resource failed to load;
    ///   the session is left `Idle`
    #[instrument(skip(self, track, request), fields(track_id = %track.id))]
    pub async fn play(&self, track: Arc<Track>, request: PlayRequest) -> Result<()> {
        let bound = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            if let Some(repeat) = request.repeat {
                inner.repeat = repeat;
            }
            if let Some(tracks) = request.queue {
                inner.queue.replace(tracks, &mut inner.rng);
            }
            if let Some(shuffle) = request.shuffle {
                inner.apply_shuffle(shuffle);
            }
            inner.queue.focus(&track);

            self.bind_locked(inner, track)?
        };

        self.start_bound(bound).await
    }

    /// Pause and flush pending listening time. No-op unless playing or loading.
    #[instrument(skip(self))]
    pub async fn pause(&self) {
        let (seconds, track_id, position) = {
            let mut inner = self.inner.lock();
            if !inner.state.is_active() {
                return;
            }
            if let Some(element) = &inner.element {
                element.pause();
            }
            inner.state = PlaybackState::Paused;
            let seconds = inner.ledger.take_flush(self.clock.now());
            (seconds, inner.bound_id(), inner.position())
        };

        self.publish_state(PlaybackState::Paused);
        if let Some(track_id) = track_id {
            self.emit(PlaybackEvent::Paused {
                track_id,
                position_secs: position,
            });
        }
        self.flush(seconds).await;
    }

    /// Pause when playing, otherwise resume (or replay the last track from `Idle`).
    ///
    /// Resume failures leave the session `Paused` and are returned to the caller.
    #[instrument(skip(self))]
    pub async fn toggle_play(&self) -> Result<()> {
        let (state, replay) = {
            let inner = self.inner.lock();
            let replay = inner
                .bound_track
                .clone()
                .or_else(|| inner.queue.current().cloned());
            (inner.state, replay)
        };

        match state {
            PlaybackState::Loading | PlaybackState::Playing => {
                self.pause().await;
                Ok(())
            }
            PlaybackState::Paused | PlaybackState::Ended => self.resume().await,
            PlaybackState::Idle => match replay {
                Some(track) => self.play(track, PlayRequest::default()).await,
                None => Ok(()),
            },
        }
    }

    /// Move the playhead. Clamped to `[0, duration]`; returns the applied position.
    ///
    /// Scrubbing is not a listening-time event and does not flush.
    pub fn seek(&self, position_secs: f64) -> Result<f64> {
        let (track_id, target, duration) = {
            let inner = self.inner.lock();
            let element = match (&inner.element, &inner.bound_track) {
                (Some(element), Some(_)) => Arc::clone(element),
                _ => return Err(PlaybackError::NoTrackLoaded),
            };

            let duration = element.duration().filter(|d| d.is_finite() && *d >= 0.0);
            let mut target = if position_secs.is_nan() {
                0.0
            } else {
                position_secs.max(0.0)
            };
            if let Some(duration) = duration {
                target = target.min(duration);
            }
            element.set_current_time(target);
            (inner.bound_id(), target, duration)
        };

        if let (Some(port), Some(duration)) = (&self.media_session, duration) {
            port.set_position_state(PositionState {
                duration,
                position: target,
                playback_rate: 1.0,
            });
        }
        if let Some(track_id) = track_id {
            self.emit(PlaybackEvent::Seeked {
                track_id,
                position_secs: target,
            });
        }
        Ok(target)
    }

    /// Set the volume, clamped to `[0, 1]`. Returns the applied value.
    pub fn set_volume(&self, volume: f32) -> f32 {
        let mut inner = self.inner.lock();
        if volume.is_nan() {
            return inner.volume;
        }
        inner.volume = volume.clamp(0.0, 1.0);
        if let Some(element) = &inner.element {
            element.set_volume(inner.volume);
        }
        inner.volume
    }

    /// Advance per the shuffle and repeat rules.
    ///
    /// Without shuffle or repeat, `next` at the end of the queue does nothing.
    #[instrument(skip(self))]
    pub async fn next(&self) -> Result<()> {
        self.advance(None).await.map(|_| ())
    }

    /// Step back one track. Index 0 always wraps to the last track.
    #[instrument(skip(self))]
    pub async fn previous(&self) -> Result<()> {
        let bound = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let target = inner
                .queue
                .previous_index()
                .and_then(|index| inner.queue.set_cursor(index).cloned());
            match target {
                Some(track) => self.bind_locked(inner, track)?,
                None => return Ok(()),
            }
        };

        self.start_bound(bound).await
    }

    /// Turn shuffle on (fresh permutation) or off (restore supplied order).
    pub fn set_shuffle(&self, shuffle: bool) {
        let event = {
            let mut inner = self.inner.lock();
            if inner.shuffle == shuffle {
                return;
            }
            inner.apply_shuffle(shuffle);
            inner.queue_event()
        };
        debug!(shuffle, "Shuffle changed");
        self.emit(event);
    }

    /// Repeat only changes what `next` does at the end of the queue.
    pub fn set_repeat(&self, repeat: bool) {
        let event = {
            let mut inner = self.inner.lock();
            if inner.repeat == repeat {
                return;
            }
            inner.repeat = repeat;
            inner.queue_event()
        };
        debug!(repeat, "Repeat changed");
        self.emit(event);
    }

    /// Tear the session down: flush, unbind the element, clear the queue.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let (seconds, track_id) = {
            let mut inner = self.inner.lock();
            let seconds = inner.ledger.take_flush(self.clock.now());
            if let Some(element) = &inner.element {
                element.pause();
                element.detach();
                element.clear_source();
            }
            inner.binding = inner.binding.next();
            let track_id = inner.bound_id();
            inner.bound_track = None;
            inner.queue.clear();
            inner.state = PlaybackState::Idle;
            inner.play_counted = false;
            inner.ledger.reset();
            (seconds, track_id)
        };

        if let Some(port) = &self.media_session {
            port.set_metadata(None);
        }
        self.publish_state(PlaybackState::Idle);
        self.emit(PlaybackEvent::Stopped { track_id });
        info!("Playback session stopped");
        self.flush(seconds).await;
    }

    /// Dispatch a transport command received from OS media controls.
    pub async fn handle_media_action(&self, action: MediaAction) -> Result<()> {
        debug!(?action, "Media action");
        match action {
            MediaAction::Play => {
                if self.state().is_active() {
                    Ok(())
                } else {
                    self.toggle_play().await
                }
            }
            MediaAction::Pause => {
                self.pause().await;
                Ok(())
            }
            MediaAction::NextTrack => self.next().await,
            MediaAction::PreviousTrack => self.previous().await,
            MediaAction::SeekTo(position) => self.seek(position).map(|_| ()),
        }
    }

    // ========================================================================
    // Audio element events
    // ========================================================================

    /// Handle an event raised by the audio element under `binding`.
    ///
    /// Events from superseded bindings are ignored. Failures are logged and
    /// turned into state transitions.
    pub async fn handle_audio_event(&self, binding: BindingId, event: AudioEvent) {
        match event {
            AudioEvent::TimeUpdate => self.on_time_update(binding),
            AudioEvent::Playing => self.on_element_playing(binding).await,
            AudioEvent::Pause => self.on_element_paused(binding).await,
            AudioEvent::Ended => self.on_ended(binding).await,
            AudioEvent::Error { message } => self.on_element_error(binding, message),
        }
    }

    fn on_time_update(&self, binding: BindingId) {
        let mut inner = self.inner.lock();
        if !inner.is_bound(binding) || inner.state != PlaybackState::Playing {
            return;
        }
        let paused = inner
            .element
            .as_ref()
            .map(|element| element.is_paused())
            .unwrap_or(true);
        if paused {
            return;
        }

        match inner.ledger.record_sample(self.clock.now()) {
            SampleOutcome::Credited(secs) => trace!(secs, "Listening time credited"),
            SampleOutcome::Discarded(secs) => debug!(secs, "Discarded listening interval"),
            SampleOutcome::Started => {}
        }
    }

    /// Native start, e.g. the element's own control after a blocked autoplay.
    async fn on_element_playing(&self, binding: BindingId) {
        let (event, uncounted) = {
            let mut inner = self.inner.lock();
            if !inner.is_bound(binding) || inner.state != PlaybackState::Paused {
                return;
            }
            inner.state = PlaybackState::Playing;
            inner.ledger.clear_sample();
            let uncounted = if inner.play_counted {
                None
            } else {
                inner.play_counted = true;
                inner.bound_track.clone()
            };
            let event = match (&uncounted, inner.bound_id()) {
                (Some(track), _) => Some(PlaybackEvent::Started {
                    track_id: track.id.to_string(),
                    title: track.title.clone(),
                }),
                (None, Some(track_id)) => Some(PlaybackEvent::Resumed {
                    track_id,
                    position_secs: inner.position(),
                }),
                (None, None) => None,
            };
            (event, uncounted)
        };

        self.publish_state(PlaybackState::Playing);
        if let Some(event) = event {
            self.emit(event);
        }
        if let Some(track) = uncounted {
            self.record_play(&track).await;
        }
    }

    async fn on_element_paused(&self, binding: BindingId) {
        let (seconds, event) = {
            let mut inner = self.inner.lock();
            if !inner.is_bound(binding) || inner.state != PlaybackState::Playing {
                return;
            }
            inner.state = PlaybackState::Paused;
            let seconds = inner.ledger.take_flush(self.clock.now());
            let event = inner.bound_id().map(|track_id| PlaybackEvent::Paused {
                track_id,
                position_secs: inner.position(),
            });
            (seconds, event)
        };

        self.publish_state(PlaybackState::Paused);
        if let Some(event) = event {
            self.emit(event);
        }
        self.flush(seconds).await;
    }

    async fn on_ended(&self, binding: BindingId) {
        let (seconds, track_id) = {
            let mut inner = self.inner.lock();
            if !inner.is_bound(binding) {
                return;
            }
            inner.state = PlaybackState::Ended;
            (inner.ledger.take_flush(self.clock.now()), inner.bound_id())
        };

        self.publish_state(PlaybackState::Ended);
        if let Some(track_id) = &track_id {
            self.emit(PlaybackEvent::Completed {
                track_id: track_id.clone(),
            });
        }
        self.flush(seconds).await;

        match self.advance(Some(binding)).await {
            Ok(Advance::Moved) | Ok(Advance::Superseded) => {}
            Ok(Advance::Exhausted) => {
                info!("Queue exhausted");
                self.publish_state(PlaybackState::Idle);
                self.emit(PlaybackEvent::Stopped { track_id });
            }
            Err(err) => warn!(error = %err, "Auto-advance after track end failed"),
        }
    }

    fn on_element_error(&self, binding: BindingId, message: String) {
        let track_id = {
            let mut inner = self.inner.lock();
            if !inner.is_bound(binding) {
                return;
            }
            inner.state = PlaybackState::Idle;
            inner.bound_id()
        };

        warn!(error = %message, "Audio element reported an error");
        self.publish_state(PlaybackState::Idle);
        self.emit(PlaybackEvent::Error {
            track_id,
            message,
            recoverable: false,
        });
    }

    // ========================================================================
    // Periodic flush
    // ========================================================================

    /// Flush if playing, signed in and the threshold has been reached.
    pub async fn tick(&self) {
        let seconds = {
            let mut inner = self.inner.lock();
            if inner.state != PlaybackState::Playing
                || !inner.ledger.reached(self.settings.flush_threshold_secs)
                || !self.backend.is_authenticated()
            {
                return;
            }
            inner.ledger.take_flush(self.clock.now())
        };

        self.flush(seconds).await;
    }

    /// Drive [`tick`](Self::tick) every `flush_interval` on the tokio runtime.
    ///
    /// The task holds a weak reference and ends once the session is dropped.
    pub fn spawn_flush_timer(self: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::downgrade(self);
        let period = self.settings.flush_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                let Some(session) = session.upgrade() else {
                    debug!("Playback session dropped, stopping flush timer");
                    break;
                };
                session.tick().await;
            }
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> PlaybackState {
        self.inner.lock().state
    }

    pub fn volume(&self) -> f32 {
        self.inner.lock().volume
    }

    pub fn current_track(&self) -> Option<Arc<Track>> {
        self.inner.lock().bound_track.clone()
    }

    /// Generation of the current binding, as attached to the element.
    pub fn binding(&self) -> BindingId {
        self.inner.lock().binding
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock();
        SessionSnapshot {
            state: inner.state,
            current_track: inner.bound_track.as_deref().cloned(),
            queue: inner.queue.ids(),
            cursor: inner.queue.cursor(),
            shuffle: inner.shuffle,
            repeat: inner.repeat,
            volume: inner.volume,
            pending_listening_secs: inner.ledger.accumulated_secs(),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Point the element at `track` under a fresh generation.
    ///
    /// Must be called with the lock held; performs no await.
    fn bind_locked(&self, inner: &mut SessionInner, track: Arc<Track>) -> Result<Bound> {
        let element = match &inner.element {
            Some(element) => Arc::clone(element),
            None => {
                let element = self
                    .element_factory
                    .create()
                    .map_err(|err| PlaybackError::AudioElementUnavailable(err.to_string()))?;
                element.set_volume(inner.volume);
                debug!("Audio element created");
                inner.element = Some(Arc::clone(&element));
                element
            }
        };

        element.detach();
        inner.binding = inner.binding.next();
        element.attach(inner.binding);
        element.set_source(&track.audio_url);

        inner.bound_track = Some(Arc::clone(&track));
        inner.state = PlaybackState::Loading;
        inner.play_counted = false;
        inner.ledger.reset();

        Ok(Bound {
            element,
            binding: inner.binding,
            track,
            queue_event: inner.queue_event(),
        })
    }

    async fn start_bound(&self, bound: Bound) -> Result<()> {
        let Bound {
            element,
            binding,
            track,
            queue_event,
        } = bound;

        debug!(
            track_id = %track.id,
            generation = binding.generation(),
            "Track bound"
        );
        if let Some(port) = &self.media_session {
            port.set_metadata(Some(MediaMetadata {
                title: track.title.clone(),
                artist: track.artist.clone(),
                artwork: track.artwork_url.clone(),
            }));
        }
        self.publish_state(PlaybackState::Loading);
        self.emit(queue_event);
        self.emit(PlaybackEvent::TrackLoading {
            track_id: track.id.to_string(),
            title: track.title.clone(),
        });

        let result = element.play().await;
        self.finish_start(binding, StartKind::Bind, result).await
    }

    async fn resume(&self) -> Result<()> {
        let (element, binding) = {
            let mut inner = self.inner.lock();
            let element = match (&inner.element, &inner.bound_track) {
                (Some(element), Some(_)) => Arc::clone(element),
                _ => return Err(PlaybackError::NoTrackLoaded),
            };
            inner.ledger.clear_sample();
            (element, inner.binding)
        };

        let result = element.play().await;
        self.finish_start(binding, StartKind::Resume, result).await
    }

    /// Apply the outcome of an element `play()` that was started under `binding`.
    async fn finish_start(
        &self,
        binding: BindingId,
        kind: StartKind,
        result: BridgeResult<()>,
    ) -> Result<()> {
        let outcome = {
            let mut inner = self.inner.lock();
            if !inner.is_bound(binding) {
                debug!(
                    generation = binding.generation(),
                    "Ignoring start of superseded binding"
                );
                return Ok(());
            }
            if kind == StartKind::Bind && inner.state != PlaybackState::Loading {
                debug!(state = ?inner.state, "Load finished after the binding left Loading");
                return Ok(());
            }

            let track = inner.bound_track.clone();
            match result {
                Ok(()) => {
                    inner.state = PlaybackState::Playing;
                    inner.ledger.clear_sample();
                    let count = !inner.play_counted;
                    inner.play_counted = true;
                    Ok((track, count, inner.position()))
                }
                Err(err) => {
                    let state = match (kind, &err) {
                        (StartKind::Resume, _) | (_, BridgeError::PlaybackBlocked(_)) => {
                            PlaybackState::Paused
                        }
                        _ => PlaybackState::Idle,
                    };
                    inner.state = state;
                    Err((track, err, state))
                }
            }
        };

        match outcome {
            Ok((track, count, position)) => {
                self.publish_state(PlaybackState::Playing);
                if let Some(track) = &track {
                    let track_id = track.id.to_string();
                    self.emit(match kind {
                        StartKind::Bind => PlaybackEvent::Started {
                            track_id,
                            title: track.title.clone(),
                        },
                        StartKind::Resume => PlaybackEvent::Resumed {
                            track_id,
                            position_secs: position,
                        },
                    });
                }
                if let (true, Some(track)) = (count, track) {
                    self.record_play(&track).await;
                }
                Ok(())
            }
            Err((track, err, state)) => {
                let recoverable = state == PlaybackState::Paused;
                warn!(error = %err, ?kind, ?state, "Audio element failed to start");
                self.publish_state(state);
                self.emit(PlaybackEvent::Error {
                    track_id: track.map(|track| track.id.to_string()),
                    message: err.to_string(),
                    recoverable,
                });
                Err(match err {
                    BridgeError::PlaybackBlocked(message) => PlaybackError::PlaybackBlocked(message),
                    BridgeError::MediaLoad(message) => PlaybackError::SourceUnavailable(message),
                    other => PlaybackError::Bridge(other),
                })
            }
        }
    }

    /// Count the first start of the current binding. Failures are logged only.
    async fn record_play(&self, track: &Track) {
        info!(track_id = %track.id, "Playback started");
        if let Err(err) = self.backend.play_song(&track.id).await {
            warn!(track_id = %track.id, error = %err, "Failed to record play");
        }
    }

    /// Move to the next track. With `expected`, only if that binding is still current.
    async fn advance(&self, expected: Option<BindingId>) -> Result<Advance> {
        let bound = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            if let Some(expected) = expected {
                if inner.binding != expected {
                    return Ok(Advance::Superseded);
                }
            }

            let target = inner
                .queue
                .next_index(inner.shuffle, inner.repeat, &mut inner.rng)
                .and_then(|index| inner.queue.set_cursor(index).cloned());
            match target {
                Some(track) => self.bind_locked(inner, track)?,
                None => {
                    if inner.state == PlaybackState::Ended {
                        inner.state = PlaybackState::Idle;
                    }
                    return Ok(Advance::Exhausted);
                }
            }
        };

        self.start_bound(bound).await?;
        Ok(Advance::Moved)
    }

    async fn flush(&self, seconds: u64) {
        if seconds == 0 {
            return;
        }
        if !self.backend.is_authenticated() {
            debug!(seconds, "Dropping listening time for signed-out session");
            return;
        }

        match self.backend.add_listening_time(seconds).await {
            Ok(()) => {
                debug!(seconds, "Listening time flushed");
                self.emit(PlaybackEvent::ListeningTimeFlushed { seconds });
            }
            Err(err) => warn!(seconds, error = %err, "Failed to flush listening time"),
        }
    }

    fn publish_state(&self, state: PlaybackState) {
        if let Some(port) = &self.media_session {
            port.set_playback_state(state.to_media_state());
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Playback(event)).ok();
        }
    }
}
