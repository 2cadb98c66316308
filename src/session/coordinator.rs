//! Session coordinator
//!
//! Wires tilt classifier -> action gate -> scoring -> word queue -> history,
//! runs the round timer, and brackets the round with recorder start/stop.
//!
//! When time runs out the coordinator waits for the recorder to hand back
//! the finished file, but never longer than the configured failsafe. A
//! manual exit or a backgrounded app completes immediately without a
//! recording.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::recorder::{Recorder, RecorderError, RecordingHandle};
use super::sensor::SensorFeed;
use super::state::{AppState, ConfigError, FinishReason, GameStatus, Session, SessionConfig, SessionEvent};
use crate::clock::Clock;
use crate::results::RoundResult;
use crate::round::{HistoryEntry, HistoryLog, Outcome, Prompt, RoundTimer, TimerEvent, WordQueue};
use crate::tilt::{Action, ActionGate, TiltClassifier, TiltSample, TiltState};

/// Owns one round and every collaborator it drives
pub struct SessionCoordinator<R: Recorder, S: SensorFeed, C: Clock> {
    config: SessionConfig,
    session: Session,
    classifier: TiltClassifier,
    gate: ActionGate,
    timer: RoundTimer,
    recorder: R,
    sensor: S,
    clock: C,
    rng: Pcg32,
    sensor_subscribed: bool,
    /// A start was accepted and no stop has been issued since
    recording_active: bool,
    /// A stop has been issued since the last start
    recorder_stopped: bool,
    /// Recording that finished before the round did
    early_recording: Option<RecordingHandle>,
    /// Failsafe deadline while waiting on the recorder
    awaiting_recorder_until: Option<u64>,
    result: Option<RoundResult>,
    on_complete: Option<Box<dyn FnMut(&RoundResult)>>,
    events: Vec<SessionEvent>,
}

impl<R: Recorder, S: SensorFeed, C: Clock> SessionCoordinator<R, S, C> {
    pub fn new(config: SessionConfig, recorder: R, sensor: S, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(config.seed);
        let queue = WordQueue::initialize(&config.pool, &mut rng);

        Ok(Self {
            classifier: TiltClassifier::new(config.trigger_threshold, config.reset_threshold),
            gate: ActionGate::new(),
            timer: RoundTimer::new(config.duration_secs),
            session: Session::new(queue),
            config,
            recorder,
            sensor,
            clock,
            rng,
            sensor_subscribed: false,
            recording_active: false,
            recorder_stopped: false,
            early_recording: None,
            awaiting_recorder_until: None,
            result: None,
            on_complete: None,
            events: Vec::new(),
        })
    }

    /// Install the completion handler, replacing any previous one. Looked
    /// up at completion time.
    pub fn set_on_complete(&mut self, handler: impl FnMut(&RoundResult) + 'static) {
        self.on_complete = Some(Box::new(handler));
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// `Ready -> Playing`
    pub fn start_game(&mut self) {
        if self.session.status != GameStatus::Ready {
            log::warn!("start_game ignored in {:?}", self.session.status);
            return;
        }

        let now = self.clock.now_ms();

        self.session.score = 0;
        self.session.answered_count = 0;
        self.session.history.clear();
        self.session.queue = WordQueue::initialize(&self.config.pool, &mut self.rng);
        self.session.start_timestamp = Some(now);
        if self.session.queue.is_fallback() {
            log::warn!("Prompt pool is empty, playing placeholder prompts");
        }

        let first = self.session.current_word().to_string();
        self.session.history.append(HistoryEntry::pending(first, 0));

        self.classifier.reset();
        self.gate.set_enabled(true);
        self.timer.reset(self.config.duration_secs);
        self.timer.start(now);

        self.session.status = GameStatus::Playing;
        self.events.push(SessionEvent::StatusChanged(GameStatus::Playing));
        self.set_music_level(self.config.play_volume);
        log::info!(
            "Round started: {} prompts, {}s",
            self.session.queue.len(),
            self.config.duration_secs
        );

        match self.sensor.subscribe(self.config.sample_interval_ms) {
            Ok(()) => self.sensor_subscribed = true,
            Err(e) => log::warn!("Tilt input unavailable, round will time out: {e}"),
        }

        if self.config.record_video {
            self.recorder_stopped = false;
            match self.recorder.start_recording() {
                Ok(()) => self.recording_active = true,
                Err(e) => log::warn!("Recording failed to start: {e}"),
            }
        }
    }

    /// One accelerometer sample
    pub fn on_sample(&mut self, sample: TiltSample) {
        if self.session.status != GameStatus::Playing {
            return;
        }

        // A tick that was already due wins over this sample
        let now = self.clock.now_ms();
        self.poll_timer(now);
        if self.session.status != GameStatus::Playing {
            return;
        }

        let tilt = self.classifier.update(sample);
        if let Some(action) = self.gate.on_tilt_changed(tilt) {
            self.apply_action(action, now);
        }
    }

    /// Let time pass: timer ticks while playing, failsafe while finishing
    pub fn advance(&mut self) {
        let now = self.clock.now_ms();
        match self.session.status {
            GameStatus::Ready => {}
            GameStatus::Playing => self.poll_timer(now),
            GameStatus::Finished => {
                if let Some(deadline) = self.awaiting_recorder_until {
                    if now >= deadline {
                        log::info!("Recorder did not report back in time, finishing without video");
                        self.complete(None);
                    }
                }
            }
        }
    }

    /// The recorder finalized a file
    pub fn on_recording_finished(&mut self, handle: RecordingHandle) {
        if self.result.is_some() {
            log::debug!("Recording {} arrived after completion, ignoring", handle.uri());
            return;
        }

        if self.awaiting_recorder_until.is_some() {
            self.complete(Some(handle));
        } else {
            // Capture ended on its own before the round did
            log::info!("Recording finished early: {}", handle.uri());
            self.recording_active = false;
            self.early_recording = Some(handle);
        }
    }

    /// Host app moved to the foreground or background
    pub fn on_app_state(&mut self, state: AppState) {
        match state {
            AppState::Active => {}
            AppState::Inactive | AppState::Background => {
                if self.session.status == GameStatus::Playing {
                    log::info!("App left the foreground, stopping round");
                    self.finish(FinishReason::Backgrounded);
                } else {
                    self.stop_recorder_quietly();
                }
            }
        }
    }

    /// Player left the round
    pub fn exit(&mut self) {
        if self.session.status == GameStatus::Finished {
            return;
        }
        self.finish(FinishReason::Exited);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn apply_action(&mut self, action: Action, now: u64) {
        let session = &mut self.session;
        session.answered_count += 1;
        if action.correct {
            session.score += 1;
        }

        session.history.finalize_last(Outcome::from_correct(action.correct));
        let next_word = session.queue.advance().word().to_string();
        let offset = session.offset_ms(now);
        session
            .history
            .append(HistoryEntry::pending(next_word.clone(), offset));

        log::debug!(
            "{} at {}ms, score {}/{}",
            if action.correct { "Correct" } else { "Pass" },
            offset,
            session.score,
            session.answered_count
        );

        self.events.push(SessionEvent::Scored {
            correct: action.correct,
            score: session.score,
            answered: session.answered_count,
            next_word,
            feedback: self.config.feedback_for(action.correct),
        });
    }

    fn poll_timer(&mut self, now: u64) {
        for event in self.timer.poll(now) {
            match event {
                TimerEvent::Tick { time_left } => {
                    self.events.push(SessionEvent::TimerTick { time_left });
                }
                TimerEvent::Expired => self.finish(FinishReason::TimeUp),
            }
        }
    }

    /// Enter `Finished`. Each teardown step runs regardless of the others.
    fn finish(&mut self, reason: FinishReason) {
        if self.session.status == GameStatus::Finished {
            return;
        }

        self.session.status = GameStatus::Finished;
        self.session.finish_reason = Some(reason);
        self.timer.stop();
        self.gate.set_enabled(false);
        self.release_sensor();

        self.events.push(SessionEvent::StatusChanged(GameStatus::Finished));
        self.events.push(SessionEvent::Finished(reason));
        self.set_music_level(self.config.idle_volume);
        log::info!(
            "Round finished ({:?}): {}/{}",
            reason,
            self.session.score,
            self.session.answered_count
        );

        match reason {
            FinishReason::TimeUp => self.finish_recording(),
            FinishReason::Exited | FinishReason::Backgrounded => {
                self.stop_recorder_quietly();
                self.complete(None);
            }
        }
    }

    /// Stop the recorder and either complete now or wait for its callback.
    /// Only a recording that was believed active is waited on.
    fn finish_recording(&mut self) {
        if !self.config.record_video {
            let early = self.early_recording.take();
            self.complete(early);
            return;
        }

        let was_recording = self.recording_active;
        match self.stop_recorder() {
            Ok(Some(handle)) => self.complete(Some(handle)),
            Ok(None) => match self.early_recording.take() {
                Some(handle) => self.complete(Some(handle)),
                None if was_recording => {
                    let deadline = self.clock.now_ms().saturating_add(self.config.failsafe_ms);
                    self.awaiting_recorder_until = Some(deadline);
                }
                None => self.complete(None),
            },
            Err(e) => {
                log::warn!("Recording failed to stop: {e}");
                let early = self.early_recording.take();
                self.complete(early);
            }
        }
    }

    /// Issue a stop whether or not a recording is believed active
    fn stop_recorder(&mut self) -> Result<Option<RecordingHandle>, RecorderError> {
        self.recording_active = false;
        self.recorder_stopped = true;
        self.recorder.stop_recording()
    }

    /// Fire-and-forget stop
    fn stop_recorder_quietly(&mut self) {
        if !self.config.record_video {
            return;
        }
        if let Err(e) = self.stop_recorder() {
            log::warn!("Recording failed to stop: {e}");
        }
    }

    fn set_music_level(&mut self, modifier: f32) {
        if self.config.music {
            let level = self.config.music_volume * modifier;
            self.events.push(SessionEvent::MusicVolume(level));
        }
    }

    fn release_sensor(&mut self) {
        if self.sensor_subscribed {
            self.sensor.unsubscribe();
            self.sensor_subscribed = false;
        }
    }

    /// Deliver the round result, once
    fn complete(&mut self, recording: Option<RecordingHandle>) {
        if self.result.is_some() {
            return;
        }
        self.awaiting_recorder_until = None;

        let session = &self.session;
        let result = RoundResult {
            score: session.score,
            total: session.answered_count,
            history: session.history.clone(),
            recording,
            finish_reason: session.finish_reason.unwrap_or(FinishReason::Exited),
            used_fallback_pool: session.queue.is_fallback(),
        };

        if let Some(handler) = self.on_complete.as_mut() {
            handler(&result);
        }
        self.events.push(SessionEvent::Completed(result.clone()));
        self.result = Some(result);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn answered_count(&self) -> u32 {
        self.session.answered_count
    }

    pub fn time_left(&self) -> u32 {
        self.timer.time_left()
    }

    pub fn current_prompt(&self) -> &Prompt {
        self.session.queue.current()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.session.history
    }

    /// Current tilt, for the overlay tint
    pub fn tilt(&self) -> TiltState {
        self.classifier.state()
    }

    /// Whether the next tilt will score (drives the "tilt" / "level the
    /// phone" hint)
    pub fn is_ready_for_action(&self) -> bool {
        self.gate.is_ready()
    }

    /// True after time ran out while the recorder is still flushing
    pub fn is_awaiting_recorder(&self) -> bool {
        self.awaiting_recorder_until.is_some()
    }

    pub fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// For delivering readiness signals to the recorder
    pub fn recorder_mut(&mut self) -> &mut R {
        &mut self.recorder
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }
}

impl<R: Recorder, S: SensorFeed, C: Clock> Drop for SessionCoordinator<R, S, C> {
    fn drop(&mut self) {
        // Screen torn down mid-round: never leave a recording running
        self.release_sensor();
        if !self.recorder_stopped {
            self.stop_recorder_quietly();
        }
    }
}
