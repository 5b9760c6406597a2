//! Run session: one player's runs on one field
//!
//! Owns the [`GameState`] and wires it to its collaborators: the frame
//! [`Ticker`], the [`StartGate`] and the [`ScoreSubmitter`]. Hosts feed it
//! input and frame callbacks and read back a [`Snapshot`] or a
//! [`RenderFrame`]; they never touch the live state.

use crate::error::{ConfigError, StartError};
use crate::gate::StartGate;
use crate::leaderboard::{ScoreRecord, ScoreSubmitter};
use crate::renderer::frame::RenderFrame;
use crate::scheduler::{FrameHandle, FrameSource, Ticker};
use crate::sim::{GameEvent, GameState, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

pub struct Session<S: FrameSource> {
    state: GameState,
    ticker: Ticker<S>,
    gate: Box<dyn StartGate>,
    submitter: Box<dyn ScoreSubmitter>,
    player_name: String,
    /// Input collected since the last tick
    input: TickInput,
    /// The current run's result went to the submitter
    submitted: bool,
}

impl<S: FrameSource> Session<S> {
    pub fn new(
        tuning: Tuning,
        frames: S,
        gate: Box<dyn StartGate>,
        submitter: Box<dyn ScoreSubmitter>,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(tuning, 0),
            ticker: Ticker::new(frames),
            gate,
            submitter,
            player_name: String::new(),
            input: TickInput::default(),
            submitted: false,
        })
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = name.trim().to_string();
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Start a run. From Ended this first resets to Idle.
    pub fn request_start(&mut self, now_ms: f64, seed: u64) -> Result<(), StartError> {
        if self.state.is_playing() {
            return Err(StartError::AlreadyRunning);
        }
        if self.player_name.is_empty() {
            return Err(StartError::MissingPlayerName);
        }
        if !self.gate.permits_start() {
            return Err(StartError::GateClosed);
        }

        // Acquire the frame first so a refusal leaves state and gate untouched
        if !self.ticker.start() {
            return Err(StartError::NoFrames);
        }
        if self.state.is_ended() {
            self.state.reset();
        }
        self.state.start(now_ms, seed);
        self.gate.on_run_started();
        self.input = TickInput::default();
        self.submitted = false;
        Ok(())
    }

    /// "Play again": Ended -> Idle -> start
    pub fn play_again(&mut self, now_ms: f64, seed: u64) -> Result<(), StartError> {
        self.reset();
        self.request_start(now_ms, seed)
    }

    /// Queue a flap for the next tick. No-op outside an active run.
    pub fn flap(&mut self) {
        if self.state.is_playing() {
            self.input.flap = true;
        }
    }

    /// Frame callback. Returns false if `handle` is not the frame this
    /// session is waiting for (released or stale).
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> bool {
        if !self.ticker.begin_frame(handle) {
            return false;
        }

        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input, now_ms);

        if self.state.is_playing() {
            self.ticker.end_frame();
        } else {
            self.ticker.stop();
            self.finish_run();
        }
        true
    }

    /// Hand the result of a finished run to the submitter, once
    fn finish_run(&mut self) {
        if self.submitted || !self.state.is_ended() {
            return;
        }
        self.submitted = true;

        let Some(record) = ScoreRecord::for_run(&self.player_name, self.state.score.total()) else {
            return;
        };
        let score = record.score;
        match self.submitter.submit(record) {
            Ok(()) => log::info!("Submitted score {} for {}", score, self.player_name),
            Err(e) => log::warn!("Score submission failed: {}", e),
        }
    }

    /// Stop ticking and return to Idle
    pub fn reset(&mut self) {
        self.ticker.stop();
        self.state.reset();
        self.input = TickInput::default();
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn render_frame(&self, now_ms: f64, reduced_motion: bool) -> RenderFrame {
        RenderFrame::from_state(&self.state, now_ms, reduced_motion)
    }

    /// Read-only view of the live state (headless drivers, debugging)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn frames(&self) -> &S {
        self.ticker.source()
    }

    pub fn frames_mut(&mut self) -> &mut S {
        self.ticker.source_mut()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::SubmitError;
    use crate::gate::{OpenGate, PaymentGate};
    use crate::scheduler::ManualFrames;
    use crate::sim::{Collision, Obstacle, RunPhase};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Default)]
    struct Recorder {
        records: Vec<ScoreRecord>,
        fail: bool,
    }

    impl ScoreSubmitter for Recorder {
        fn submit(&mut self, record: ScoreRecord) -> Result<(), SubmitError> {
            self.records.push(record);
            if self.fail {
                Err(SubmitError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    fn session_with(recorder: Rc<RefCell<Recorder>>) -> Session<ManualFrames> {
        Session::new(
            Tuning::default(),
            ManualFrames::default(),
            Box::new(OpenGate),
            Box::new(recorder),
        )
        .unwrap()
    }

    /// Fire the outstanding frame at `now_ms`
    fn step(session: &mut Session<ManualFrames>, now_ms: f64) -> bool {
        match session.frames_mut().fire() {
            Some(handle) => session.on_frame(handle, now_ms),
            None => false,
        }
    }

    /// Run to an out-of-bounds end with five passed obstacles
    fn end_with_five(session: &mut Session<ManualFrames>) {
        for _ in 0..5 {
            session.state.obstacles.push(Obstacle::new(0.0, 100.0, 80.0, 250.0));
        }
        assert!(step(session, FRAME_MS));
        assert_eq!(session.state.score.total(), 5);

        session.state.phase = RunPhase::Playing;
        session.state.actor.y = -200.0;
        assert!(step(session, 2000.0));
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let tuning = Tuning {
            obstacle_gap: 20.0,
            ..Tuning::default()
        };
        let result = Session::new(
            tuning,
            ManualFrames::default(),
            Box::new(OpenGate),
            Box::new(Recorder::default()),
        );
        assert!(matches!(result, Err(ConfigError::GapTooSmall { .. })));
    }

    #[test]
    fn test_start_requires_player_name() {
        let mut session = session_with(Rc::default());
        assert_eq!(
            session.request_start(0.0, 1),
            Err(StartError::MissingPlayerName)
        );
        session.set_player_name("   ");
        assert_eq!(
            session.request_start(0.0, 1),
            Err(StartError::MissingPlayerName)
        );
        assert!(!session.is_ticking());

        session.set_player_name(" Ada ");
        assert_eq!(session.player_name(), "Ada");
        assert_eq!(session.request_start(0.0, 1), Ok(()));
        assert_eq!(session.snapshot().phase, RunPhase::Immune);
        assert!(session.is_ticking());
        assert_eq!(
            session.request_start(1.0, 2),
            Err(StartError::AlreadyRunning)
        );
    }

    #[test]
    fn test_unschedulable_start_leaves_state_untouched() {
        struct Refusing;
        impl FrameSource for Refusing {
            fn request_frame(&mut self) -> Option<FrameHandle> {
                None
            }
            fn cancel_frame(&mut self, _handle: FrameHandle) {}
        }

        let gate = Rc::new(RefCell::new(PaymentGate::default()));
        gate.borrow_mut().begin_payment();
        gate.borrow_mut().confirm();
        let mut session = Session::new(
            Tuning::default(),
            Refusing,
            Box::new(gate.clone()),
            Box::new(Recorder::default()),
        )
        .unwrap();
        session.set_player_name("Ada");

        assert_eq!(session.request_start(0.0, 1), Err(StartError::NoFrames));
        assert_eq!(session.snapshot().phase, RunPhase::Idle);
        assert!(session.drain_events().is_empty());
        assert!(!session.is_ticking());
        // Payment not spent, and a retry is not refused as AlreadyRunning
        assert!(gate.borrow().permits_start());
        assert_eq!(session.request_start(1.0, 2), Err(StartError::NoFrames));
    }

    #[test]
    fn test_start_waits_for_payment() {
        let gate = Rc::new(RefCell::new(PaymentGate::default()));
        let mut session = Session::new(
            Tuning::default(),
            ManualFrames::default(),
            Box::new(gate.clone()),
            Box::new(Recorder::default()),
        )
        .unwrap();
        session.set_player_name("Ada");

        assert_eq!(session.request_start(0.0, 1), Err(StartError::GateClosed));
        gate.borrow_mut().begin_payment();
        assert_eq!(session.request_start(0.0, 1), Err(StartError::GateClosed));
        gate.borrow_mut().confirm();
        assert_eq!(session.request_start(0.0, 1), Ok(()));

        // Payment is spent on that run
        assert!(!gate.borrow().permits_start());
    }

    #[test]
    fn test_run_end_submits_exactly_once() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut session = session_with(recorder.clone());
        session.set_player_name("Ada");
        session.request_start(0.0, 7).unwrap();

        end_with_five(&mut session);
        let snapshot = session.snapshot();
        assert!(snapshot.ended);
        assert_eq!(snapshot.score, 5);
        assert!(!session.is_ticking());
        assert_eq!(
            recorder.borrow().records,
            vec![ScoreRecord {
                player_name: "Ada".to_string(),
                score: 5
            }]
        );

        // No more frames after the end
        assert!(!step(&mut session, 2100.0));
        assert_eq!(recorder.borrow().records.len(), 1);
        assert!(session.drain_events().contains(&GameEvent::RunEnded {
            final_score: 5,
            cause: Collision::OutOfBounds
        }));
    }

    #[test]
    fn test_failed_submission_leaves_result_untouched() {
        let recorder = Rc::new(RefCell::new(Recorder {
            fail: true,
            ..Recorder::default()
        }));
        let mut session = session_with(recorder.clone());
        session.set_player_name("Ada");
        session.request_start(0.0, 7).unwrap();

        end_with_five(&mut session);
        assert_eq!(recorder.borrow().records.len(), 1);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, RunPhase::Ended);
        assert_eq!(snapshot.score, 5);
    }

    #[test]
    fn test_zero_score_is_not_submitted() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut session = session_with(recorder.clone());
        session.set_player_name("Ada");
        session.request_start(0.0, 7).unwrap();

        session.state.phase = RunPhase::Playing;
        session.state.actor.y = 700.0;
        assert!(step(&mut session, FRAME_MS));
        assert!(session.snapshot().ended);
        assert!(recorder.borrow().records.is_empty());
    }

    #[test]
    fn test_flap_outside_run_is_ignored() {
        let mut session = session_with(Rc::default());
        session.flap();
        assert!(!session.input.flap);

        session.set_player_name("Ada");
        session.request_start(0.0, 7).unwrap();
        session.flap();
        assert!(step(&mut session, FRAME_MS));
        assert_eq!(session.state.actor.velocity, -7.75);
        // Consumed by that tick
        assert!(!session.input.flap);
    }

    #[test]
    fn test_reset_releases_frame() {
        let mut session = session_with(Rc::default());
        session.set_player_name("Ada");
        session.request_start(0.0, 7).unwrap();
        let stale = session.frames().outstanding.unwrap();

        session.reset();
        assert_eq!(session.snapshot().phase, RunPhase::Idle);
        assert_eq!(session.frames().outstanding, None);
        assert_eq!(session.frames().cancelled, 1);
        assert!(!session.on_frame(stale, FRAME_MS));
        assert_eq!(session.state.ticks, 0);
    }

    #[test]
    fn test_play_again_starts_fresh_run() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut session = session_with(recorder.clone());
        session.set_player_name("Ada");
        session.request_start(0.0, 7).unwrap();
        end_with_five(&mut session);

        session.play_again(5000.0, 8).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, RunPhase::Immune);
        assert_eq!(snapshot.score, 0);
        assert!(session.state.obstacles.is_empty());
        assert!(session.is_ticking());
        assert!(step(&mut session, 5000.0 + FRAME_MS));
        assert_eq!(session.state.ticks, 1);
    }

    #[test]
    fn test_render_frame_reflects_run() {
        let mut session = session_with(Rc::default());
        session.set_player_name("Ada");
        session.request_start(0.0, 7).unwrap();
        step(&mut session, FRAME_MS);

        let frame = session.render_frame(FRAME_MS, false);
        assert!(frame.immune);
        assert!(frame.actor.alpha < 1.0);
        assert_eq!(frame.obstacles.len(), 1);
        assert_eq!(session.render_frame(FRAME_MS, true).actor.alpha, 1.0);
    }
}
