//! Game-play orchestration.
//!
//! [`GameSession`] is the logic-thread owner of one game: it issues timer
//! commands, drains the timer's event stream and fans each event out to the
//! audio coordinator, the haptic dispatcher and any extra listeners. Scoring
//! goes through the session too, so every scoring command's timer request
//! and feedback pulse are applied in one place.
//!
//! The frame loop (see [`crate::timer::FrameDriver`]) runs elsewhere and only
//! touches the shared timer; call [`GameSession::pump`] regularly to deliver
//! the events it produced.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::audio::{AudioPlayer, TimerAudioCoordinator};
use crate::config::Config;
use crate::confirm::Confirmation;
use crate::events::{TimerEvent, TimerListener};
use crate::game::{BallType, FoulPoints, GameState, Player};
use crate::haptics::{HapticDispatcher, HapticEngine, HapticPulse};
use crate::lifecycle::{AppLifecycle, AppStatus, LifecycleChange};
use crate::rivalry::RivalryStore;
use crate::scoring::{FrameScoreState, ScoringStack, TimerRequest};
use crate::settings::SharedSettings;
use crate::timer::{SharedTimer, TimerDuration, TimerPhase, TimerSnapshot};

pub struct GameSession {
    timer: SharedTimer,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    audio: TimerAudioCoordinator,
    haptics: HapticDispatcher,
    scoring: ScoringStack,
    game: GameState,
    settings: SharedSettings,
    lifecycle: AppLifecycle,
    listeners: Vec<Box<dyn TimerListener + Send>>,
    winner: Confirmation<Player>,
}

impl GameSession {
    /// Start a session for an already configured game slice.
    pub fn new(
        mut game: GameState,
        settings: SharedSettings,
        config: &Config,
        audio: Box<dyn AudioPlayer>,
        haptics: Box<dyn HapticEngine>,
    ) -> Self {
        let (timer, events) = SharedTimer::new(game.timer_duration);
        game.start_game();
        tracing::info!(
            mode = ?game.mode,
            secs = game.timer_duration.secs(),
            "game session started"
        );
        Self {
            timer,
            events,
            audio: TimerAudioCoordinator::new(audio, settings.clone(), config.audio),
            haptics: HapticDispatcher::new(haptics, settings.clone(), config.haptics),
            scoring: ScoringStack::new(),
            game,
            settings,
            lifecycle: AppLifecycle::default(),
            listeners: Vec::new(),
            winner: Confirmation::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Handle for the frame loop.
    pub fn timer(&self) -> &SharedTimer {
        &self.timer
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer.subscribe()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }

    pub fn phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn score(&self) -> &FrameScoreState {
        self.scoring.score()
    }

    pub fn can_undo(&self) -> bool {
        self.scoring.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.scoring.can_redo()
    }

    pub fn current_player(&self) -> Player {
        self.game.current_player
    }

    pub fn current_player_name(&self) -> &str {
        self.game.current_player_name()
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    pub fn add_listener(&mut self, listener: Box<dyn TimerListener + Send>) {
        self.listeners.push(listener);
    }

    // ── Event delivery ───────────────────────────────────────────────

    /// Deliver every queued timer event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.dispatch(&event);
            handled += 1;
        }
        handled
    }

    /// Feed one frame synchronously, for callers that drive their own loop.
    pub fn advance_frame(&mut self, elapsed: Duration) -> usize {
        self.timer.advance(elapsed);
        self.pump()
    }

    fn dispatch(&mut self, event: &TimerEvent) {
        self.audio.on_timer_event(event);
        self.haptics.on_timer_event(event);
        if *event == TimerEvent::PlayerSwitch {
            self.game.switch_player();
            tracing::debug!(player = %self.game.current_player, "turn passed");
        }
        for listener in &mut self.listeners {
            listener.on_timer_event(event);
        }
    }

    // ── Timer controls ───────────────────────────────────────────────

    /// The timer face was tapped.
    pub fn handle_timer_press(&mut self) {
        if self.timer.phase() == TimerPhase::Running {
            self.audio.stop_ticking();
        }
        self.timer.tap();
        self.pump();
    }

    pub fn handle_pause_resume(&mut self) {
        match self.timer.phase() {
            TimerPhase::Running => self.pause_running(),
            TimerPhase::Paused => {
                self.timer.resume();
                self.game.resume_game();
            }
            TimerPhase::Idle | TimerPhase::Expired => {}
        }
        self.pump();
    }

    /// Leaving the play screen.
    pub fn handle_back(&mut self) {
        self.audio.stop_ticking();
        self.timer.reset();
        self.pump();
    }

    /// Returns the new value of the sound toggle.
    pub fn handle_toggle_sound(&mut self) -> bool {
        if self.settings.sound_enabled() {
            self.audio.stop_ticking();
        }
        let enabled = self.settings.update(|s| {
            s.toggle_sound();
            s.sound_enabled
        });
        self.haptics.fire(HapticPulse::Light);
        enabled
    }

    /// Returns the new value of the haptics toggle.
    pub fn handle_toggle_haptic(&mut self) -> bool {
        self.settings.update(|s| {
            s.toggle_haptic();
            s.haptic_enabled
        })
    }

    /// Hand the table over without waiting for the timer.
    pub fn handle_manual_player_switch(&mut self) {
        self.timer.reset();
        self.audio.stop_ticking();
        self.pump();
        self.game.switch_player();
        self.haptics.fire(HapticPulse::Medium);
    }

    /// Backgrounding pauses a running countdown. Returning to the
    /// foreground leaves it paused.
    pub fn handle_app_status(&mut self, status: AppStatus) {
        match self.lifecycle.transition(status) {
            Some(LifecycleChange::Backgrounded) => {
                if self.timer.phase() == TimerPhase::Running {
                    tracing::info!(%status, "app left foreground, pausing timer");
                    self.pause_running();
                }
            }
            Some(LifecycleChange::Foregrounded) | None => {}
        }
        self.pump();
    }

    /// Change the turn length between turns.
    pub fn set_timer_duration(&mut self, duration: TimerDuration) {
        self.game.set_timer_duration(duration);
        self.timer.set_duration(duration);
    }

    fn pause_running(&mut self) {
        self.audio.stop_ticking();
        self.timer.pause();
        self.game.pause_game();
    }

    // ── Scoring ──────────────────────────────────────────────────────

    /// Pot a ball for the player at the table.
    pub fn record_ball(&mut self, ball: BallType, rivalries: &mut RivalryStore) {
        let player = self.game.current_player;
        let request = self
            .scoring
            .record_ball(player, ball, &mut self.game, rivalries);
        self.apply_timer_request(request);
        self.haptics.fire(HapticPulse::Light);
    }

    pub fn record_foul(&mut self, points: FoulPoints, rivalries: &mut RivalryStore) {
        let request = self.scoring.record_foul(points, &mut self.game, rivalries);
        self.apply_timer_request(request);
        self.haptics.fire(HapticPulse::Warning);
    }

    /// Declare the frame winner immediately.
    pub fn record_frame_win(&mut self, winner: Player, rivalries: &mut RivalryStore) {
        let request = self
            .scoring
            .record_frame_win(winner, &mut self.game, rivalries);
        self.apply_timer_request(request);
        self.haptics.fire(HapticPulse::Success);
    }

    /// Select a winner; nothing is recorded until confirmed.
    pub fn select_winner(&mut self, winner: Player) {
        self.winner.request(winner);
    }

    pub fn selected_winner(&self) -> Option<Player> {
        self.winner.pending().copied()
    }

    pub fn cancel_winner(&mut self) {
        self.winner.cancel();
    }

    /// Record the selected winner. Returns it, or `None` if none was selected.
    pub fn confirm_winner(&mut self, rivalries: &mut RivalryStore) -> Option<Player> {
        let winner = self.winner.confirm()?;
        self.record_frame_win(winner, rivalries);
        Some(winner)
    }

    /// Returns whether anything was undone.
    pub fn undo(&mut self, rivalries: &mut RivalryStore) -> bool {
        let Some(request) = self.scoring.undo(&mut self.game, rivalries) else {
            return false;
        };
        self.apply_timer_request(request);
        self.haptics.fire(HapticPulse::Light);
        true
    }

    /// Returns whether anything was redone.
    pub fn redo(&mut self, rivalries: &mut RivalryStore) -> bool {
        let Some(request) = self.scoring.redo(&mut self.game, rivalries) else {
            return false;
        };
        self.apply_timer_request(request);
        self.haptics.fire(HapticPulse::Light);
        true
    }

    /// Start a new game with the same players.
    pub fn reset_all_scores(&mut self) {
        self.scoring.reset_all_scores();
        self.audio.stop_ticking();
        self.timer.reset();
        self.pump();
        self.game.start_game();
    }

    /// Back to a pristine session: game slice, scores and timer.
    pub fn reset_all(&mut self) {
        self.scoring.reset_all_scores();
        self.audio.stop_ticking();
        self.timer.reset();
        self.pump();
        self.game.reset();
        self.timer.set_duration(self.game.timer_duration);
    }

    fn apply_timer_request(&mut self, request: TimerRequest) {
        tracing::debug!(?request, "timer request from scoring");
        match request {
            TimerRequest::Reset | TimerRequest::Halt => {
                self.audio.stop_ticking();
                self.timer.reset();
            }
        }
        self.pump();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, PoisonError};

    use super::*;
    use crate::audio::testing::{Call, RecordingPlayer};
    use crate::audio::Cue;
    use crate::events::EventLog;
    use crate::game::{GameMode, PlayerPair};
    use crate::haptics::testing::RecordingHaptics;

    struct Harness {
        session: GameSession,
        rivalries: RivalryStore,
        audio: RecordingPlayer,
        haptics: RecordingHaptics,
        log: Arc<Mutex<EventLog>>,
    }

    struct SharedLog(Arc<Mutex<EventLog>>);

    impl TimerListener for SharedLog {
        fn on_timer_event(&mut self, event: &TimerEvent) {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .on_timer_event(event);
        }
    }

    fn harness(secs: u64) -> Harness {
        let mut game = GameState::new();
        game.set_game_mode(GameMode::Snooker);
        game.set_players("Alice", "Bob");
        game.set_timer_duration(TimerDuration::from_secs(secs).unwrap());

        let audio = RecordingPlayer::default();
        let haptics = RecordingHaptics::default();
        let mut session = GameSession::new(
            game,
            SharedSettings::default(),
            &Config::default(),
            Box::new(audio.clone()),
            Box::new(haptics.clone()),
        );
        let log = Arc::new(Mutex::new(EventLog::new()));
        session.add_listener(Box::new(SharedLog(log.clone())));
        Harness {
            session,
            rivalries: RivalryStore::new(),
            audio,
            haptics,
            log,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn press_starts_then_stop_passes_turn() {
        let mut h = harness(30);
        h.session.handle_timer_press();
        assert_eq!(h.session.phase(), TimerPhase::Running);
        h.session.advance_frame(ms(1_500));

        h.session.handle_timer_press();
        assert_eq!(h.session.phase(), TimerPhase::Idle);
        assert_eq!(h.session.current_player_name(), "Bob");
        assert_eq!(h.session.snapshot().remaining_ms, 30_000);
    }

    #[test]
    fn expiry_plays_cue_once_and_tap_acknowledges() {
        let mut h = harness(5);
        h.session.handle_timer_press();
        for _ in 0..60 {
            h.session.advance_frame(ms(100));
        }
        assert_eq!(h.session.phase(), TimerPhase::Expired);
        assert_eq!(h.audio.count(Call::Play(Cue::ExpireBeep)), 1);
        assert_eq!(h.audio.count(Call::StartLoop(Cue::Ticking)), 1);
        assert_eq!(h.audio.count(Call::StopLoop(Cue::Ticking)), 1);
        assert_eq!(h.haptics.pulses().last(), Some(&HapticPulse::Warning));

        h.session.handle_timer_press();
        assert_eq!(h.session.phase(), TimerPhase::Idle);
        assert_eq!(h.session.snapshot().remaining_ms, 5_000);
        assert_eq!(h.session.current_player(), Player::Player2);

        // No countdown starts on its own.
        h.session.advance_frame(ms(1_000));
        assert_eq!(h.session.phase(), TimerPhase::Idle);
    }

    #[test]
    fn listeners_see_every_event_in_order() {
        let mut h = harness(2);
        h.session.handle_timer_press();
        h.session.advance_frame(ms(2_500));
        let log = h.log.lock().unwrap();
        assert_eq!(log.ticks(), vec![0]);
        assert_eq!(log.count(TimerEvent::Expired), 1);
        assert!(matches!(
            log.events()[0],
            TimerEvent::StateChanged {
                to: TimerPhase::Running,
                ..
            }
        ));
    }

    #[test]
    fn backgrounding_pauses_and_foreground_does_not_resume() {
        let mut h = harness(20);
        h.session.handle_timer_press();
        h.session.advance_frame(ms(12_000));
        assert_eq!(h.audio.count(Call::StartLoop(Cue::Ticking)), 1);

        h.session.handle_app_status(AppStatus::Background);
        assert_eq!(h.session.phase(), TimerPhase::Paused);
        assert!(h.session.game().is_paused);
        assert_eq!(h.audio.count(Call::StopLoop(Cue::Ticking)), 1);

        h.session.handle_app_status(AppStatus::Active);
        assert_eq!(h.session.phase(), TimerPhase::Paused);

        h.session.handle_pause_resume();
        assert_eq!(h.session.phase(), TimerPhase::Running);
        assert!(!h.session.game().is_paused);
        assert_eq!(h.audio.count(Call::StartLoop(Cue::Ticking)), 2);
    }

    #[test]
    fn pause_resume_never_replays_a_second() {
        let mut h = harness(10);
        h.session.handle_timer_press();
        h.session.advance_frame(ms(6_000));
        let beeps = h.audio.count(Call::Play(Cue::Beep));
        assert_eq!(beeps, 1);

        h.session.handle_pause_resume();
        h.session.handle_pause_resume();
        h.session.advance_frame(ms(10));
        assert_eq!(h.audio.count(Call::Play(Cue::Beep)), beeps);
    }

    #[test]
    fn disabling_sound_stops_ticking() {
        let mut h = harness(10);
        h.session.handle_timer_press();
        h.session.advance_frame(ms(1_000));
        assert_eq!(h.audio.count(Call::StartLoop(Cue::Ticking)), 1);

        assert!(!h.session.handle_toggle_sound());
        assert_eq!(h.audio.count(Call::StopLoop(Cue::Ticking)), 1);
        h.session.advance_frame(ms(1_000));
        assert_eq!(h.audio.count(Call::StartLoop(Cue::Ticking)), 1);
    }

    #[test]
    fn manual_switch_resets_without_signal() {
        let mut h = harness(30);
        h.session.handle_timer_press();
        h.session.advance_frame(ms(3_000));
        h.session.handle_manual_player_switch();
        assert_eq!(h.session.phase(), TimerPhase::Idle);
        assert_eq!(h.session.current_player(), Player::Player2);
        assert_eq!(h.log.lock().unwrap().count(TimerEvent::PlayerSwitch), 0);
        assert_eq!(h.haptics.pulses().last(), Some(&HapticPulse::Medium));
    }

    #[test]
    fn foul_scoring_round_trip() {
        let mut h = harness(30);
        h.session.record_ball(BallType::Red, &mut h.rivalries);
        h.session
            .record_foul(FoulPoints::new(4).unwrap(), &mut h.rivalries);
        assert_eq!(h.session.score().current_frame_score, PlayerPair::new(1, 4));
        assert_eq!(h.session.current_player(), Player::Player2);

        assert!(h.session.undo(&mut h.rivalries));
        assert_eq!(h.session.score().current_frame_score, PlayerPair::new(1, 0));
        assert_eq!(h.session.current_player(), Player::Player1);

        assert!(h.session.undo(&mut h.rivalries));
        assert_eq!(h.session.score().current_frame_score, PlayerPair::new(0, 0));
        assert!(!h.session.undo(&mut h.rivalries));
        assert_eq!(
            h.haptics.pulses(),
            vec![
                HapticPulse::Light,
                HapticPulse::Warning,
                HapticPulse::Light,
                HapticPulse::Light
            ]
        );
    }

    #[test]
    fn scoring_resets_a_running_timer() {
        let mut h = harness(30);
        h.session.handle_timer_press();
        h.session.advance_frame(ms(25_000));
        h.session.record_ball(BallType::Black, &mut h.rivalries);
        assert_eq!(h.session.phase(), TimerPhase::Idle);
        assert_eq!(h.session.snapshot().remaining_ms, 30_000);
        assert_eq!(h.session.current_player(), Player::Player1);
        assert_eq!(h.audio.count(Call::StopLoop(Cue::Ticking)), 1);
    }

    #[test]
    fn winner_needs_confirmation() {
        let mut h = harness(30);
        let id = h
            .rivalries
            .create_or_find("Alice", "Bob", GameMode::Snooker)
            .id
            .clone();

        h.session.select_winner(Player::Player2);
        h.session.cancel_winner();
        assert_eq!(h.session.confirm_winner(&mut h.rivalries), None);

        h.session.select_winner(Player::Player2);
        assert_eq!(h.session.selected_winner(), Some(Player::Player2));
        assert_eq!(
            h.session.confirm_winner(&mut h.rivalries),
            Some(Player::Player2)
        );
        assert_eq!(h.session.score().session_wins, PlayerPair::new(0, 1));
        assert_eq!(h.rivalries.get(&id).unwrap().wins, PlayerPair::new(0, 1));
        assert_eq!(h.haptics.pulses().last(), Some(&HapticPulse::Success));
    }

    #[test]
    fn back_stops_everything() {
        let mut h = harness(10);
        h.session.handle_timer_press();
        h.session.advance_frame(ms(2_000));
        h.session.handle_back();
        assert_eq!(h.session.phase(), TimerPhase::Idle);
        assert_eq!(h.audio.count(Call::StopLoop(Cue::Ticking)), 1);
    }

    #[test]
    fn reset_all_scores_starts_new_game() {
        let mut h = harness(30);
        h.session.record_ball(BallType::Blue, &mut h.rivalries);
        h.session.record_frame_win(Player::Player1, &mut h.rivalries);
        h.session.reset_all_scores();
        assert_eq!(h.session.score(), &FrameScoreState::default());
        assert!(!h.session.can_undo());
        assert!(h.session.game().is_game_active);
    }

    #[test]
    fn reset_all_returns_to_pristine_game() {
        let mut h = harness(45);
        h.session.record_ball(BallType::Pink, &mut h.rivalries);
        h.session.reset_all();
        assert_eq!(h.session.game(), &GameState::default());
        assert_eq!(h.session.snapshot().total_ms, 30_000);
    }
}
