//! Terminal play-through of a game.
//!
//! Runs the real frame loop on a tokio runtime and prints cues, pulses and
//! timer changes as they happen. A script drives the table:
//!
//! ```text
//! tap, wait:3.5, ball:red, foul:4, win:1, undo, redo, pause, switch,
//! background, foreground, sound, back
//! ```

use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;

use clap::Args;
use cueflow_core::audio::{AudioError, AudioPlayer, Cue};
use cueflow_core::game::{BallType, FoulPoints, GameMode, GameSetup, GameState, Player};
use cueflow_core::haptics::{HapticEngine, HapticError, HapticPulse};
use cueflow_core::lifecycle::AppStatus;
use cueflow_core::storage::MemoryStore;
use cueflow_core::{AppStore, Config, FrameDriver, GameSession, KeyValueStore, ValidationError};

use super::open_store;

/// How often the logic loop drains timer events while waiting.
const PUMP_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Args)]
pub struct SimulateArgs {
    /// Game mode: billiard or snooker
    #[arg(long, default_value = "snooker")]
    mode: GameMode,
    /// Player 1 name
    #[arg(long, default_value = "Player 1")]
    p1: String,
    /// Player 2 name
    #[arg(long, default_value = "Player 2")]
    p2: String,
    /// Turn length in seconds (digits only; "45s" reads as 45)
    #[arg(long)]
    duration: Option<String>,
    /// Comma-separated steps, e.g. "tap,wait:4,ball:red,win:1"
    #[arg(long)]
    script: Option<String>,
    /// Do not read or write the rivalry history
    #[arg(long)]
    ephemeral: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Tap,
    PauseResume,
    Wait(Duration),
    Ball(BallType),
    Foul(FoulPoints),
    Win(Player),
    Undo,
    Redo,
    Switch,
    Status(AppStatus),
    ToggleSound,
    Back,
}

impl FromStr for Step {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let invalid = |message: String| ValidationError::InvalidValue {
            field: "script".into(),
            message,
        };
        let step = match (name.to_ascii_lowercase().as_str(), arg) {
            ("tap" | "press", None) => Step::Tap,
            ("pause" | "resume", None) => Step::PauseResume,
            ("wait", Some(secs)) => {
                let secs: f64 = secs
                    .parse()
                    .map_err(|_| invalid(format!("bad wait '{secs}'")))?;
                if !(0.0..=86_400.0).contains(&secs) {
                    return Err(invalid(format!("bad wait '{secs}'")));
                }
                Step::Wait(Duration::from_secs_f64(secs))
            }
            ("ball", Some(ball)) => Step::Ball(ball.parse()?),
            ("foul", Some(points)) => {
                let points: u32 = points
                    .parse()
                    .map_err(|_| invalid(format!("bad foul '{points}'")))?;
                Step::Foul(FoulPoints::new(points)?)
            }
            ("win", Some(player)) => Step::Win(player.parse()?),
            ("undo", None) => Step::Undo,
            ("redo", None) => Step::Redo,
            ("switch", None) => Step::Switch,
            ("background", None) => Step::Status(AppStatus::Background),
            ("foreground", None) => Step::Status(AppStatus::Active),
            ("sound", None) => Step::ToggleSound,
            ("back", None) => Step::Back,
            _ => return Err(invalid(format!("unknown step '{s}'"))),
        };
        Ok(step)
    }
}

fn parse_script(script: &str) -> Result<Vec<Step>, ValidationError> {
    script
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse())
        .collect()
}

fn console_line(line: std::fmt::Arguments<'_>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "    {line}")?;
    out.flush()
}

/// Prints cues instead of playing them. A closed stdout surfaces as a
/// backend failure, which the coordinator logs and moves past.
struct ConsoleAudio;

impl ConsoleAudio {
    fn show(&self, line: std::fmt::Arguments<'_>) -> Result<(), AudioError> {
        console_line(line).map_err(|err| AudioError::Backend(err.to_string()))
    }
}

impl AudioPlayer for ConsoleAudio {
    fn play_once(&mut self, cue: Cue) -> Result<(), AudioError> {
        self.show(format_args!("[audio] {cue:?}"))
    }

    fn start_loop(&mut self, cue: Cue) -> Result<(), AudioError> {
        self.show(format_args!("[audio] {cue:?} loop on"))
    }

    fn stop_loop(&mut self, cue: Cue) -> Result<(), AudioError> {
        self.show(format_args!("[audio] {cue:?} loop off"))
    }
}

struct ConsoleHaptics;

impl HapticEngine for ConsoleHaptics {
    fn is_supported(&self) -> bool {
        true
    }

    fn pulse(&mut self, pulse: HapticPulse) -> Result<(), HapticError> {
        console_line(format_args!("[haptic] {pulse:?}"))
            .map_err(|err| HapticError::Backend(err.to_string()))
    }
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.ephemeral {
        play(AppStore::open(MemoryStore::new())?, args)
    } else {
        play(open_store()?, args)
    }
}

fn play<S: KeyValueStore>(mut store: AppStore<S>, args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    let mut setup = GameSetup::new();
    setup.player1_name = args.p1.clone();
    setup.player2_name = args.p2.clone();
    setup.select_duration(config.timer.default_duration_secs);
    if let Some(text) = &args.duration {
        setup.set_custom_duration(text);
    }

    let mut game = GameState::new();
    game.set_game_mode(args.mode);
    setup.apply(&mut game, store.rivalries_mut())?;
    let secs = game.timer_duration.secs();

    let steps = match &args.script {
        Some(script) => parse_script(script)?,
        None => vec![
            Step::Tap,
            Step::Wait(Duration::from_secs(secs + 1)),
            Step::Tap,
        ],
    };

    let mut session = GameSession::new(
        game,
        store.settings().clone(),
        &config,
        Box::new(ConsoleAudio),
        Box::new(ConsoleHaptics),
    );

    println!(
        "{} vs {} | {} | {}s turns",
        args.p1.trim(),
        args.p2.trim(),
        args.mode.label(),
        secs
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let _driver = FrameDriver::spawn(session.timer().clone(), config.frame_interval());
        let mut display = session.subscribe();
        let mut shown = None;

        for step in steps {
            println!("> {step:?}");
            match step {
                Step::Wait(total) => {
                    let deadline = tokio::time::Instant::now() + total;
                    while tokio::time::Instant::now() < deadline {
                        tokio::time::sleep(PUMP_INTERVAL).await;
                        session.pump();
                        if display.has_changed().unwrap_or(false) {
                            let snap = *display.borrow_and_update();
                            let key = (snap.remaining_secs(), snap.phase);
                            if shown != Some(key) {
                                shown = Some(key);
                                println!("  {:>3}s  {:?}", key.0, key.1);
                            }
                        }
                    }
                }
                other => apply(&mut session, &mut store, other),
            }
        }
        session.handle_back();
    });

    let score = session.score();
    println!(
        "Frame {} | score {}-{} | session wins {}-{}",
        score.frame_number,
        score.current_frame_score.player1,
        score.current_frame_score.player2,
        score.session_wins.player1,
        score.session_wins.player2,
    );

    if !args.ephemeral {
        store.save()?;
    }
    if let Some(rivalry) = store.rivalries().active() {
        println!(
            "Rivalry {}: {}-{} over {} games",
            rivalry.id, rivalry.wins.player1, rivalry.wins.player2, rivalry.total_games_played
        );
    }
    Ok(())
}

fn apply<S: KeyValueStore>(session: &mut GameSession, store: &mut AppStore<S>, step: Step) {
    match step {
        Step::Tap => session.handle_timer_press(),
        Step::PauseResume => session.handle_pause_resume(),
        Step::Ball(ball) => session.record_ball(ball, store.rivalries_mut()),
        Step::Foul(points) => session.record_foul(points, store.rivalries_mut()),
        Step::Win(player) => {
            session.select_winner(player);
            session.confirm_winner(store.rivalries_mut());
        }
        Step::Undo => {
            if !session.undo(store.rivalries_mut()) {
                println!("  nothing to undo");
            }
        }
        Step::Redo => {
            if !session.redo(store.rivalries_mut()) {
                println!("  nothing to redo");
            }
        }
        Step::Switch => session.handle_manual_player_switch(),
        Step::Status(status) => session.handle_app_status(status),
        Step::ToggleSound => {
            session.handle_toggle_sound();
        }
        Step::Back => session.handle_back(),
        Step::Wait(_) => {}
    }
    println!("  turn: {}", session.current_player_name());
}
