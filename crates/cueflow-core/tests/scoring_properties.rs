//! Property-based tests for the undo/redo command log.
//!
//! Any sequence of up to ten scoring actions, fully undone, must restore
//! the starting score, turn and rivalry record; fully redone, it must land
//! exactly where the forward pass ended.

use proptest::prelude::*;

use cueflow_core::game::{BallType, FoulPoints, GameMode, GameState, Player};
use cueflow_core::rivalry::{Rivalry, RivalryStore};
use cueflow_core::scoring::{FrameScoreState, ScoringStack, HISTORY_CAPACITY};

#[derive(Debug, Clone)]
enum Op {
    Ball(BallType),
    Foul(u32),
    Win(Player),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..BallType::ALL.len()).prop_map(|i| Op::Ball(BallType::ALL[i])),
        (4u32..=7).prop_map(Op::Foul),
        any::<bool>().prop_map(|p1| Op::Win(if p1 { Player::Player1 } else { Player::Player2 })),
    ]
}

struct Table {
    stack: ScoringStack,
    game: GameState,
    rivalries: RivalryStore,
    rivalry_id: Option<String>,
}

impl Table {
    fn new(with_rivalry: bool) -> Self {
        let mut game = GameState::new();
        game.set_game_mode(GameMode::Snooker);
        game.start_game();
        let mut rivalries = RivalryStore::new();
        let rivalry_id =
            with_rivalry.then(|| rivalries.create_or_find("Ann", "Ben", GameMode::Snooker).id.clone());
        Self {
            stack: ScoringStack::new(),
            game,
            rivalries,
            rivalry_id,
        }
    }

    fn run(&mut self, op: &Op) {
        match op {
            Op::Ball(ball) => {
                let player = self.game.current_player;
                self.stack
                    .record_ball(player, *ball, &mut self.game, &mut self.rivalries);
            }
            Op::Foul(points) => {
                let points = FoulPoints::new(*points).unwrap();
                self.stack
                    .record_foul(points, &mut self.game, &mut self.rivalries);
            }
            Op::Win(winner) => {
                self.stack
                    .record_frame_win(*winner, &mut self.game, &mut self.rivalries);
            }
        }
    }

    fn observe(&self) -> (FrameScoreState, Player, Option<Rivalry>) {
        let rivalry = self
            .rivalry_id
            .as_deref()
            .and_then(|id| self.rivalries.get(id))
            .cloned();
        (self.stack.score().clone(), self.game.current_player, rivalry)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn undo_all_restores_start(
        ops in prop::collection::vec(op(), 1..=HISTORY_CAPACITY),
        with_rivalry in any::<bool>(),
    ) {
        let mut table = Table::new(with_rivalry);
        let start = table.observe();
        for op in &ops {
            table.run(op);
        }
        let end = table.observe();

        for _ in 0..ops.len() {
            prop_assert!(table.stack.undo(&mut table.game, &mut table.rivalries).is_some());
        }
        prop_assert!(!table.stack.can_undo());
        prop_assert_eq!(&table.observe(), &start);

        for _ in 0..ops.len() {
            prop_assert!(table.stack.redo(&mut table.game, &mut table.rivalries).is_some());
        }
        prop_assert!(!table.stack.can_redo());
        prop_assert_eq!(&table.observe(), &end);
    }

    #[test]
    fn rivalry_total_matches_wins(ops in prop::collection::vec(op(), 0..30), undos in 0usize..12) {
        let mut table = Table::new(true);
        for op in &ops {
            table.run(op);
        }
        for _ in 0..undos {
            table.stack.undo(&mut table.game, &mut table.rivalries);
        }
        let (score, _, rivalry) = table.observe();
        let rivalry = rivalry.unwrap();
        prop_assert_eq!(rivalry.total_games_played, rivalry.wins.player1 + rivalry.wins.player2);
        prop_assert_eq!(score.frame_number, 1 + score.session_wins.player1 + score.session_wins.player2);
    }
}
