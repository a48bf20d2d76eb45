//! # Prediction game
//!
//! The user plays a move, then predicts the engine's reply. The reply is
//! chosen by the [`AiMoveSelector`] and a prediction naming the same move
//! scores a point. Every round starts over from the standard position.

use chrono::{DateTime, Utc};
use rand::Rng;
use strum::{EnumIs, IntoStaticStr};
use tracing::{debug, info};

use crate::{
    config::GameConfig,
    engine::{
        history::MoveHistory,
        select::{AiMoveSelector, ChosenMove},
    },
    error::{GameError, NoLegalMoves},
    game::{PREDICTION_USER, wrong_phase},
    model::{
        Board, Square,
        movegen::generate_all_moves,
        moving::{apply_move, try_move, validate_move},
    },
    notation::stdalg::san,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum PredictionPhase {
    AwaitingUserMove,
    AwaitingPrediction,
    Resolved,
    GameOver,
}

/// Outcome of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub round: u32,
    pub user_move: String,
    pub prediction: String,
    pub reply: ChosenMove,
    pub correct: bool,
}

/// Final tally, handed to whatever persists scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionSummary {
    pub score: u32,
    pub rounds: u32,
    pub hints_used: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PredictionGame<R> {
    selector: AiMoveSelector,
    rng: R,
    rounds: u32,
    hints: u32,
    board: Board,
    history: MoveHistory,
    phase: PredictionPhase,
    round: u32,
    score: u32,
    hints_remaining: u32,
    user_move: Option<String>,
    last: Option<PredictionResult>,
    completed_at: Option<DateTime<Utc>>,
}

impl<R: Rng> PredictionGame<R> {
    pub fn new(selector: AiMoveSelector, config: &GameConfig, rng: R) -> Self {
        Self {
            selector,
            rng,
            rounds: config.prediction_rounds.max(1),
            hints: config.prediction_hints,
            board: Board::startpos(),
            history: MoveHistory::new(),
            phase: PredictionPhase::AwaitingUserMove,
            round: 1,
            score: 0,
            hints_remaining: config.prediction_hints,
            user_move: None,
            last: None,
            completed_at: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn phase(&self) -> PredictionPhase {
        self.phase
    }

    /// Current round, counting from 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hints_remaining(&self) -> u32 {
        self.hints_remaining
    }

    pub fn last_result(&self) -> Option<&PredictionResult> {
        self.last.as_ref()
    }

    /// Play the user's move. Returns its notation.
    pub fn play_user_move(&mut self, from: Square, to: Square) -> Result<String, GameError> {
        if !self.phase.is_awaiting_user_move() {
            return Err(wrong_phase("play a move", self.phase));
        }
        let (after, mv) = try_move(&self.board, from, to, PREDICTION_USER)?;
        let notation = san(&self.board, mv);
        self.history.push(notation.clone(), PREDICTION_USER, mv);
        self.board = after;
        self.user_move = Some(notation.clone());
        self.phase = PredictionPhase::AwaitingPrediction;
        debug!(round = self.round, %notation, "user move");
        Ok(notation)
    }

    /// Reveal the destination of one of the engine's moves.
    pub fn hint(&mut self) -> Result<Square, GameError> {
        if !self.phase.is_awaiting_prediction() {
            return Err(wrong_phase("take a hint", self.phase));
        }
        if self.hints_remaining == 0 {
            return Err(GameError::NoHints);
        }
        let engine = PREDICTION_USER.opp();
        let mv = generate_all_moves(&self.board, engine)
            .first()
            .copied()
            .ok_or(NoLegalMoves(engine))?;
        self.hints_remaining -= 1;
        Ok(mv.to)
    }

    /// Predict the engine's reply, then let the engine play it.
    ///
    /// A prediction must itself be a legal move of the engine's side. If
    /// the engine has no moves at all the round ends and
    /// [`GameError::NoLegalMoves`] is returned.
    pub fn predict(&mut self, from: Square, to: Square) -> Result<PredictionResult, GameError> {
        if !self.phase.is_awaiting_prediction() {
            return Err(wrong_phase("predict", self.phase));
        }
        let engine = PREDICTION_USER.opp();

        if generate_all_moves(&self.board, engine).is_empty() {
            self.end_round();
            return Err(NoLegalMoves(engine).into());
        }

        let predicted = validate_move(&self.board, from, to, engine)?;
        let prediction = san(&self.board, predicted);

        let reply = self
            .selector
            .select(&self.board, engine, &self.history, &mut self.rng)?;
        let correct = reply.mv.from == predicted.from
            && reply.mv.to == predicted.to
            && reply.notation == prediction;

        self.board = apply_move(&self.board, reply.mv);
        self.history.push(reply.notation.clone(), engine, reply.mv);
        if correct {
            self.score += 1;
        }

        let result = PredictionResult {
            round: self.round,
            user_move: self.user_move.take().unwrap_or_default(),
            prediction,
            reply,
            correct,
        };
        debug!(round = self.round, correct, reply = %result.reply.notation, "prediction resolved");
        self.last = Some(result.clone());
        self.end_round();
        Ok(result)
    }

    fn end_round(&mut self) {
        if self.round >= self.rounds {
            self.phase = PredictionPhase::GameOver;
            self.completed_at = Some(Utc::now());
            info!(score = self.score, rounds = self.rounds, "prediction game over");
        } else {
            self.phase = PredictionPhase::Resolved;
        }
    }

    /// Start the next round from the standard position.
    pub fn next_round(&mut self) -> Result<(), GameError> {
        if !self.phase.is_resolved() {
            return Err(wrong_phase("start the next round", self.phase));
        }
        self.round += 1;
        self.board = Board::startpos();
        self.history.clear();
        self.user_move = None;
        self.phase = PredictionPhase::AwaitingUserMove;
        Ok(())
    }

    /// Start a fresh game: round 1, no score, all hints back.
    pub fn restart(&mut self) {
        self.board = Board::startpos();
        self.history.clear();
        self.phase = PredictionPhase::AwaitingUserMove;
        self.round = 1;
        self.score = 0;
        self.hints_remaining = self.hints;
        self.user_move = None;
        self.last = None;
        self.completed_at = None;
    }

    #[cfg(test)]
    fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    /// The final tally, once the game is over.
    pub fn summary(&self) -> Option<PredictionSummary> {
        Some(PredictionSummary {
            score: self.score,
            rounds: self.rounds,
            hints_used: self.hints - self.hints_remaining,
            completed_at: self.completed_at?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::book::OpeningBook, error::MoveError, model::ChessColor,
        notation::position::try_parse_position,
    };
    use rand::{SeedableRng, rngs::SmallRng};
    use std::sync::Arc;

    fn game(book: &str, rounds: u32) -> PredictionGame<SmallRng> {
        let selector = AiMoveSelector::new(Arc::new(OpeningBook::from_toml_str(book).unwrap()));
        let config = GameConfig {
            prediction_rounds: rounds,
            ..GameConfig::default()
        };
        PredictionGame::new(selector, &config, SmallRng::seed_from_u64(7))
    }

    #[test]
    fn engine_without_moves_ends_the_round() {
        let mut g = game("", 2);
        // the black king is boxed in by its own pawns
        g.set_board(try_parse_position("K7/8/8/8/8/8/pp6/kp6").unwrap());
        g.play_user_move(Square::a8, Square::b8).unwrap();
        assert_eq!(g.hint(), Err(GameError::NoLegalMoves(NoLegalMoves(ChessColor::BLACK))));
        assert_eq!(g.hints_remaining(), GameConfig::default().prediction_hints);
        assert_eq!(
            g.predict(Square::a1, Square::b2),
            Err(GameError::NoLegalMoves(NoLegalMoves(ChessColor::BLACK)))
        );
        assert_eq!(g.phase(), PredictionPhase::Resolved);
        assert_eq!(g.score(), 0);
        g.next_round().unwrap();
        assert_eq!(*g.board(), Board::startpos());
    }

    #[test]
    fn correct_prediction_scores() {
        // the book has a single answer to e4
        let mut g = game("e4 = [\"e5\"]\n", 2);
        assert_eq!(g.play_user_move(Square::e2, Square::e4).unwrap(), "e4");
        assert!(g.phase().is_awaiting_prediction());

        let res = g.predict(Square::e7, Square::e5).unwrap();
        assert!(res.correct);
        assert_eq!(res.user_move, "e4");
        assert_eq!(res.reply.notation, "e5");
        assert_eq!(g.score(), 1);
        assert_eq!(g.history().key(), "e4 e5");
        assert!(g.phase().is_resolved());

        g.next_round().unwrap();
        assert_eq!(g.round(), 2);
        assert_eq!(*g.board(), Board::startpos());
        assert!(g.history().is_empty());

        g.play_user_move(Square::e2, Square::e4).unwrap();
        let res = g.predict(Square::d7, Square::d5).unwrap();
        assert!(!res.correct);
        assert!(g.phase().is_game_over());
        let summary = g.summary().unwrap();
        assert_eq!(summary.score, 1);
        assert_eq!(summary.rounds, 2);
    }

    #[test]
    fn phases_are_enforced() {
        let mut g = game("", 5);
        assert!(matches!(
            g.predict(Square::e7, Square::e5),
            Err(GameError::WrongPhase { .. })
        ));
        assert!(matches!(g.hint(), Err(GameError::WrongPhase { .. })));
        assert!(matches!(g.next_round(), Err(GameError::WrongPhase { .. })));
        assert!(g.summary().is_none());
    }

    #[test]
    fn illegal_requests_leave_the_game_unchanged() {
        let mut g = game("", 5);
        assert_eq!(
            g.play_user_move(Square::e2, Square::e5),
            Err(GameError::Move(MoveError::Unreachable {
                from: Square::e2,
                to: Square::e5
            }))
        );
        assert_eq!(*g.board(), Board::startpos());
        g.play_user_move(Square::g1, Square::f3).unwrap();
        assert_eq!(
            g.predict(Square::e2, Square::e4),
            Err(GameError::Move(MoveError::WrongSide {
                square: Square::e2,
                owner: ChessColor::WHITE,
                side: ChessColor::BLACK
            }))
        );
        assert!(g.phase().is_awaiting_prediction());
    }

    #[test]
    fn hints_run_out() {
        let mut g = game("", 5);
        g.play_user_move(Square::e2, Square::e4).unwrap();
        for _ in 0..3 {
            g.hint().unwrap();
        }
        assert_eq!(g.hint(), Err(GameError::NoHints));
        g.restart();
        assert_eq!(g.hints_remaining(), 3);
        assert_eq!(g.round(), 1);
    }
}
