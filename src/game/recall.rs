//! # Recall game
//!
//! The user plays a few plies against the engine without seeing the move
//! list, then writes the moves down from memory. The transcription is
//! graded position by position against the recorded history.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;
use strum::{EnumIs, IntoStaticStr};
use tracing::{debug, info};

use crate::{
    config::{GameConfig, RECALL_ROUND_CHOICES},
    engine::{
        history::MoveHistory,
        select::{AiMoveSelector, ChosenMove},
    },
    error::{GameError, NoLegalMoves},
    game::wrong_phase,
    model::{Board, ChessColor, Square, moving::{apply_move, try_move}},
    notation::stdalg::san,
};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Split a comma-separated transcription into moves, ignoring all
/// whitespace and empty entries.
pub fn parse_transcription(transcription: &str) -> Vec<String> {
    WHITESPACE
        .replace_all(transcription, "")
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Score of a transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecallGrade {
    pub correct: usize,
    pub total: usize,
    /// Whole percent, rounded.
    pub accuracy: u32,
    /// One point per full ten percent.
    pub points: u32,
}

/// Grade `transcription` against the moves actually played. The i-th
/// submitted move counts when it equals the i-th expected move, ignoring
/// case.
pub fn grade_recall<S: AsRef<str>>(expected: &[S], transcription: &str) -> RecallGrade {
    let submitted = parse_transcription(transcription);
    let correct = expected
        .iter()
        .zip(&submitted)
        .filter(|&(e, s)| AsRef::<str>::as_ref(e).eq_ignore_ascii_case(s))
        .count();
    let total = expected.len();
    let accuracy = if total == 0 {
        0
    } else {
        (100.0 * correct as f64 / total as f64).round() as u32
    };
    RecallGrade {
        correct,
        total,
        accuracy,
        points: accuracy / 10,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RecallPhase {
    Setup,
    Playing,
    Recall,
    Graded,
    GameOver,
}

/// What happened after the user's ply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The engine answered.
    Moved(ChosenMove),
    /// The engine had nothing to play; the round went to recall.
    NoLegalMoves(NoLegalMoves),
    /// Enough plies were played; the round went to recall before the
    /// engine answered.
    RecallDue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallSummary {
    pub rounds: u8,
    pub total_points: u32,
    pub grades: Vec<RecallGrade>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RecallGame<R> {
    selector: AiMoveSelector,
    rng: R,
    recall_plies: usize,
    rounds: u8,
    player: ChessColor,
    board: Board,
    history: MoveHistory,
    to_move: ChessColor,
    phase: RecallPhase,
    round: u8,
    grades: Vec<RecallGrade>,
    completed_at: Option<DateTime<Utc>>,
}

impl<R: Rng> RecallGame<R> {
    pub fn new(selector: AiMoveSelector, config: &GameConfig, rng: R) -> Self {
        Self {
            selector,
            rng,
            recall_plies: config.recall_plies.max(1),
            rounds: config.recall_rounds,
            player: ChessColor::WHITE,
            board: Board::startpos(),
            history: MoveHistory::new(),
            to_move: ChessColor::WHITE,
            phase: RecallPhase::Setup,
            round: 1,
            grades: Vec::new(),
            completed_at: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn phase(&self) -> RecallPhase {
        self.phase
    }

    pub fn player(&self) -> ChessColor {
        self.player
    }

    pub fn to_move(&self) -> ChessColor {
        self.to_move
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn rounds(&self) -> u8 {
        self.rounds
    }

    pub fn total_points(&self) -> u32 {
        self.grades.iter().map(|g| g.points).sum()
    }

    pub fn grades(&self) -> &[RecallGrade] {
        &self.grades
    }

    /// Begin a game of `rounds` rounds with the user playing `player`.
    /// When the user plays black the engine opens, and its move is
    /// returned.
    pub fn start(
        &mut self,
        rounds: u8,
        player: ChessColor,
    ) -> Result<Option<ChosenMove>, GameError> {
        if !self.phase.is_setup() {
            return Err(wrong_phase("start a game", self.phase));
        }
        if !RECALL_ROUND_CHOICES.contains(&rounds) {
            return Err(GameError::InvalidRounds(rounds));
        }
        self.rounds = rounds;
        self.player = player;
        self.round = 1;
        self.grades.clear();
        self.completed_at = None;
        self.begin_round()
    }

    fn begin_round(&mut self) -> Result<Option<ChosenMove>, GameError> {
        self.board = Board::startpos();
        self.history.clear();
        self.to_move = ChessColor::WHITE;
        self.phase = RecallPhase::Playing;
        debug!(round = self.round, player = ?self.player, "recall round");
        if self.player == ChessColor::BLACK {
            let opening = self.engine_move()?;
            return Ok(Some(opening));
        }
        Ok(None)
    }

    fn engine_move(&mut self) -> Result<ChosenMove, NoLegalMoves> {
        let side = self.player.opp();
        let chosen = self
            .selector
            .select(&self.board, side, &self.history, &mut self.rng)?;
        self.board = apply_move(&self.board, chosen.mv);
        self.history.push(chosen.notation.clone(), side, chosen.mv);
        self.to_move = self.player;
        Ok(chosen)
    }

    fn recall_due(&self) -> bool {
        self.history.len() >= self.recall_plies
    }

    /// Play the user's move and let the engine answer.
    pub fn play(&mut self, from: Square, to: Square) -> Result<Reply, GameError> {
        if !self.phase.is_playing() {
            return Err(wrong_phase("play a move", self.phase));
        }
        let (after, mv) = try_move(&self.board, from, to, self.player)?;
        self.history.push(san(&self.board, mv), self.player, mv);
        self.board = after;
        self.to_move = self.player.opp();

        if self.recall_due() {
            self.phase = RecallPhase::Recall;
            return Ok(Reply::RecallDue);
        }

        match self.engine_move() {
            Ok(chosen) => {
                if self.recall_due() {
                    self.phase = RecallPhase::Recall;
                }
                Ok(Reply::Moved(chosen))
            }
            Err(none) => {
                self.phase = RecallPhase::Recall;
                Ok(Reply::NoLegalMoves(none))
            }
        }
    }

    /// Grade the user's transcription of the round.
    pub fn submit_recall(&mut self, transcription: &str) -> Result<RecallGrade, GameError> {
        if !self.phase.is_recall() {
            return Err(wrong_phase("submit a recall", self.phase));
        }
        let expected: Vec<&str> = self.history.notations().collect();
        let grade = grade_recall(expected.as_slice(), transcription);
        self.grades.push(grade);
        debug!(
            round = self.round,
            accuracy = grade.accuracy,
            points = grade.points,
            "recall graded"
        );

        if self.round >= self.rounds {
            self.phase = RecallPhase::GameOver;
            self.completed_at = Some(Utc::now());
            info!(total = self.total_points(), rounds = self.rounds, "recall game over");
        } else {
            self.phase = RecallPhase::Graded;
        }
        Ok(grade)
    }

    /// Start the next round from the standard position.
    pub fn next_round(&mut self) -> Result<Option<ChosenMove>, GameError> {
        if !self.phase.is_graded() {
            return Err(wrong_phase("start the next round", self.phase));
        }
        self.round += 1;
        self.begin_round()
    }

    /// Back to setup, discarding all progress.
    pub fn new_game(&mut self) {
        self.board = Board::startpos();
        self.history.clear();
        self.to_move = ChessColor::WHITE;
        self.player = ChessColor::WHITE;
        self.phase = RecallPhase::Setup;
        self.round = 1;
        self.grades.clear();
        self.completed_at = None;
    }

    #[cfg(test)]
    fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn summary(&self) -> Option<RecallSummary> {
        Some(RecallSummary {
            rounds: self.rounds,
            total_points: self.total_points(),
            grades: self.grades.clone(),
            completed_at: self.completed_at?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::book::OpeningBook, notation::position::try_parse_position};
    use rand::{SeedableRng, rngs::SmallRng};
    use std::sync::Arc;

    const GAME: [&str; 6] = ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"];

    #[test]
    fn transcription_parsing() {
        assert_eq!(parse_transcription(" e4, e5 ,\tNf3 "), ["e4", "e5", "Nf3"]);
        assert_eq!(parse_transcription("e4,,Nf3,"), ["e4", "Nf3"]);
        assert!(parse_transcription("   ").is_empty());
        assert!(parse_transcription(" , ,").is_empty());
    }

    #[test]
    fn exact_recall() {
        let g = grade_recall(&GAME, "e4, e5, Nf3, Nc6, Bb5, a6");
        assert_eq!(g, RecallGrade { correct: 6, total: 6, accuracy: 100, points: 10 });
        let g = grade_recall(&GAME, "E4,E5,nf3,nc6,bb5,A6");
        assert_eq!(g.accuracy, 100);
        // a doubled comma does not shift the later moves
        let g = grade_recall(&GAME[..3], "e4,,e5,Nf3");
        assert_eq!(g.accuracy, 100);
    }

    #[test]
    fn partial_recall() {
        let g = grade_recall(&GAME, "e4, e5, Nc6, Nf3, Bb5, a6");
        assert_eq!(g.correct, 4);
        assert_eq!(g.accuracy, 67);
        assert_eq!(g.points, 6);

        let g = grade_recall(&GAME, "e4, e5");
        assert_eq!(g.accuracy, 33);
        assert_eq!(g.points, 3);

        let g = grade_recall(&GAME, "");
        assert_eq!(g.accuracy, 0);

        let none: [&str; 0] = [];
        assert_eq!(grade_recall(&none, "e4").accuracy, 0);
    }

    fn game() -> RecallGame<SmallRng> {
        let book = "\"\" = [\"e4\"]\ne4 = [\"e5\"]\n\"e4 e5 Nf3\" = [\"Nc6\"]\n";
        let selector = AiMoveSelector::new(Arc::new(OpeningBook::from_toml_str(book).unwrap()));
        RecallGame::new(selector, &GameConfig::default(), SmallRng::seed_from_u64(11))
    }

    #[test]
    fn full_round_as_white() {
        let mut g = game();
        assert_eq!(g.start(4, ChessColor::WHITE), Err(GameError::InvalidRounds(4)));
        assert_eq!(g.start(3, ChessColor::WHITE), Ok(None));

        assert!(matches!(
            g.play(Square::e2, Square::e4),
            Ok(Reply::Moved(m)) if m.notation == "e5"
        ));
        assert!(matches!(
            g.play(Square::g1, Square::f3),
            Ok(Reply::Moved(m)) if m.notation == "Nc6"
        ));
        assert!(matches!(g.play(Square::f1, Square::b5), Ok(Reply::Moved(_))));
        assert!(g.phase().is_recall());
        assert_eq!(g.history().len(), 6);
        assert!(matches!(g.play(Square::d2, Square::d4), Err(GameError::WrongPhase { .. })));

        let transcript = g.history().notations().collect::<Vec<_>>().join(", ");
        let grade = g.submit_recall(&transcript).unwrap();
        assert_eq!(grade.accuracy, 100);
        assert_eq!(g.total_points(), 10);
        assert!(g.phase().is_graded());

        assert_eq!(g.next_round(), Ok(None));
        assert_eq!(g.round(), 2);
        assert!(g.history().is_empty());
        assert_eq!(*g.board(), Board::startpos());
    }

    #[test]
    fn engine_without_moves_ends_the_playing_phase() {
        let mut g = game();
        g.start(3, ChessColor::WHITE).unwrap();
        // the black king is boxed in by its own pawns
        g.set_board(try_parse_position("K7/8/8/8/8/8/pp6/kp6").unwrap());
        assert_eq!(
            g.play(Square::a8, Square::b8),
            Ok(Reply::NoLegalMoves(NoLegalMoves(ChessColor::BLACK)))
        );
        assert_eq!(g.phase(), RecallPhase::Recall);
        let grade = g.submit_recall("Kb8").unwrap();
        assert_eq!((grade.correct, grade.total, grade.accuracy), (1, 1, 100));
    }

    #[test]
    fn engine_opens_for_black() {
        let mut g = game();
        let opening = g.start(5, ChessColor::BLACK).unwrap().unwrap();
        assert_eq!(opening.notation, "e4");
        assert_eq!(g.to_move(), ChessColor::BLACK);
        assert_eq!(g.history().key(), "e4");
    }

    #[test]
    fn game_over_after_last_round() {
        let mut g = game();
        g.start(3, ChessColor::WHITE).unwrap();
        for round in 1..=3 {
            assert_eq!(g.round(), round);
            g.play(Square::e2, Square::e4).unwrap();
            g.play(Square::g1, Square::f3).unwrap();
            g.play(Square::b1, Square::c3).unwrap();
            g.submit_recall("").unwrap();
            if round < 3 {
                g.next_round().unwrap();
            }
        }
        assert!(g.phase().is_game_over());
        let summary = g.summary().unwrap();
        assert_eq!(summary.grades.len(), 3);
        assert_eq!(summary.total_points, 0);
        g.new_game();
        assert!(g.phase().is_setup());
    }
}
