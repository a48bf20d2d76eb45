//! # Move scoring heuristic
//!
//! A move scores the material value of the moving piece, plus the
//! positional bonus of its destination, plus a bonus for whatever it
//! captures, minus a penalty for moving the same kind of piece again and
//! again in the opening.

use crate::{
    config::EngineConfig,
    engine::history::MoveHistory,
    model::{Board, ChessMove, ChessPiece, Square},
};

/// Material value by [`ChessPiece::ix`].
pub const PIECE_VALUES: [f64; 6] = [1.0, 3.0, 3.0, 5.0, 9.0, 0.0];

pub fn piece_value(piece: ChessPiece) -> f64 {
    PIECE_VALUES[piece.ix()]
}

/// Positional bonus tables by [`ChessPiece::ix`], `[row][col]` with row 0
/// being the 8th rank.
#[rustfmt::skip]
pub const POSITION_BONUS: [[[f64; 8]; 8]; 6] = [
    // pawn
    [
        [0.0,   0.0,   0.0,  0.0,  0.0,  0.0,   0.0,   0.0],
        [0.5,   0.5,   0.5,  0.5,  0.5,  0.5,   0.5,   0.5],
        [0.1,   0.1,   0.2,  0.3,  0.3,  0.2,   0.1,   0.1],
        [0.05,  0.05,  0.1,  0.25, 0.25, 0.1,   0.05,  0.05],
        [0.0,   0.0,   0.0,  0.2,  0.2,  0.0,   0.0,   0.0],
        [0.05, -0.05, -0.1,  0.0,  0.0, -0.1,  -0.05,  0.05],
        [0.05,  0.1,   0.1, -0.2, -0.2,  0.1,   0.1,   0.05],
        [0.0,   0.0,   0.0,  0.0,  0.0,  0.0,   0.0,   0.0],
    ],
    // knight
    [
        [-0.5, -0.4, -0.3,  -0.3,  -0.3,  -0.3,  -0.4, -0.5],
        [-0.4, -0.2,  0.0,   0.0,   0.0,   0.0,  -0.2, -0.4],
        [-0.3,  0.0,  0.1,   0.15,  0.15,  0.1,   0.0, -0.3],
        [-0.3,  0.05, 0.15,  0.2,   0.2,   0.15,  0.05, -0.3],
        [-0.3,  0.0,  0.15,  0.2,   0.2,   0.15,  0.0, -0.3],
        [-0.3,  0.05, 0.1,   0.15,  0.15,  0.1,   0.05, -0.3],
        [-0.4, -0.2,  0.0,   0.05,  0.05,  0.0,  -0.2, -0.4],
        [-0.5, -0.4, -0.3,  -0.3,  -0.3,  -0.3,  -0.4, -0.5],
    ],
    // bishop
    [
        [-0.2, -0.1,  -0.1,  -0.1, -0.1, -0.1,  -0.1,  -0.2],
        [-0.1,  0.0,   0.0,   0.0,  0.0,  0.0,   0.0,  -0.1],
        [-0.1,  0.0,   0.05,  0.1,  0.1,  0.05,  0.0,  -0.1],
        [-0.1,  0.05,  0.05,  0.2,  0.2,  0.05,  0.05, -0.1],
        [-0.1,  0.0,   0.1,   0.2,  0.2,  0.1,   0.0,  -0.1],
        [-0.1,  0.1,   0.1,   0.1,  0.1,  0.1,   0.1,  -0.1],
        [-0.1,  0.05,  0.0,   0.0,  0.0,  0.0,   0.05, -0.1],
        [-0.2, -0.1,  -0.1,  -0.1, -0.1, -0.1,  -0.1,  -0.2],
    ],
    // rook
    [
        [ 0.0,  0.0, 0.0, 0.0,  0.0,  0.0, 0.0,  0.0],
        [ 0.05, 0.1, 0.1, 0.1,  0.1,  0.1, 0.1,  0.05],
        [-0.05, 0.0, 0.0, 0.0,  0.0,  0.0, 0.0, -0.05],
        [-0.05, 0.0, 0.0, 0.0,  0.0,  0.0, 0.0, -0.05],
        [-0.05, 0.0, 0.0, 0.0,  0.0,  0.0, 0.0, -0.05],
        [-0.05, 0.0, 0.0, 0.0,  0.0,  0.0, 0.0, -0.05],
        [-0.05, 0.0, 0.0, 0.0,  0.0,  0.0, 0.0, -0.05],
        [ 0.0,  0.0, 0.0, 0.05, 0.05, 0.0, 0.0,  0.0],
    ],
    // queen
    [
        [-0.2,  -0.1,  -0.1,  -0.05, -0.05, -0.1,  -0.1, -0.2],
        [-0.1,   0.0,   0.0,   0.0,   0.0,   0.0,   0.0, -0.1],
        [-0.1,   0.0,   0.05,  0.05,  0.05,  0.05,  0.0, -0.1],
        [-0.05,  0.0,   0.05,  0.05,  0.05,  0.05,  0.0, -0.05],
        [ 0.0,   0.0,   0.05,  0.05,  0.05,  0.05,  0.0, -0.05],
        [-0.1,   0.05,  0.05,  0.05,  0.05,  0.05,  0.0, -0.1],
        [-0.1,   0.0,   0.05,  0.0,   0.0,   0.0,   0.0, -0.1],
        [-0.2,  -0.1,  -0.1,  -0.05, -0.05, -0.1,  -0.1, -0.2],
    ],
    // king
    [
        [-0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3],
        [-0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3],
        [-0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3],
        [-0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3],
        [-0.2, -0.3, -0.3, -0.4, -0.4, -0.3, -0.3, -0.2],
        [-0.1, -0.2, -0.2, -0.2, -0.2, -0.2, -0.2, -0.1],
        [ 0.2,  0.2,  0.0,  0.0,  0.0,  0.0,  0.2,  0.2],
        [ 0.2,  0.3,  0.1,  0.0,  0.0,  0.1,  0.3,  0.2],
    ],
];

/// Positional bonus for a piece of kind `piece` standing on `sq`. Both
/// colors read the same cell.
pub fn positional_bonus(piece: ChessPiece, sq: Square) -> f64 {
    let (row, col) = sq.row_col();
    POSITION_BONUS[piece.ix()][row as usize][col as usize]
}

/// Scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heuristic {
    /// Captures add this multiple of the captured piece's value.
    pub capture_multiplier: f64,
    /// Subtracted once per earlier move of the same piece kind.
    pub repetition_penalty: f64,
    /// The repetition penalty applies while fewer plies than this have
    /// been played.
    pub opening_window: usize,
}

impl Default for Heuristic {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Heuristic {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            capture_multiplier: config.capture_multiplier,
            repetition_penalty: config.repetition_penalty,
            opening_window: config.opening_window,
        }
    }

    /// Score `mv` on `board` given the plies played so far.
    ///
    /// A move from an empty square scores 0.
    pub fn score_move(&self, board: &Board, mv: ChessMove, history: &MoveHistory) -> f64 {
        let Some(cm) = board.get(mv.from) else {
            return 0.0;
        };
        let side = cm.col();

        let mut score = piece_value(cm.piece()) + positional_bonus(cm.piece(), mv.to);

        if let Some(target) = board.get(mv.to)
            && target.col() != side
        {
            score += self.capture_multiplier * piece_value(target.piece());
        }

        if history.len() < self.opening_window {
            let prior = history.prior_moves(cm.piece());
            score -= self.repetition_penalty * prior as f64;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChessColor, ChessMan};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn both_colors_read_the_same_cell() {
        assert!(close(positional_bonus(ChessPiece::PAWN, Square::e4), 0.2));
        assert!(close(positional_bonus(ChessPiece::PAWN, Square::e5), 0.25));
        assert!(close(positional_bonus(ChessPiece::KING, Square::g1), 0.3));
        assert!(close(positional_bonus(ChessPiece::KING, Square::g8), -0.4));
        assert!(close(positional_bonus(ChessPiece::KNIGHT, Square::a1), -0.5));

        let h = Heuristic::default();
        let b = Board::startpos();
        let e5 = h.score_move(
            &b,
            ChessMove::new(ChessPiece::PAWN, Square::e7, Square::e5),
            &MoveHistory::new(),
        );
        assert!(close(e5, 1.25));
    }

    #[test]
    fn opening_moves() {
        let h = Heuristic::default();
        let b = Board::startpos();
        let hist = MoveHistory::new();
        let e4 = h.score_move(&b, ChessMove::new(ChessPiece::PAWN, Square::e2, Square::e4), &hist);
        assert!(close(e4, 1.2));
        let nf3 = h.score_move(
            &b,
            ChessMove::new(ChessPiece::KNIGHT, Square::g1, Square::f3),
            &hist,
        );
        assert!(close(nf3, 3.1));
    }

    #[test]
    fn capture_bonus() {
        let h = Heuristic::default();
        let mut b = Board::empty();
        b.set(Square::d4, Some(ChessMan::WHITE_ROOK));
        b.set(Square::d7, Some(ChessMan::BLACK_QUEEN));
        let s = h.score_move(
            &b,
            ChessMove::new(ChessPiece::ROOK, Square::d4, Square::d7),
            &MoveHistory::new(),
        );
        // rook 5 + 7th rank 0.1 + 1.1 * 9
        assert!(close(s, 5.0 + 0.1 + 9.9));
    }

    #[test]
    fn repetition_penalty() {
        let h = Heuristic::default();
        let b = Board::startpos();
        let mut hist = MoveHistory::new();
        hist.push(
            "Nf3",
            ChessColor::WHITE,
            ChessMove::new(ChessPiece::KNIGHT, Square::g1, Square::f3),
        );
        hist.push(
            "Nf6",
            ChessColor::BLACK,
            ChessMove::new(ChessPiece::KNIGHT, Square::g8, Square::f6),
        );
        hist.push(
            "Ng1",
            ChessColor::WHITE,
            ChessMove::new(ChessPiece::KNIGHT, Square::f3, Square::g1),
        );
        hist.push(
            "Ng8",
            ChessColor::BLACK,
            ChessMove::new(ChessPiece::KNIGHT, Square::f6, Square::g8),
        );
        // knight moves of both sides count
        let nf3 = h.score_move(
            &b,
            ChessMove::new(ChessPiece::KNIGHT, Square::g1, Square::f3),
            &hist,
        );
        assert!(close(nf3, 3.1 - 0.4));

        // outside the opening window nothing is subtracted
        for _ in 0..6 {
            hist.push(
                "Nc6",
                ChessColor::BLACK,
                ChessMove::new(ChessPiece::KNIGHT, Square::b8, Square::c6),
            );
        }
        let nf3 = h.score_move(
            &b,
            ChessMove::new(ChessPiece::KNIGHT, Square::g1, Square::f3),
            &hist,
        );
        assert!(close(nf3, 3.1));
    }

    #[test]
    fn empty_origin_scores_zero() {
        let h = Heuristic::default();
        let b = Board::startpos();
        let s = h.score_move(
            &b,
            ChessMove::new(ChessPiece::QUEEN, Square::e4, Square::e5),
            &MoveHistory::new(),
        );
        assert_eq!(s, 0.0);
    }
}
