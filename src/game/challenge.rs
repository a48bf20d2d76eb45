//! Board-recreation challenges: positions to memorize, and how well a
//! recreated board matches the original.

use rand::{Rng, seq::IndexedRandom};
use strum::{EnumIter, VariantArray};
use tracing::debug;

use crate::{
    model::{Board, ChessColor, ChessMan, ChessPiece, Square},
    notation::position::try_parse_position,
};

/// Percentage, rounded, of the original's occupied squares that hold the
/// same chessman on the recreated board. Extra chessmen on the recreated
/// board are not penalized. An empty original scores 0.
pub fn board_accuracy(original: &Board, recreated: &Board) -> u32 {
    let mut total = 0;
    let mut correct = 0;
    for (sq, cm) in original.squares() {
        if let Some(cm) = *cm {
            total += 1;
            if recreated.get(sq) == Some(cm) {
                correct += 1;
            }
        }
    }
    if total == 0 {
        return 0;
    }
    (100.0 * correct as f64 / total as f64).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, VariantArray)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Inclusive range of chessmen on a generated board, kings included.
    pub fn piece_range(self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (10, 14),
            Difficulty::Medium => (12, 20),
            Difficulty::Hard => (16, 26),
        }
    }
}

/// A named position from the challenge catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePosition {
    pub title: &'static str,
    pub notation: &'static str,
}

#[rustfmt::skip]
pub const SAMPLE_POSITIONS: [SamplePosition; 11] = [
    SamplePosition { title: "Starting Position", notation: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" },
    SamplePosition { title: "Simple Checkmate Pattern", notation: "8/8/8/8/3K4/4Q3/8/4k3 w - - 0 1" },
    SamplePosition { title: "Rook Endgame", notation: "6k1/8/8/8/8/8/1R6/1K6 w - - 0 1" },
    SamplePosition { title: "Queen and Pawn vs Queen", notation: "3k4/8/8/8/3K4/3Q4/4P3/8 w - - 0 1" },
    SamplePosition { title: "Knight and Bishop Checkmate", notation: "k7/8/8/8/8/2K5/2N5/1B6 w - - 0 1" },
    SamplePosition { title: "King and Pawn Endgame", notation: "4k3/8/8/8/8/3K4/2P5/8 w - - 0 1" },
    SamplePosition { title: "Sicilian Defense", notation: "r1bqkb1r/pp2pp1p/2np1np1/8/3NP3/2N5/PPP2PPP/R1BQKB1R w KQkq - 0 6" },
    SamplePosition { title: "Queen's Gambit Declined", notation: "rnbqkb1r/ppp2ppp/4pn2/3p4/2PP4/2N5/PP2PPPP/R1BQKBNR w KQkq - 0 4" },
    SamplePosition { title: "Caro-Kann Defense", notation: "rnbqkbnr/pp2pppp/2p5/3p4/3PP3/8/PPP2PPP/RNBQKBNR w KQkq - 0 3" },
    SamplePosition { title: "French Defense", notation: "rnbqkb1r/ppp2ppp/4pn2/3p4/3PP3/2N5/PPP2PPP/R1BQKBNR w KQkq - 0 4" },
    SamplePosition { title: "King's Indian Defense", notation: "rnbqkb1r/ppp1pppp/3p1n2/8/3PP3/2N2N2/PPP2PPP/R1BQKB1R w KQkq - 0 4" },
];

/// Realistic positions mixed into hard challenges.
pub const MIDDLEGAME_POSITIONS: [&str; 5] = [
    "r1bq1rk1/ppp2ppp/2np1n2/4p3/2B1P3/2NP1N2/PPP2PPP/R1BQ1RK1 w - - 0 1",
    "r2qkb1r/1p1n1ppp/p2p1n2/4p3/4P3/1NN1B3/PPP2PPP/R2QK2R w KQkq - 0 1",
    "r1bqk2r/pp2bppp/2n2n2/2pp4/3P4/2N2NP1/PP2PPBP/R1BQK2R w KQkq - 0 1",
    "rnbq1rk1/pp3ppp/4pn2/2p5/2B5/2N1P3/PP3PPP/R1BQK2R w KQ - 0 1",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 1",
];

/// How often a hard challenge is a middlegame position instead of a
/// generated one.
const MIDDLEGAME_CHANCE: f64 = 0.3;

const FILLER: [ChessPiece; 5] = [
    ChessPiece::PAWN,
    ChessPiece::ROOK,
    ChessPiece::KNIGHT,
    ChessPiece::BISHOP,
    ChessPiece::QUEEN,
];

/// A position to memorize at the given difficulty.
pub fn random_position(difficulty: Difficulty, rng: &mut impl Rng) -> Board {
    if difficulty == Difficulty::Hard
        && rng.random_bool(MIDDLEGAME_CHANCE)
        && let Some(notation) = MIDDLEGAME_POSITIONS.choose(rng)
        && let Ok(board) = try_parse_position(notation)
    {
        return board;
    }
    generate_position(difficulty, rng)
}

/// Scatter chessmen on an empty board: the two kings first, never next to
/// each other, then random non-king chessmen of either color. Pawns never
/// stand on the first or last rank.
pub fn generate_position(difficulty: Difficulty, rng: &mut impl Rng) -> Board {
    let (min, max) = difficulty.piece_range();
    let total = rng.random_range(min..=max);

    let mut board = Board::empty();
    let white_king = place(&mut board, ChessMan::WHITE_KING, None, rng);
    place(&mut board, ChessMan::BLACK_KING, white_king, rng);

    for _ in 2..total {
        let col = if rng.random_bool(0.5) {
            ChessColor::WHITE
        } else {
            ChessColor::BLACK
        };
        let Some(&piece) = FILLER.choose(rng) else {
            continue;
        };
        place(&mut board, ChessMan::new(col, piece), None, rng);
    }

    debug!(?difficulty, total, "generated challenge position");
    board
}

fn place(
    board: &mut Board,
    cm: ChessMan,
    avoid: Option<Square>,
    rng: &mut impl Rng,
) -> Option<Square> {
    let eligible: Vec<Square> = Square::VARIANTS
        .iter()
        .copied()
        .filter(|&sq| board.get(sq).is_none())
        .filter(|&sq| !(cm.piece() == ChessPiece::PAWN && (sq.row() == 0 || sq.row() == 7)))
        .filter(|&sq| avoid.is_none_or(|k| !adjacent(k, sq)))
        .collect();
    let sq = *eligible.choose(rng)?;
    board.set(sq, Some(cm));
    Some(sq)
}

fn adjacent(a: Square, b: Square) -> bool {
    a.row().abs_diff(b.row()) <= 1 && a.col().abs_diff(b.col()) <= 1
}
