//! Pseudo-legal move generation.
//!
//! Every chessman moves by the geometry of its kind; nothing here checks
//! whether the mover's own king is left attacked. A destination is never a
//! square occupied by the mover's own color.
//!
//! - Pawns step one square forward onto an empty square, two from their
//!   starting row when both squares are empty, and capture one square
//!   diagonally forward. No en-passant.
//! - Knights and kings jump to a fixed set of offsets.
//! - Bishops, rooks and queens slide along their rays until blocked,
//!   including the blocking square if it holds an enemy.

use crate::model::{Board, ChessColor, ChessMove, ChessPiece, PseudoLegal, Square};

/// The eight compass directions in grid coordinates (row 0 = 8th rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CompassRose {
    NORTH,
    EAST,
    SOUTH,
    WEST,
    NORTHEAST,
    SOUTHEAST,
    SOUTHWEST,
    NORTHWEST,
}

impl CompassRose {
    pub const ORTHOGONAL: [Self; 4] = [Self::NORTH, Self::EAST, Self::SOUTH, Self::WEST];
    pub const DIAGONAL: [Self; 4] = [
        Self::NORTHEAST,
        Self::SOUTHEAST,
        Self::SOUTHWEST,
        Self::NORTHWEST,
    ];

    /// Step in `(row, col)`.
    #[inline]
    pub fn delta(self) -> (i8, i8) {
        match self {
            Self::NORTH => (-1, 0),
            Self::EAST => (0, 1),
            Self::SOUTH => (1, 0),
            Self::WEST => (0, -1),
            Self::NORTHEAST => (-1, 1),
            Self::SOUTHEAST => (1, 1),
            Self::SOUTHWEST => (1, -1),
            Self::NORTHWEST => (-1, -1),
        }
    }
}

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Destinations of the chessman on `from`, provided it belongs to `side`.
///
/// Returns nothing for an empty square or a chessman of the other color.
pub fn destinations(board: &Board, from: Square, side: ChessColor) -> Vec<Square> {
    let mut buffer = Vec::with_capacity(27);
    destinations_into(board, from, side, &mut buffer);
    buffer
}

/// Like [`destinations`], appending into a caller-provided buffer.
pub fn destinations_into(board: &Board, from: Square, side: ChessColor, buffer: &mut Vec<Square>) {
    let Some(cm) = board.get(from) else {
        return;
    };
    if cm.col() != side {
        return;
    }

    match cm.piece() {
        ChessPiece::PAWN => pawn_moves(board, from, side, buffer),
        ChessPiece::KNIGHT => jumps(board, from, side, &KNIGHT_JUMPS, buffer),
        ChessPiece::BISHOP => slides(board, from, side, &CompassRose::DIAGONAL, buffer),
        ChessPiece::ROOK => slides(board, from, side, &CompassRose::ORTHOGONAL, buffer),
        ChessPiece::QUEEN => {
            slides(board, from, side, &CompassRose::ORTHOGONAL, buffer);
            slides(board, from, side, &CompassRose::DIAGONAL, buffer);
        }
        ChessPiece::KING => jumps(board, from, side, &KING_STEPS, buffer),
    }
}

/// Enumerate every pseudo-legal move of `side` into `buffer`.
///
/// The order is by origin square, a1 ... h8, and then by rule; callers
/// should not depend on it.
pub fn enumerate(board: &Board, side: ChessColor, buffer: &mut Vec<PseudoLegal>) {
    let mut targets = Vec::with_capacity(27);
    for (from, cm) in board.men(side) {
        targets.clear();
        destinations_into(board, from, side, &mut targets);
        buffer.extend(
            targets
                .iter()
                .map(|&to| PseudoLegal(ChessMove::new(cm.piece(), from, to))),
        );
    }
}

/// All pseudo-legal moves of `side`.
pub fn generate_all_moves(board: &Board, side: ChessColor) -> Vec<ChessMove> {
    let mut buffer = Vec::with_capacity(48);
    enumerate(board, side, &mut buffer);
    buffer.into_iter().map(|mv| mv.0).collect()
}

fn pawn_moves(board: &Board, from: Square, side: ChessColor, buffer: &mut Vec<Square>) {
    let dir = side.forward();

    if let Some(one) = from.offset((dir, 0))
        && board.get(one).is_none()
    {
        buffer.push(one);
        if from.row() == side.pawn_row()
            && let Some(two) = from.offset((2 * dir, 0))
            && board.get(two).is_none()
        {
            buffer.push(two);
        }
    }

    for dc in [-1, 1] {
        if let Some(to) = from.offset((dir, dc))
            && board.is_enemy(to, side)
        {
            buffer.push(to);
        }
    }
}

fn jumps(
    board: &Board,
    from: Square,
    side: ChessColor,
    deltas: &[(i8, i8)],
    buffer: &mut Vec<Square>,
) {
    for &delta in deltas {
        if let Some(to) = from.offset(delta)
            && board.color_at(to) != Some(side)
        {
            buffer.push(to);
        }
    }
}

fn slides(
    board: &Board,
    from: Square,
    side: ChessColor,
    rays: &[CompassRose],
    buffer: &mut Vec<Square>,
) {
    for ray in rays {
        let delta = ray.delta();
        let mut at = from;
        while let Some(to) = at.offset(delta) {
            match board.color_at(to) {
                None => buffer.push(to),
                Some(col) => {
                    if col != side {
                        buffer.push(to);
                    }
                    break;
                }
            }
            at = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChessMan;

    fn sorted(mut v: Vec<Square>) -> Vec<Square> {
        v.sort();
        v
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let b = Board::startpos();
        assert_eq!(generate_all_moves(&b, ChessColor::WHITE).len(), 20);
        assert_eq!(generate_all_moves(&b, ChessColor::BLACK).len(), 20);
    }

    #[test]
    fn blocked_rook_has_no_moves() {
        let b = Board::startpos();
        assert!(destinations(&b, Square::a1, ChessColor::WHITE).is_empty());
        assert!(destinations(&b, Square::h8, ChessColor::BLACK).is_empty());
    }

    #[test]
    fn wrong_side_or_empty_origin_yields_nothing() {
        let b = Board::startpos();
        assert!(destinations(&b, Square::e7, ChessColor::WHITE).is_empty());
        assert!(destinations(&b, Square::e4, ChessColor::WHITE).is_empty());
    }

    #[test]
    fn interior_king_reaches_all_neighbours() {
        let mut b = Board::empty();
        b.set(Square::d4, Some(ChessMan::WHITE_KING));
        b.set(Square::d6, Some(ChessMan::BLACK_KING));
        let got = sorted(destinations(&b, Square::d4, ChessColor::WHITE));
        use Square::*;
        assert_eq!(got, sorted(vec![c3, d3, e3, c4, e4, c5, d5, e5]));
    }

    #[test]
    fn pawn_double_step_and_captures() {
        let mut b = Board::startpos();
        b.set(Square::d3, Some(ChessMan::BLACK_KNIGHT));
        b.set(Square::f3, Some(ChessMan::WHITE_KNIGHT));
        let got = sorted(destinations(&b, Square::e2, ChessColor::WHITE));
        assert_eq!(got, sorted(vec![Square::e3, Square::e4, Square::d3]));

        // a piece right in front blocks both steps
        b.set(Square::e3, Some(ChessMan::BLACK_PAWN));
        assert_eq!(destinations(&b, Square::e2, ChessColor::WHITE), vec![Square::d3]);
    }

    #[test]
    fn black_pawns_move_down_the_grid() {
        let b = Board::startpos();
        let got = sorted(destinations(&b, Square::c7, ChessColor::BLACK));
        assert_eq!(got, sorted(vec![Square::c6, Square::c5]));
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let mut b = Board::empty();
        b.set(Square::d4, Some(ChessMan::WHITE_ROOK));
        b.set(Square::d6, Some(ChessMan::BLACK_PAWN));
        b.set(Square::f4, Some(ChessMan::WHITE_PAWN));
        let got = destinations(&b, Square::d4, ChessColor::WHITE);
        assert!(got.contains(&Square::d6));
        assert!(!got.contains(&Square::d7));
        assert!(got.contains(&Square::e4));
        assert!(!got.contains(&Square::f4));
        assert!(got.contains(&Square::a4));
        assert!(got.contains(&Square::d1));
        // d5 d6 / e4 / a4 b4 c4 / d1 d2 d3
        assert_eq!(got.len(), 9);
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let mut b = Board::empty();
        b.set(Square::e4, Some(ChessMan::BLACK_QUEEN));
        let q = destinations(&b, Square::e4, ChessColor::BLACK);
        assert_eq!(q.len(), 27);
    }

    #[test]
    fn knight_in_corner() {
        let mut b = Board::empty();
        b.set(Square::a1, Some(ChessMan::WHITE_KNIGHT));
        b.set(Square::c2, Some(ChessMan::WHITE_PAWN));
        assert_eq!(destinations(&b, Square::a1, ChessColor::WHITE), vec![Square::b3]);
    }
}
