//! # The 'mailbox' representation of a chessboard.
//!
//! This is the simple and most obvious representation,
//! using a separate value in an array for each square, a so-called
//! 'board'-centric representation.
//!
//! The [`Mailbox`] type is generalized to hold any value per square;
//! a chessboard is a `Mailbox<Option<ChessMan>>`, see [`Board`].

use strum::VariantArray;

use crate::model::{ChessColor, ChessMan, ChessPiece, Square, utils::SliceExtensions};

/// Data for each square on the board, indexed by [`Square::ix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Mailbox<T>(pub [T; 64]);

/// A chessboard: each square holds at most one chessman.
pub type Board = Mailbox<Option<ChessMan>>;

impl<T: Copy> Mailbox<T> {
    /// A mailbox with every square set to `fill`.
    pub fn filled(fill: T) -> Self {
        Self([fill; 64])
    }

    /// Read a square
    #[inline]
    pub fn get(&self, sq: Square) -> T {
        self.0[sq.ix()]
    }
}

impl<T> Mailbox<T> {
    /// Write to a square
    #[inline]
    pub fn set(&mut self, sq: Square, it: T) {
        self.0[sq.ix()] = it
    }

    /// Iterate squares in a1 ... h8 order together with their contents.
    pub fn squares(&self) -> impl Iterator<Item = (Square, &T)> {
        Square::VARIANTS.clones().zip(self.0.iter())
    }
}

impl Mailbox<Option<ChessMan>> {
    /// All squares empty.
    pub fn empty() -> Self {
        Self::filled(None)
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        use ChessPiece::*;
        const BACK_RANK: [ChessPiece; 8] =
            [ROOK, KNIGHT, BISHOP, QUEEN, KING, BISHOP, KNIGHT, ROOK];

        let mut res = Self::empty();
        for (col, piece) in BACK_RANK.clones().enumerate() {
            let col = col as i8;
            for (row, cm) in [
                (0, ChessMan::new(ChessColor::BLACK, piece)),
                (1, ChessMan::BLACK_PAWN),
                (6, ChessMan::WHITE_PAWN),
                (7, ChessMan::new(ChessColor::WHITE, piece)),
            ] {
                if let Some(sq) = Square::from_row_col(row, col) {
                    res.set(sq, Some(cm));
                }
            }
        }
        res
    }

    /// Occupied squares holding chessmen of the given color.
    pub fn men(&self, col: ChessColor) -> impl Iterator<Item = (Square, ChessMan)> + '_ {
        self.squares()
            .filter_map(|(sq, cm)| cm.map(|cm| (sq, cm)))
            .filter(move |(_, cm)| cm.col() == col)
    }

    /// Number of squares holding exactly this chessman.
    pub fn count(&self, cm: ChessMan) -> usize {
        self.0.iter().filter(|x| **x == Some(cm)).count()
    }

    /// Color of the chessman on a square, if any.
    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<ChessColor> {
        self.get(sq).map(ChessMan::col)
    }

    /// Whether the square holds a chessman of the opposing color.
    #[inline]
    pub fn is_enemy(&self, sq: Square, col: ChessColor) -> bool {
        self.color_at(sq) == Some(col.opp())
    }
}

impl Default for Mailbox<Option<ChessMan>> {
    fn default() -> Self {
        Self::empty()
    }
}

#[test]
fn startpos_layout() {
    let b = Board::startpos();
    assert_eq!(b.get(Square::e1), Some(ChessMan::WHITE_KING));
    assert_eq!(b.get(Square::d8), Some(ChessMan::BLACK_QUEEN));
    assert_eq!(b.get(Square::a2), Some(ChessMan::WHITE_PAWN));
    assert_eq!(b.get(Square::h7), Some(ChessMan::BLACK_PAWN));
    assert_eq!(b.get(Square::e4), None);
    assert_eq!(b.men(ChessColor::WHITE).count(), 16);
    assert_eq!(b.men(ChessColor::BLACK).count(), 16);
    assert_eq!(b.count(ChessMan::BLACK_KING), 1);
}

#[test]
fn empty_board_is_empty() {
    let b = Board::empty();
    assert!(b.0.iter().all(Option::is_none));
    assert_eq!(b, Board::default());
}
