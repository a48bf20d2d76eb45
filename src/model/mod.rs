//! # Modeling the chessboard.
//!
//! This module contains enums modeling values in chess,
//! as well as the board representation and the move rules
//! in its sub-modules.
//!
//! The rules modeled here are a deliberately simplified, pseudo-legal
//! approximation of chess: there is no check detection, no castling, no
//! en-passant and no promotion. Kings can be captured like any other
//! chessman.

use strum::{EnumIs, EnumIter, FromRepr, VariantArray};

pub mod board;
pub mod movegen;
pub mod moving;
pub mod utils;

pub use board::{Board, Mailbox};

/// Representation of the squares on a chessboard.
///
/// This enum uses the convention of numbering
/// squares starting with a1 = 0 and then counting
/// up over the files first, b1 = 1, c1 = 2, ... and then the
/// ranks, a2 = 8, a3 = 16, ... ending with h8 = 63.
///
/// Callers that think of the board as a grid seen from white's side use
/// [`Square::row`] and [`Square::col`] instead, where row 0 is the 8th
/// rank (black's home rank) and column 0 is the a-file.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    VariantArray, EnumIter, FromRepr)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Square {
    a1 = 0o00, b1 = 0o01, c1 = 0o02, d1 = 0o03, e1 = 0o04, f1 = 0o05, g1 = 0o06, h1 = 0o07,
    a2 = 0o10, b2 = 0o11, c2 = 0o12, d2 = 0o13, e2 = 0o14, f2 = 0o15, g2 = 0o16, h2 = 0o17,
    a3 = 0o20, b3 = 0o21, c3 = 0o22, d3 = 0o23, e3 = 0o24, f3 = 0o25, g3 = 0o26, h3 = 0o27,
    a4 = 0o30, b4 = 0o31, c4 = 0o32, d4 = 0o33, e4 = 0o34, f4 = 0o35, g4 = 0o36, h4 = 0o37,
    a5 = 0o40, b5 = 0o41, c5 = 0o42, d5 = 0o43, e5 = 0o44, f5 = 0o45, g5 = 0o46, h5 = 0o47,
    a6 = 0o50, b6 = 0o51, c6 = 0o52, d6 = 0o53, e6 = 0o54, f6 = 0o55, g6 = 0o56, h6 = 0o57,
    a7 = 0o60, b7 = 0o61, c7 = 0o62, d7 = 0o63, e7 = 0o64, f7 = 0o65, g7 = 0o66, h7 = 0o67,
    a8 = 0o70, b8 = 0o71, c8 = 0o72, d8 = 0o73, e8 = 0o74, f8 = 0o75, g8 = 0o76, h8 = 0o77,
}

impl Square {
    /// Use this Square as an array index.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// Infallible conversion from a u8 by way of truncating the
    /// extraneous bits.
    #[inline]
    pub fn from_u8(ix: u8) -> Self {
        Self::VARIANTS[(ix & 0x3F) as usize]
    }

    /// Zero-based file index, a = 0 ... h = 7.
    #[inline]
    pub fn col(self) -> u8 {
        self as u8 & 0x7
    }

    /// Zero-based grid row, 8th rank = 0 ... 1st rank = 7.
    #[inline]
    pub fn row(self) -> u8 {
        7 - ((self as u8 & 0x38) >> 3)
    }

    /// Grid coordinates `(row, col)`.
    #[inline]
    pub fn row_col(self) -> (u8, u8) {
        (self.row(), self.col())
    }

    /// Square at the given grid coordinates, if they are on the board.
    ///
    /// Takes signed coordinates so that stepping off the board while
    /// walking a ray is simply a `None`.
    #[inline]
    pub fn from_row_col(row: i8, col: i8) -> Option<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self::from_u8(((7 - row as u8) << 3) | col as u8))
        } else {
            None
        }
    }

    /// The square reached by stepping `(dr, dc)` in grid coordinates.
    #[inline]
    pub fn offset(self, (dr, dc): (i8, i8)) -> Option<Self> {
        Self::from_row_col(self.row() as i8 + dr, self.col() as i8 + dc)
    }

    /// File letter, `'a'` ... `'h'`.
    #[inline]
    pub fn file(self) -> char {
        char::from(b'a' + self.col())
    }

    /// Rank number, 1 ... 8.
    #[inline]
    pub fn rank(self) -> u8 {
        1 + ((self as u8 & 0x38) >> 3)
    }
}

/// Representation of color of a player or chessman.
///
/// The discriminants are used for indexing arrays of the form
/// `[<white value>, <black value>]`.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, VariantArray)]
#[repr(u8)]
pub enum ChessColor {
    WHITE = 0,
    BLACK = 1,
}

impl ChessColor {
    /// Opposing color.
    #[inline]
    pub fn opp(self) -> Self {
        match self {
            Self::WHITE => Self::BLACK,
            Self::BLACK => Self::WHITE,
        }
    }

    /// Associated array index.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    /// Row delta of a pawn step for this color. White moves up the grid
    /// (towards row 0), black moves down.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Self::WHITE => -1,
            Self::BLACK => 1,
        }
    }

    /// Grid row the pawns of this color start on.
    #[inline]
    pub fn pawn_row(self) -> u8 {
        match self {
            Self::WHITE => 6,
            Self::BLACK => 1,
        }
    }
}

/// Representation of the piece kinds of chessmen.
///
/// The discriminant values of this enum are the absolute
/// values of the [`ChessMan`] enum, or equivalently, the white chessmen.
///
/// This kind is the dispatch key of move generation and the index of
/// every per-kind table in the evaluator.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, VariantArray, EnumIs)]
#[repr(u8)]
pub enum ChessPiece {
    PAWN = 1,
    KNIGHT = 2,
    BISHOP = 3,
    ROOK = 4,
    QUEEN = 5,
    KING = 6,
}

impl ChessPiece {
    /// Use as an array index: equal to one less than the discriminant value.
    #[inline]
    pub fn ix(self) -> usize {
        self as usize - 1
    }

    /// Upper-case letter used in notation, `P` for pawns.
    #[inline]
    pub fn letter(self) -> char {
        ['P', 'N', 'B', 'R', 'Q', 'K'][self.ix()]
    }

    /// Inverse of [`ChessPiece::letter`], case-insensitive.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(Self::PAWN),
            'N' => Some(Self::KNIGHT),
            'B' => Some(Self::BISHOP),
            'R' => Some(Self::ROOK),
            'Q' => Some(Self::QUEEN),
            'K' => Some(Self::KING),
            _ => None,
        }
    }
}

/// Representation of a chessman: a piece kind together with its color.
///
/// The discriminants allows niche optimization with a byte value of
/// 0 representing absence, and with the sign representing color, so an
/// `Option<ChessMan>` is a full description of a square's contents and a
/// square can never hold a kind without a color or vice versa.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, VariantArray)]
#[repr(i8)]
pub enum ChessMan {
    /// ♚
    BLACK_KING = -6,
    /// ♛
    BLACK_QUEEN = -5,
    /// ♜
    BLACK_ROOK = -4,
    /// ♝
    BLACK_BISHOP = -3,
    /// ♞
    BLACK_KNIGHT = -2,
    /// ♟
    BLACK_PAWN = -1,
    /// ♙
    WHITE_PAWN = 1,
    /// ♘
    WHITE_KNIGHT = 2,
    /// ♗
    WHITE_BISHOP = 3,
    /// ♖
    WHITE_ROOK = 4,
    /// ♕
    WHITE_QUEEN = 5,
    /// ♔
    WHITE_KING = 6,
}

impl ChessMan {
    /// Combine a color and a piece kind.
    pub fn new(col: ChessColor, piece: ChessPiece) -> Self {
        use ChessMan::*;
        use ChessPiece::*;
        match (col, piece) {
            (ChessColor::WHITE, PAWN) => WHITE_PAWN,
            (ChessColor::WHITE, KNIGHT) => WHITE_KNIGHT,
            (ChessColor::WHITE, BISHOP) => WHITE_BISHOP,
            (ChessColor::WHITE, ROOK) => WHITE_ROOK,
            (ChessColor::WHITE, QUEEN) => WHITE_QUEEN,
            (ChessColor::WHITE, KING) => WHITE_KING,
            (ChessColor::BLACK, PAWN) => BLACK_PAWN,
            (ChessColor::BLACK, KNIGHT) => BLACK_KNIGHT,
            (ChessColor::BLACK, BISHOP) => BLACK_BISHOP,
            (ChessColor::BLACK, ROOK) => BLACK_ROOK,
            (ChessColor::BLACK, QUEEN) => BLACK_QUEEN,
            (ChessColor::BLACK, KING) => BLACK_KING,
        }
    }

    /// The associated colorless piece kind of a chessman.
    #[inline]
    pub fn piece(self) -> ChessPiece {
        ChessPiece::from(self)
    }

    /// The color of the chessman in question.
    #[inline]
    pub fn col(self) -> ChessColor {
        ChessColor::from(self)
    }

    /// Position-notation letter: upper case for white, lower case for black.
    pub fn letter(self) -> char {
        let c = self.piece().letter();
        match self.col() {
            ChessColor::WHITE => c,
            ChessColor::BLACK => c.to_ascii_lowercase(),
        }
    }

    /// Inverse of [`ChessMan::letter`].
    pub fn from_letter(c: char) -> Option<Self> {
        let col = if c.is_ascii_uppercase() {
            ChessColor::WHITE
        } else {
            ChessColor::BLACK
        };
        ChessPiece::from_letter(c).map(|p| Self::new(col, p))
    }
}

/// Extracting the color of a chessman.
impl From<ChessMan> for ChessColor {
    fn from(value: ChessMan) -> Self {
        if (value as i8) < 0 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

/// Extracting the piece kind of a chessman.
impl From<ChessMan> for ChessPiece {
    fn from(value: ChessMan) -> Self {
        Self::VARIANTS[(value as i8).unsigned_abs() as usize - 1]
    }
}

/// Representation of a move on a chessboard.
///
/// There is no notion of captured chessman, promotion or any special
/// move: a move relocates the chessman on `from` to `to` and overwrites
/// whatever stood there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove {
    pub piece: ChessPiece,
    pub from: Square,
    pub to: Square,
}

impl ChessMove {
    pub fn new(piece: ChessPiece, from: Square, to: Square) -> Self {
        Self { piece, from, to }
    }
}

/// Wrapper for moves produced by the move generator, that is they obey
/// the movement geometry of the chessman but might leave the moving
/// player's king attacked.
///
/// Provided as syntactic salt for the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PseudoLegal(pub ChessMove);

#[test]
fn square_row_col_roundtrip() {
    for sq in Square::VARIANTS.iter().copied() {
        let (r, c) = sq.row_col();
        assert_eq!(Square::from_row_col(r as i8, c as i8), Some(sq));
    }
    assert_eq!(Square::a8.row_col(), (0, 0));
    assert_eq!(Square::h1.row_col(), (7, 7));
    assert_eq!(Square::from_row_col(-1, 3), None);
    assert_eq!(Square::from_row_col(3, 8), None);
}

#[test]
fn chessman_letters() {
    for cm in ChessMan::VARIANTS.iter().copied() {
        assert_eq!(ChessMan::from_letter(cm.letter()), Some(cm));
        assert_eq!(ChessMan::new(cm.col(), cm.piece()), cm);
    }
    assert_eq!(ChessMan::WHITE_KNIGHT.letter(), 'N');
    assert_eq!(ChessMan::BLACK_QUEEN.letter(), 'q');
    assert_eq!(ChessMan::from_letter('x'), None);
}
