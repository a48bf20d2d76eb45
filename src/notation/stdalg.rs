//! # Standard algebraic notation
//!
//! Engine moves are written in SAN without check markers. A pawn move is
//! its destination, `e4`, or for a capture its origin file, `x` and the
//! destination, `exd5`. A move by any other piece is its upper-case letter,
//! as much of its origin as needed to tell it apart from another piece of
//! the same kind that could reach the same square, `x` when capturing, and
//! the destination: `Nf3`, `Nbd7`, `R1e2`, `Qh4xe1`.
//!
//! The parser also accepts castling and promotions, which occur in opening
//! datasets even though the engine never plays them.

use std::{fmt::Display, sync::LazyLock};

use chumsky::prelude::*;
use regex::Regex;

use crate::{
    model::{Board, ChessMove, ChessPiece, Square, movegen::destinations},
    notation::{Parsable, Prs, board_file, board_rank},
};

/// A move as written in standard algebraic notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StdAlg {
    Pawn {
        /// Origin file (0-based) of a capture.
        capture_from: Option<u8>,
        to: Square,
        promotion: Option<ChessPiece>,
    },
    Piece {
        piece: ChessPiece,
        /// Origin file (0-based) given for disambiguation.
        file: Option<u8>,
        /// Origin rank (1-based) given for disambiguation.
        rank: Option<u8>,
        capture: bool,
        to: Square,
    },
    Castle {
        long: bool,
    },
}

impl StdAlg {
    /// Describe `mv` as played on `board`, before the move is made.
    pub fn describe(board: &Board, mv: ChessMove) -> Self {
        if mv.piece == ChessPiece::PAWN {
            return StdAlg::Pawn {
                capture_from: (mv.from.col() != mv.to.col()).then_some(mv.from.col()),
                to: mv.to,
                promotion: None,
            };
        }

        let rivals: Vec<Square> = match board.get(mv.from) {
            Some(cm) => board
                .men(cm.col())
                .filter(|&(sq, other)| {
                    other == cm
                        && sq != mv.from
                        && destinations(board, sq, cm.col()).contains(&mv.to)
                })
                .map(|(sq, _)| sq)
                .collect(),
            None => Vec::new(),
        };

        let (file, rank) = if rivals.is_empty() {
            (None, None)
        } else if rivals.iter().all(|sq| sq.col() != mv.from.col()) {
            (Some(mv.from.col()), None)
        } else if rivals.iter().all(|sq| sq.rank() != mv.from.rank()) {
            (None, Some(mv.from.rank()))
        } else {
            (Some(mv.from.col()), Some(mv.from.rank()))
        };

        StdAlg::Piece {
            piece: mv.piece,
            file,
            rank,
            capture: board.get(mv.to).is_some(),
            to: mv.to,
        }
    }
}

/// SAN of `mv` as played on `board`.
pub fn san(board: &Board, mv: ChessMove) -> String {
    StdAlg::describe(board, mv).to_string()
}

impl Display for StdAlg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            StdAlg::Pawn {
                capture_from,
                to,
                promotion,
            } => {
                if let Some(file) = capture_from {
                    write!(f, "{}x", char::from(b'a' + file))?;
                }
                write!(f, "{to}")?;
                if let Some(p) = promotion {
                    write!(f, "={p}")?;
                }
                Ok(())
            }
            StdAlg::Piece {
                piece,
                file,
                rank,
                capture,
                to,
            } => {
                write!(f, "{piece}")?;
                if let Some(file) = file {
                    write!(f, "{}", char::from(b'a' + file))?;
                }
                if let Some(rank) = rank {
                    write!(f, "{rank}")?;
                }
                if capture {
                    write!(f, "x")?;
                }
                write!(f, "{to}")
            }
            StdAlg::Castle { long: false } => write!(f, "O-O"),
            StdAlg::Castle { long: true } => write!(f, "O-O-O"),
        }
    }
}

impl Parsable for StdAlg {
    fn parser<'s>() -> impl Prs<'s, Self> {
        choice((castling(), officer_move(), pawn_move()))
    }
}

fn pawn_move<'s>() -> impl Prs<'s, StdAlg> {
    let promotion = just('=').or_not().ignore_then(promotion_piece()).or_not();
    choice((
        board_file().then_ignore(just('x')).map(Some).then(Square::parser()),
        Square::parser().map(|to| (None, to)),
    ))
    .then(promotion)
    .map(|((capture_from, to), promotion)| StdAlg::Pawn {
        capture_from,
        to,
        promotion,
    })
}

fn promotion_piece<'s>() -> impl Prs<'s, ChessPiece> {
    use ChessPiece::*;
    choice((
        just('N').to(KNIGHT),
        just('B').to(BISHOP),
        just('R').to(ROOK),
        just('Q').to(QUEEN),
    ))
}

fn officer<'s>() -> impl Prs<'s, ChessPiece> {
    use ChessPiece::*;
    choice((
        just('N').to(KNIGHT),
        just('B').to(BISHOP),
        just('R').to(ROOK),
        just('Q').to(QUEEN),
        just('K').to(KING),
    ))
}

pub fn is_it<'s, T>(p: impl Prs<'s, T>) -> impl Prs<'s, bool> {
    p.or_not().map(|s| s.is_some())
}

// Alternatives are tried longest first since a file or rank consumed as
// disambiguation is not given back.
fn officer_move<'s>() -> impl Prs<'s, StdAlg> {
    let origin = choice((
        board_file().then(board_rank()).map(|(f, r)| (Some(f), Some(r))),
        board_file().map(|f| (Some(f), None)),
        board_rank().map(|r| (None, Some(r))),
    ));

    let with_origin = officer()
        .then(origin)
        .then(is_it(just('x')))
        .then(Square::parser());
    let without_origin = officer()
        .then(empty().to((None, None)))
        .then(is_it(just('x')))
        .then(Square::parser());

    choice((with_origin, without_origin)).map(|(((piece, (file, rank)), capture), to)| {
        StdAlg::Piece {
            piece,
            file,
            rank,
            capture,
            to,
        }
    })
}

fn castling<'s>() -> impl Prs<'s, StdAlg> {
    choice((
        choice((just("O-O-O"), just("0-0-0"))).to(StdAlg::Castle { long: true }),
        choice((just("O-O"), just("0-0"))).to(StdAlg::Castle { long: false }),
    ))
}

static MOVE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.+").expect("move number pattern"));
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+#!?]+$").expect("annotation pattern"));

/// Strip a dataset token down to its bare SAN: leading move numbers
/// (`1.`, `12...`) and trailing check or quality marks (`+`, `#`, `!?`).
///
/// Tokens that are nothing but a move number give `None`.
pub fn strip_token(token: &str) -> Option<&str> {
    let token = token.trim();
    let token = match MOVE_NUMBER.find(token) {
        Some(m) => &token[m.end()..],
        None => token,
    };
    let token = match ANNOTATION.find(token) {
        Some(m) => &token[..m.start()],
        None => token,
    };
    (!token.is_empty()).then_some(token)
}

/// Parse a dataset token into canonical SAN. `Ok(None)` for a bare move
/// number, `Err` with the offending token when it is not SAN.
pub fn canonical_token(token: &str) -> Result<Option<String>, String> {
    match strip_token(token) {
        None => Ok(None),
        Some(bare) => StdAlg::parse_str(bare)
            .map(|alg| Some(alg.to_string()))
            .ok_or_else(|| token.to_owned()),
    }
}
