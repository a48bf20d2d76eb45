//! # Position notation
//!
//! A compact, FEN-like serialization of a [`Board`]. The board is written
//! as eight solidus-separated (`/`) ranks, starting with the 8th rank and
//! then in descending order, files in a-h order.
//!
//! Occupied squares are written as a single letter, upper case for white
//! and lower case for black: P for pawns, N for knights, B for bishops,
//! R for rooks, Q for queens and K for kings. Empty squares are
//! run-length encoded as digits, 1 meaning a single empty square up to 8
//! meaning an entirely empty rank.
//!
//! Only the board field carries information. Serialization appends the
//! constant suffix [`POSITION_SUFFIX`] so the result reads as FEN; parsing
//! ignores everything after the first whitespace.
//!
//! Thus the notation of the standard starting position is:
//! ```text
//! rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1
//! ```

use chumsky::prelude::*;
use tracing::warn;

use crate::{
    error::NotationError,
    model::{Board, ChessColor, ChessMan, Square},
    notation::Prs,
};

/// Standard starting position, with the usual FEN fields.
pub const STARTING_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Placeholder side-to-move, castling, en-passant and clock fields.
pub const POSITION_SUFFIX: &str = " w - - 0 1";

/// The result of [`parse_position`]: a board, and the reason the standard
/// starting position was substituted, if it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPosition {
    pub board: Board,
    pub fallback: Option<NotationError>,
}

impl ParsedPosition {
    /// Whether the input was rejected and the starting position used instead.
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Decode a position, substituting the starting position for anything
/// that does not decode to an 8×8 board with a king of each color.
///
/// The substitution is reported in [`ParsedPosition::fallback`].
pub fn parse_position(notation: &str) -> ParsedPosition {
    match try_parse_position(notation) {
        Ok(board) => ParsedPosition {
            board,
            fallback: None,
        },
        Err(err) => {
            warn!(%err, notation, "invalid position, using the starting position");
            ParsedPosition {
                board: Board::startpos(),
                fallback: Some(err),
            }
        }
    }
}

/// Decode a position, reporting why it was rejected.
pub fn try_parse_position(notation: &str) -> Result<Board, NotationError> {
    let field = notation.split_whitespace().next().ok_or(NotationError::Empty)?;

    let ranks = position_board()
        .then_ignore(end())
        .parse(field)
        .into_result()
        .map_err(|_| NotationError::Syntax(field.to_owned()))?;

    if ranks.len() != 8 {
        return Err(NotationError::RankCount(ranks.len()));
    }

    let mut board = Board::empty();
    for (row, rank) in ranks.iter().enumerate() {
        if rank.len() != 8 {
            return Err(NotationError::RankWidth {
                rank: 8 - row as u8,
                width: rank.len(),
            });
        }
        for (col, cm) in rank.iter().enumerate() {
            if let Some(sq) = Square::from_row_col(row as i8, col as i8) {
                board.set(sq, *cm);
            }
        }
    }

    for (col, king) in [
        (ChessColor::WHITE, ChessMan::WHITE_KING),
        (ChessColor::BLACK, ChessMan::BLACK_KING),
    ] {
        if board.count(king) == 0 {
            return Err(NotationError::MissingKing(col));
        }
    }

    Ok(board)
}

/// Encode a board, including the placeholder suffix.
pub fn serialize_position(board: &Board) -> String {
    let mut res = serialize_board(board);
    res.push_str(POSITION_SUFFIX);
    res
}

/// Encode only the board field.
pub fn serialize_board(board: &Board) -> String {
    let mut res = String::with_capacity(72);
    for row in 0..8 {
        let mut empty = 0;
        for col in 0..8 {
            let cm = Square::from_row_col(row, col).and_then(|sq| board.get(sq));
            match cm {
                None => empty += 1,
                Some(cm) => {
                    if empty > 0 {
                        res.push(char::from(b'0' + empty));
                        empty = 0;
                    }
                    res.push(cm.letter());
                }
            }
        }
        if empty > 0 {
            res.push(char::from(b'0' + empty));
        }
        if row < 7 {
            res.push('/');
        }
    }
    res
}

/// A single chessman letter.
pub fn position_chessman<'s>() -> impl Prs<'s, ChessMan> {
    use ChessMan::*;
    choice((
        just('k').to(BLACK_KING),
        just('q').to(BLACK_QUEEN),
        just('r').to(BLACK_ROOK),
        just('b').to(BLACK_BISHOP),
        just('n').to(BLACK_KNIGHT),
        just('p').to(BLACK_PAWN),
        just('P').to(WHITE_PAWN),
        just('N').to(WHITE_KNIGHT),
        just('B').to(WHITE_BISHOP),
        just('R').to(WHITE_ROOK),
        just('Q').to(WHITE_QUEEN),
        just('K').to(WHITE_KING),
    ))
}

/// One rank, with run-lengths expanded. The width is not checked here.
pub fn position_rank<'s>() -> impl Prs<'s, Vec<Option<ChessMan>>> {
    choice((
        position_chessman().map(|cm| vec![Some(cm)]),
        one_of('1'..='8').map(|c: char| vec![None; (c as u8 - b'0') as usize]),
    ))
    .repeated()
    .at_least(1)
    .collect::<Vec<_>>()
    .map(|vv| vv.concat())
}

/// Solidus-separated ranks. The count is not checked here.
pub fn position_board<'s>() -> impl Prs<'s, Vec<Vec<Option<ChessMan>>>> {
    position_rank().separated_by(just('/')).at_least(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_roundtrip() {
        let parsed = parse_position(STARTING_POSITION);
        assert!(!parsed.is_fallback());
        assert_eq!(parsed.board, Board::startpos());
        assert_eq!(
            serialize_position(&parsed.board),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );
    }

    #[test]
    fn kings_only() {
        let b = try_parse_position("8/8/3k4/8/3K4/8/8/8").unwrap();
        assert_eq!(b.get(Square::d6), Some(ChessMan::BLACK_KING));
        assert_eq!(b.get(Square::d4), Some(ChessMan::WHITE_KING));
        assert_eq!(serialize_board(&b), "8/8/3k4/8/3K4/8/8/8");
    }

    #[test]
    fn rejections() {
        assert_eq!(try_parse_position(""), Err(NotationError::Empty));
        assert_eq!(try_parse_position("   "), Err(NotationError::Empty));
        assert_eq!(
            try_parse_position("8/8/8/8/8/8/8/8/8"),
            Err(NotationError::RankCount(9))
        );
        assert_eq!(
            try_parse_position("4k3/8/8/8/8/8/8/3K5"),
            Err(NotationError::RankWidth { rank: 1, width: 9 })
        );
        assert_eq!(
            try_parse_position("8/8/8/8/8/8/8/4K3"),
            Err(NotationError::MissingKing(ChessColor::BLACK))
        );
        assert!(matches!(
            try_parse_position("4k3/8/8/8/8/8/8/4X3"),
            Err(NotationError::Syntax(_))
        ));
        assert!(matches!(
            try_parse_position("4k3/8/8/8//8/8/4K3"),
            Err(NotationError::Syntax(_))
        ));
    }

    #[test]
    fn fallback_is_observable() {
        let parsed = parse_position("not a position");
        assert!(parsed.is_fallback());
        assert_eq!(parsed.board, Board::startpos());

        let parsed = parse_position("8/8/8/8/8/8/8/8 w - - 0 1");
        assert_eq!(parsed.fallback, Some(NotationError::MissingKing(ChessColor::WHITE)));
    }

    #[test]
    fn sample_middlegame() {
        let notation = "r1bq1rk1/ppp2ppp/2np1n2/4p3/2B1P3/2NP1N2/PPP2PPP/R1BQ1RK1 w - - 0 1";
        let b = try_parse_position(notation).unwrap();
        assert_eq!(serialize_position(&b), notation);
    }
}
