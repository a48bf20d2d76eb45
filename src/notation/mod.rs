//! Text formats: the position-notation string and standard algebraic
//! notation for moves.
//!
//! Parsers are built with [`chumsky`] combinators. Every parsable type
//! implements [`Parsable`], so that composite parsers can be assembled
//! from the parsers of their parts.

pub mod position;
pub mod stdalg;

use std::fmt::Display;

use chumsky::prelude::*;

use crate::model::{ChessColor, ChessMan, ChessPiece, Square};

/// Shorthand for a string parser with the default (empty) error type.
pub trait Prs<'s, T>: Parser<'s, &'s str, T> {}

impl<'s, T, P: Parser<'s, &'s str, T>> Prs<'s, T> for P {}

/// A type with a canonical parser.
pub trait Parsable: Sized {
    fn parser<'s>() -> impl Prs<'s, Self>;

    /// Parse the whole of `s`, rejecting trailing input.
    fn parse_str(s: &str) -> Option<Self> {
        Self::parser().then_ignore(end()).parse(s).into_output()
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl Display for ChessMan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            let arr = match self.col() {
                ChessColor::WHITE => ["♙", "♘", "♗", "♖", "♕", "♔"],
                ChessColor::BLACK => ["♟", "♞", "♝", "♜", "♛", "♚"],
            };
            write!(f, "{}", arr[self.piece().ix()])
        } else {
            write!(f, "{}", self.letter())
        }
    }
}

impl Display for ChessPiece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.letter().to_ascii_lowercase())
        } else {
            write!(f, "{}", self.letter())
        }
    }
}

impl Display for ChessColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            match *self {
                Self::WHITE => write!(f, "w"),
                Self::BLACK => write!(f, "b"),
            }
        } else {
            match *self {
                Self::WHITE => write!(f, "white"),
                Self::BLACK => write!(f, "black"),
            }
        }
    }
}

/// File letter `a` ... `h` as a zero-based column.
pub fn board_file<'s>() -> impl Prs<'s, u8> {
    one_of('a'..='h').map(|c: char| c as u8 - b'a')
}

/// Rank digit `1` ... `8` as a rank number.
pub fn board_rank<'s>() -> impl Prs<'s, u8> {
    one_of('1'..='8').map(|c: char| c as u8 - b'0')
}

impl Parsable for Square {
    fn parser<'s>() -> impl Prs<'s, Self> {
        board_file()
            .then(board_rank())
            .map(|(file, rank)| Square::from_u8(((rank - 1) << 3) | file))
    }
}

impl Parsable for ChessColor {
    fn parser<'s>() -> impl Prs<'s, Self> {
        choice((
            just("white").to(ChessColor::WHITE),
            just("black").to(ChessColor::BLACK),
            just('w').to(ChessColor::WHITE),
            just('b').to(ChessColor::BLACK),
        ))
    }
}

#[test]
fn square_display_and_parse() {
    use strum::IntoEnumIterator;
    for sq in Square::iter() {
        let sqs = sq.to_string();
        assert_eq!(Square::parse_str(&sqs), Some(sq), "unable to parse {sqs}");
    }
    assert_eq!(Square::e4.to_string(), "e4");
    assert_eq!(Square::parse_str("i9"), None);
    assert_eq!(Square::parse_str("e44"), None);
}

#[test]
fn color_parse() {
    assert_eq!(ChessColor::parse_str("white"), Some(ChessColor::WHITE));
    assert_eq!(ChessColor::parse_str("b"), Some(ChessColor::BLACK));
    assert_eq!(ChessColor::parse_str("red"), None);
    assert_eq!(format!("{:#}", ChessColor::BLACK), "b");
}
