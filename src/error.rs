//! Errors surfaced by the engine and the game controllers.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::model::{ChessColor, Square};

/// A position-notation string that does not describe a usable board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("position notation is empty")]
    Empty,

    #[error("unreadable position notation: {0:?}")]
    Syntax(String),

    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),

    #[error("rank {rank} has {width} squares, expected 8")]
    RankWidth { rank: u8, width: usize },

    #[error("no {0:?} king on the board")]
    MissingKing(ChessColor),

    #[error("{0:?} is not a move in this position")]
    UnplayableMove(String),
}

/// A rejected move request. The board it was made against is unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("there is no chessman on {0}")]
    EmptyOrigin(Square),

    #[error("the chessman on {square} belongs to {owner:?}, not {side:?}")]
    WrongSide {
        square: Square,
        owner: ChessColor,
        side: ChessColor,
    },

    #[error("{from} cannot move to {to}")]
    Unreachable { from: Square, to: Square },
}

/// The side to move has no moves at all: the round is over.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{0:?} has no legal moves")]
pub struct NoLegalMoves(pub ChessColor);

/// Failures building, loading or saving an opening book.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: expected eco, name and moves separated by tabs")]
    MalformedRecord { line: usize },

    #[error("line {line}: {token:?} is not a move in standard algebraic notation")]
    BadMove { line: usize, token: String },

    #[error("decoding opening book: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("encoding opening book: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("decoding opening book json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("decoding configuration: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("recall rounds must be 3, 5 or 7, not {0}")]
    RecallRounds(u8),
}

/// Failures of the game controllers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot {action} while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    NoLegalMoves(#[from] NoLegalMoves),

    #[error("no hints remaining")]
    NoHints,

    #[error("recall rounds must be 3, 5 or 7, not {0}")]
    InvalidRounds(u8),
}
