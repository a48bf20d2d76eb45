//! Chess engine behind a set of memory and prediction training games.
//!
//! The rules are a deliberately simplified approximation of chess: moves
//! follow the movement geometry of each piece, and there is no check,
//! castling, en-passant or promotion. The engine's opponent plays from an
//! opening book while the game is young and otherwise samples among the
//! best moves of a simple heuristic.

/// Modeling the game of chess.
pub mod model;

/// Position notation and standard algebraic notation.
pub mod notation;

/// Opening book, heuristic and move selection.
pub mod engine;

/// Prediction, recall and board-recreation games.
pub mod game;

pub mod config;
pub mod error;
