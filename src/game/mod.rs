//! Game controllers built on the engine.
//!
//! Each controller is a small state machine: calls made in the wrong phase
//! are rejected with [`GameError::WrongPhase`](crate::error::GameError) and
//! leave the game unchanged. Randomness is owned by the controller and
//! supplied by the caller at construction.

pub mod challenge;
pub mod prediction;
pub mod recall;

use crate::{error::GameError, model::ChessColor};

pub use prediction::{PredictionGame, PredictionPhase, PredictionResult, PredictionSummary};
pub use recall::{
    RecallGame, RecallGrade, RecallPhase, RecallSummary, Reply, grade_recall, parse_transcription,
};

/// Side the user plays in the prediction game; the engine plays the other.
pub const PREDICTION_USER: ChessColor = ChessColor::WHITE;

pub(crate) fn wrong_phase(action: &'static str, phase: impl Into<&'static str>) -> GameError {
    GameError::WrongPhase {
        action,
        phase: phase.into(),
    }
}
