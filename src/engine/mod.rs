//! The opponent: an opening book, a move-scoring heuristic and the
//! selector that combines them.

pub mod book;
pub mod eval;
pub mod history;
pub mod select;

pub use book::{OpeningBook, OpeningBookBuilder, OpeningRecord};
pub use eval::Heuristic;
pub use history::{HistoryEntry, MoveHistory};
pub use select::{AiMoveSelector, ChosenMove, MoveSource};
