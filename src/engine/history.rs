//! Move history of the current round.

use crate::{
    error::NotationError,
    model::{
        Board, ChessColor, ChessMove, ChessPiece, movegen::generate_all_moves, moving::make_move,
    },
    notation::stdalg::{san, strip_token},
};

/// One ply as it was played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// SAN of the move, as rendered against the board it was played on.
    pub notation: String,
    pub color: ChessColor,
    pub mv: ChessMove,
}

impl HistoryEntry {
    pub fn piece(&self) -> ChessPiece {
        self.mv.piece
    }
}

/// Append-only record of the plies of a round. Cleared when the round
/// is reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    entries: Vec<HistoryEntry>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notation: impl Into<String>, color: ChessColor, mv: ChessMove) {
        self.entries.push(HistoryEntry {
            notation: notation.into(),
            color,
            mv,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of plies played.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn notations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.notation.as_str())
    }

    /// The notations joined with single spaces: the opening book key of
    /// the current position.
    pub fn key(&self) -> String {
        self.notations().collect::<Vec<_>>().join(" ")
    }

    /// Replay SAN moves from `start`, white moving first. Each move must
    /// match the notation of one of the generated moves; move numbers and
    /// check marks are tolerated.
    pub fn replay<S: AsRef<str>>(
        start: &Board,
        moves: &[S],
    ) -> Result<(Board, Self), NotationError> {
        let mut board = *start;
        let mut history = Self::new();
        let mut side = ChessColor::WHITE;
        for token in moves {
            let Some(token) = strip_token(AsRef::<str>::as_ref(token)) else {
                continue;
            };
            let mv = generate_all_moves(&board, side)
                .into_iter()
                .find(|&mv| san(&board, mv) == token)
                .ok_or_else(|| NotationError::UnplayableMove(token.to_owned()))?;
            history.push(token, side, mv);
            make_move(&mut board, mv);
            side = side.opp();
        }
        Ok((board, history))
    }

    /// How many earlier plies, by either side, moved a piece of kind
    /// `piece`.
    pub fn prior_moves(&self, piece: ChessPiece) -> usize {
        self.entries.iter().filter(|e| e.piece() == piece).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Square;

    #[test]
    fn key_and_prior_moves() {
        let mut h = MoveHistory::new();
        assert_eq!(h.key(), "");
        h.push("e4", ChessColor::WHITE, ChessMove::new(ChessPiece::PAWN, Square::e2, Square::e4));
        h.push("e5", ChessColor::BLACK, ChessMove::new(ChessPiece::PAWN, Square::e7, Square::e5));
        let nf3 = ChessMove::new(ChessPiece::KNIGHT, Square::g1, Square::f3);
        h.push("Nf3", ChessColor::WHITE, nf3);
        assert_eq!(h.key(), "e4 e5 Nf3");
        assert_eq!(h.prior_moves(ChessPiece::PAWN), 2);
        assert_eq!(h.prior_moves(ChessPiece::KNIGHT), 1);
        assert_eq!(h.prior_moves(ChessPiece::BISHOP), 0);
        h.clear();
        assert!(h.is_empty());
    }

    #[test]
    fn replay_from_start() {
        let (board, h) =
            MoveHistory::replay(&Board::startpos(), &["1.", "e4", "e5", "2.", "Nf3+"]).unwrap();
        assert_eq!(h.key(), "e4 e5 Nf3");
        assert_eq!(h.entries()[1].color, ChessColor::BLACK);
        assert_eq!(board.get(Square::f3), Some(crate::model::ChessMan::WHITE_KNIGHT));

        assert_eq!(
            MoveHistory::replay(&Board::startpos(), &["e4", "e4"]),
            Err(NotationError::UnplayableMove("e4".to_owned()))
        );
    }
}
