//! # AI move selection
//!
//! While the game is young the reply comes from the opening book, as long
//! as the book has a continuation the engine can actually play. Otherwise
//! every pseudo-legal move is scored by the [`Heuristic`], and the reply
//! is drawn uniformly from the best few.

use std::sync::Arc;

use rand::{Rng, seq::IndexedRandom};
use tracing::{debug, trace, warn};

use crate::{
    config::EngineConfig,
    engine::{book::OpeningBook, eval::Heuristic, history::MoveHistory},
    error::NoLegalMoves,
    model::{Board, ChessColor, ChessMove, movegen::generate_all_moves},
    notation::stdalg::san,
};

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Book,
    Heuristic,
}

/// A reply chosen by the [`AiMoveSelector`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenMove {
    pub mv: ChessMove,
    /// SAN of the move against the board it is played on.
    pub notation: String,
    pub source: MoveSource,
    /// Heuristic score, absent for book moves.
    pub score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AiMoveSelector {
    book: Arc<OpeningBook>,
    heuristic: Heuristic,
    book_ply_limit: usize,
    top_k: usize,
}

impl AiMoveSelector {
    pub fn new(book: Arc<OpeningBook>) -> Self {
        Self::with_config(book, &EngineConfig::default())
    }

    pub fn with_config(book: Arc<OpeningBook>, config: &EngineConfig) -> Self {
        Self {
            book,
            heuristic: Heuristic::from_config(config),
            book_ply_limit: config.book_ply_limit,
            top_k: config.top_k.max(1),
        }
    }

    pub fn book(&self) -> &OpeningBook {
        &self.book
    }

    pub fn heuristic(&self) -> &Heuristic {
        &self.heuristic
    }

    /// Choose the reply of `side`. The ply count is the length of
    /// `history`.
    pub fn select(
        &self,
        board: &Board,
        side: ChessColor,
        history: &MoveHistory,
        rng: &mut impl Rng,
    ) -> Result<ChosenMove, NoLegalMoves> {
        if history.len() < self.book_ply_limit
            && let Some(chosen) = self.book_move(board, side, history, rng)
        {
            return Ok(chosen);
        }

        let moves = generate_all_moves(board, side);
        let Some(&first) = moves.first() else {
            debug!(?side, "no legal moves");
            return Err(NoLegalMoves(side));
        };

        let ranked = self.rank_moves(board, &moves, history);
        let pool = &ranked[..self.top_k.min(ranked.len())];
        let (mv, score) = match pool.choose(rng) {
            Some(&(mv, score)) => (mv, Some(score)),
            None => (first, None),
        };

        let notation = san(board, mv);
        debug!(%notation, ?score, "heuristic move");
        Ok(ChosenMove {
            mv,
            notation,
            source: MoveSource::Heuristic,
            score,
        })
    }

    /// A continuation of `history` drawn uniformly from the book, provided
    /// `side` can play it on `board`. A continuation the engine cannot play
    /// gives `None`, as does a book miss.
    pub fn book_move(
        &self,
        board: &Board,
        side: ChessColor,
        history: &MoveHistory,
        rng: &mut impl Rng,
    ) -> Option<ChosenMove> {
        let played: Vec<&str> = history.notations().collect();
        let pick = self.book.lookup(played.as_slice(), rng)?;

        let Some(mv) = generate_all_moves(board, side)
            .into_iter()
            .find(|&mv| san(board, mv) == pick)
        else {
            debug!(pick, "book move is not playable");
            return None;
        };

        Some(ChosenMove {
            mv,
            notation: pick.to_owned(),
            source: MoveSource::Book,
            score: None,
        })
    }

    /// Every pseudo-legal move of `side` with its score, best first.
    /// Moves with a non-finite score are dropped.
    pub fn rank(
        &self,
        board: &Board,
        side: ChessColor,
        history: &MoveHistory,
    ) -> Vec<(ChessMove, f64)> {
        self.rank_moves(board, &generate_all_moves(board, side), history)
    }

    fn rank_moves(
        &self,
        board: &Board,
        moves: &[ChessMove],
        history: &MoveHistory,
    ) -> Vec<(ChessMove, f64)> {
        let mut ranked: Vec<(ChessMove, f64)> = moves
            .iter()
            .map(|&mv| (mv, self.heuristic.score_move(board, mv, history)))
            .filter(|&(mv, score)| {
                let finite = score.is_finite();
                if !finite {
                    warn!(?mv, score, "dropping move with non-finite score");
                }
                finite
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        trace!(candidates = ranked.len(), best = ?ranked.first(), "ranked moves");
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ChessPiece, Square},
        notation::position::try_parse_position,
    };
    use rand::{SeedableRng, rngs::SmallRng};

    fn rng() -> SmallRng {
        SmallRng::from_seed(*b"3.141592653589793238462643383279")
    }

    fn small_book() -> Arc<OpeningBook> {
        Arc::new(OpeningBook::from_toml_str("\"\" = [\"e4\", \"O-O\"]\ne4 = [\"c5\"]\n").unwrap())
    }

    #[test]
    fn book_reply_at_start() {
        let sel = AiMoveSelector::new(small_book());
        let mut rng = rng();
        let mut from_book = 0;
        for _ in 0..32 {
            let chosen = sel
                .select(&Board::startpos(), ChessColor::WHITE, &MoveHistory::new(), &mut rng)
                .unwrap();
            if chosen.source == MoveSource::Book {
                assert_eq!(chosen.notation, "e4");
                assert_eq!(chosen.mv, ChessMove::new(ChessPiece::PAWN, Square::e2, Square::e4));
                from_book += 1;
            }
        }
        // drawing "O-O", which cannot be played, falls through to the heuristic
        assert!(from_book > 0 && from_book < 32, "{from_book}");
    }

    #[test]
    fn unplayable_book_move_is_skipped() {
        let book = Arc::new(OpeningBook::from_toml_str("\"\" = [\"O-O\"]\n").unwrap());
        let sel = AiMoveSelector::new(book);
        let h = MoveHistory::new();
        assert_eq!(sel.book_move(&Board::startpos(), ChessColor::WHITE, &h, &mut rng()), None);
        let chosen = sel.select(&Board::startpos(), ChessColor::WHITE, &h, &mut rng()).unwrap();
        assert_eq!(chosen.source, MoveSource::Heuristic);
    }

    #[test]
    fn book_is_ignored_past_the_ply_limit() {
        let config = EngineConfig {
            book_ply_limit: 0,
            ..EngineConfig::default()
        };
        let sel = AiMoveSelector::with_config(small_book(), &config);
        let chosen = sel
            .select(&Board::startpos(), ChessColor::WHITE, &MoveHistory::new(), &mut rng())
            .unwrap();
        assert_eq!(chosen.source, MoveSource::Heuristic);
    }

    #[test]
    fn heuristic_picks_from_top_three() {
        let sel = AiMoveSelector::new(Arc::new(OpeningBook::default()));
        let b = Board::startpos();
        let h = MoveHistory::new();
        let ranked = sel.rank(&b, ChessColor::WHITE, &h);
        assert_eq!(ranked.len(), 20);
        let top: Vec<ChessMove> = ranked[..3].iter().map(|r| r.0).collect();
        let mut rng = rng();
        for _ in 0..32 {
            let chosen = sel.select(&b, ChessColor::WHITE, &h, &mut rng).unwrap();
            assert!(top.contains(&chosen.mv));
            assert_eq!(chosen.source, MoveSource::Heuristic);
        }
    }

    #[test]
    fn captures_are_preferred() {
        let config = EngineConfig {
            top_k: 1,
            ..EngineConfig::default()
        };
        let sel = AiMoveSelector::with_config(Arc::new(OpeningBook::default()), &config);
        let b = try_parse_position("3qk3/8/8/8/3R4/8/8/4K3").unwrap();
        let chosen = sel.select(&b, ChessColor::WHITE, &MoveHistory::new(), &mut rng()).unwrap();
        assert_eq!(chosen.notation, "Rxd8");
    }

    #[test]
    fn no_legal_moves() {
        let sel = AiMoveSelector::new(small_book());
        // the black king is boxed in by its own pawns
        let b = try_parse_position("K7/8/8/8/8/8/pp6/kp6").unwrap();
        assert_eq!(
            sel.select(&b, ChessColor::BLACK, &MoveHistory::new(), &mut rng()),
            Err(NoLegalMoves(ChessColor::BLACK))
        );
    }
}
