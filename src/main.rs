//! Command line front end: the offline opening book builder and a few
//! probes into the engine.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use brainchess::{
    config::Config,
    engine::{AiMoveSelector, MoveHistory, OpeningBook, OpeningBookBuilder},
    game::{
        challenge::{Difficulty, random_position},
        grade_recall, parse_transcription,
    },
    model::{Board, ChessColor, Square, movegen::destinations, moving::apply_move},
    notation::{
        Parsable,
        position::{parse_position, serialize_position},
    },
};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{SeedableRng, rngs::SmallRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Chess engine for memory and prediction training games.
#[derive(Parser)]
#[command(name = "brainchess", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an opening book from tab-separated datasets (eco, name, moves).
    BuildBook {
        /// Where to write the book.
        #[arg(short, long)]
        out: PathBuf,

        /// Leave out the first moves of every line.
        #[arg(long)]
        no_root: bool,

        /// Dataset files, read in order.
        #[arg(required = true)]
        datasets: Vec<PathBuf>,
    },

    /// List the destinations of the chessman on a square.
    Moves {
        /// Position notation; invalid input falls back to the starting position.
        position: String,

        square: String,
    },

    /// Let the engine choose a reply.
    Reply {
        /// Position notation. Defaults to the position after --history.
        #[arg(short, long)]
        position: Option<String>,

        /// Side to move. Defaults to whoever is to move after --history.
        #[arg(short, long, value_enum)]
        side: Option<Side>,

        /// Moves played so far, e.g. "e4 e5 Nf3".
        #[arg(long, default_value = "")]
        history: String,

        /// Random seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,

        /// Opening book artifact (TOML, or JSON by extension). Defaults to the bundled book.
        #[arg(short, long)]
        book: Option<PathBuf>,

        /// Configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Grade a recalled move list against the moves played.
    Grade {
        /// Comma-separated moves actually played.
        #[arg(short, long)]
        expected: String,

        /// Comma-separated moves as recalled.
        #[arg(short, long)]
        submitted: String,
    },

    /// Print a random position to memorize.
    Challenge {
        #[arg(short, long, value_enum, default_value = "medium")]
        difficulty: Level,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for ChessColor {
    fn from(value: Side) -> Self {
        match value {
            Side::White => ChessColor::WHITE,
            Side::Black => ChessColor::BLACK,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(value: Level) -> Self {
        match value {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
        }
    }
}

fn rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::BuildBook {
            out,
            no_root,
            datasets,
        } => {
            let mut builder = OpeningBookBuilder::new().include_root(!no_root);
            for path in &datasets {
                builder.add_tsv_file(path)?;
            }
            let book = builder.build();
            book.save(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            info!(prefixes = book.len(), out = %out.display(), "wrote opening book");
        }

        Commands::Moves { position, square } => {
            let parsed = parse_position(&position);
            if let Some(err) = &parsed.fallback {
                eprintln!("using the starting position: {err}");
            }
            let Some(sq) = Square::parse_str(&square) else {
                bail!("{square:?} is not a square");
            };
            let Some(cm) = parsed.board.get(sq) else {
                bail!("there is no chessman on {sq}");
            };
            let dests = destinations(&parsed.board, sq, cm.col());
            let dests: Vec<String> = dests.iter().map(ToString::to_string).collect();
            println!("{}", dests.join(" "));
        }

        Commands::Reply {
            position,
            side,
            history,
            seed,
            book,
            config,
        } => {
            let config = match config {
                Some(path) => Config::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => Config::default(),
            };
            let book = match book {
                Some(path) => OpeningBook::load(&path)?,
                None => OpeningBook::embedded().context("decoding the bundled opening book")?,
            };

            let tokens: Vec<&str> = history.split_whitespace().collect();
            let (replayed, history) = MoveHistory::replay(&Board::startpos(), tokens.as_slice())?;
            let board = match position {
                Some(position) => {
                    let parsed = parse_position(&position);
                    if let Some(err) = &parsed.fallback {
                        eprintln!("using the starting position: {err}");
                    }
                    parsed.board
                }
                None => replayed,
            };
            let side = match side {
                Some(side) => side.into(),
                None if history.len() % 2 == 0 => ChessColor::WHITE,
                None => ChessColor::BLACK,
            };

            let selector = AiMoveSelector::with_config(Arc::new(book), &config.engine);
            let chosen = selector.select(&board, side, &history, &mut rng(seed))?;
            let after = apply_move(&board, chosen.mv);
            println!("{} ({:?})", chosen.notation, chosen.source);
            println!("{}", serialize_position(&after));
        }

        Commands::Grade {
            expected,
            submitted,
        } => {
            let expected = parse_transcription(&expected);
            let grade = grade_recall(expected.as_slice(), &submitted);
            println!(
                "{}/{} correct, {}% accuracy, {} points",
                grade.correct, grade.total, grade.accuracy, grade.points
            );
        }

        Commands::Challenge { difficulty, seed } => {
            let board = random_position(difficulty.into(), &mut rng(seed));
            println!("{}", serialize_position(&board));
        }
    }

    Ok(())
}
