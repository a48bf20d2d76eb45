//! # Opening book
//!
//! A table from the moves played so far, space-joined SAN, to the distinct
//! next moves seen after exactly that sequence in the opening datasets,
//! in the order they were first seen.
//!
//! The book is built offline by [`OpeningBookBuilder`] from tab-separated
//! records (`eco`, `name`, `moves`) and stored as a flat TOML table:
//!
//! ```toml
//! "" = ["e4", "d4"]
//! e4 = ["e5", "c5"]
//! "e4 e5" = ["Nf3"]
//! ```
//!
//! At runtime it is loaded once and never mutated.

use std::{fs, path::Path};

use include_flate::flate;
use indexmap::IndexMap;
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{error::BookError, notation::stdalg::canonical_token};

flate!(static EMBEDDED_BOOK: str from "assets/opening_book.toml");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpeningBook {
    lines: IndexMap<String, Vec<String>>,
}

impl OpeningBook {
    /// The book prebuilt from the bundled datasets.
    pub fn embedded() -> Result<Self, BookError> {
        Self::from_toml_str(&EMBEDDED_BOOK)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, BookError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, BookError> {
        Ok(toml::to_string(self)?)
    }

    /// Accepts a flat JSON object of the same shape.
    pub fn from_json_str(s: &str) -> Result<Self, BookError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load an artifact, JSON if the extension says so, TOML otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BookError::Io {
            path: path.to_owned(),
            source,
        })?;
        let book = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            _ => Self::from_toml_str(&text)?,
        };
        info!(path = %path.display(), prefixes = book.len(), "loaded opening book");
        Ok(book)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BookError> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?).map_err(|source| BookError::Io {
            path: path.to_owned(),
            source,
        })
    }

    /// Number of prefixes.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Continuations recorded after exactly `key`, empty when unknown.
    pub fn continuations(&self, key: &str) -> &[String] {
        self.lines.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.lines.keys().map(String::as_str)
    }

    /// Pick one continuation of `history` uniformly at random.
    pub fn lookup<S: AsRef<str>>(&self, history: &[S], rng: &mut impl Rng) -> Option<&str> {
        let key = history.iter().map(AsRef::<str>::as_ref).collect::<Vec<_>>().join(" ");
        let res = self.continuations(&key).choose(rng).map(String::as_str);
        match res {
            Some(mv) => debug!(key, mv, "book hit"),
            None => debug!(key, "book miss"),
        }
        res
    }

    fn record(&mut self, key: String, continuation: &str) {
        let conts = self.lines.entry(key).or_default();
        if !conts.iter().any(|c| c == continuation) {
            conts.push(continuation.to_owned());
        }
    }
}

/// One row of an opening dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningRecord {
    pub eco: String,
    pub name: String,
    /// Canonical SAN, move numbers and annotations removed.
    pub moves: Vec<String>,
}

impl OpeningRecord {
    /// Decode a tab-separated line. Blank lines and the header line give
    /// `Ok(None)`.
    pub fn from_tsv_line(line_no: usize, line: &str) -> Result<Option<Self>, BookError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let mut cols = line.split('\t');
        let (Some(eco), Some(name), Some(pgn)) = (cols.next(), cols.next(), cols.next()) else {
            return Err(BookError::MalformedRecord { line: line_no });
        };
        if eco.trim().eq_ignore_ascii_case("eco") {
            return Ok(None);
        }

        let mut moves = Vec::new();
        for token in pgn.split_whitespace() {
            match canonical_token(token) {
                Ok(Some(mv)) => moves.push(mv),
                Ok(None) => {}
                Err(token) => return Err(BookError::BadMove { line: line_no, token }),
            }
        }

        Ok(Some(Self {
            eco: eco.trim().to_owned(),
            name: name.trim().to_owned(),
            moves,
        }))
    }
}

/// Offline construction of an [`OpeningBook`].
#[derive(Debug, Clone)]
pub struct OpeningBookBuilder {
    book: OpeningBook,
    include_root: bool,
    records: usize,
    skipped: usize,
}

impl Default for OpeningBookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OpeningBookBuilder {
    pub fn new() -> Self {
        Self {
            book: OpeningBook::default(),
            include_root: true,
            records: 0,
            skipped: 0,
        }
    }

    /// Whether first moves are recorded under the empty prefix, so that an
    /// empty history has book moves. On by default.
    pub fn include_root(mut self, yes: bool) -> Self {
        self.include_root = yes;
        self
    }

    /// After each prefix of `record.moves`, the move that follows it.
    pub fn add_record(&mut self, record: &OpeningRecord) {
        let moves = &record.moves;
        if self.include_root
            && let Some(first) = moves.first()
        {
            self.book.record(String::new(), first);
        }
        for i in 1..moves.len() {
            self.book.record(moves[..i].join(" "), &moves[i]);
        }
        self.records += 1;
    }

    /// Add every record of a dataset. Rows that cannot be decoded are
    /// skipped with a warning. Returns the number of records added.
    pub fn add_tsv_str(&mut self, text: &str) -> usize {
        let before = self.records;
        for (ix, line) in text.lines().enumerate() {
            match OpeningRecord::from_tsv_line(ix + 1, line) {
                Ok(Some(record)) => self.add_record(&record),
                Ok(None) => {}
                Err(err) => {
                    warn!(%err, "skipping opening record");
                    self.skipped += 1;
                }
            }
        }
        self.records - before
    }

    pub fn add_tsv_file(&mut self, path: impl AsRef<Path>) -> Result<usize, BookError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BookError::Io {
            path: path.to_owned(),
            source,
        })?;
        let added = self.add_tsv_str(&text);
        debug!(path = %path.display(), added, "read opening dataset");
        Ok(added)
    }

    pub fn build(self) -> OpeningBook {
        info!(
            records = self.records,
            skipped = self.skipped,
            prefixes = self.book.len(),
            "built opening book"
        );
        self.book
    }
}
