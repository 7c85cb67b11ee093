use std::collections::HashMap;

use super::count_table::CountTable;
use super::lexicon::{ContextLexicon, Lexicon};
use super::probability::NGram;
use super::splitter::Splitter;
use crate::error::{Error, Result};

/// Accumulates the unit counts of a [`Lexicon`].
///
/// # Responsibilities
/// - Split each text chunk with the configured splitter
/// - Count every resulting unit
/// - Produce immutable lexicon snapshots
///
/// Not meant for concurrent mutation: parallel ingestion uses one builder
/// per worker and [`merge`](Self::merge)s them.
#[derive(Clone, Debug)]
pub struct LexiconBuilder<S> {
	splitter: S,
	table: CountTable,
}

impl<S: Splitter> LexiconBuilder<S> {
	/// Creates an empty builder counting the units produced by `splitter`.
	pub fn new(splitter: S) -> Self {
		Self { splitter, table: CountTable::default() }
	}

	/// Acquires information from `text`.
	pub fn add(&mut self, text: &str) {
		for unit in self.splitter.split(text) {
			self.table.observe(&unit);
		}
	}

	/// Number of units observed so far.
	pub fn total(&self) -> usize {
		self.table.total()
	}

	/// Returns the lexicon accumulated so far. Counts are not reset.
	pub fn lexicon(&self) -> Lexicon {
		self.table.lexicon()
	}

	/// Merges another builder into this one.
	pub fn merge(&mut self, other: &Self) {
		self.table.merge(&other.table);
	}
}

/// Accumulates a [`Lexicon`] and a [`ContextLexicon`] from the same text.
///
/// Each text chunk is split once. Every unit is counted unconditionally,
/// and a window of `n + 1` consecutive units slides over the sequence: the
/// leading `n` units are the context, the trailing unit is recorded in the
/// count table of that context (created on first observation).
///
/// # Notes
/// - A chunk shorter than `n + 1` units adds no context observation, but
///   still counts toward the lexicon.
/// - Chunks are split independently, so contexts never span chunk edges.
#[derive(Clone, Debug)]
pub struct ContextLexiconBuilder<S> {
	/// The number of preceding units used as context (`n >= 1`)
	n: usize,
	splitter: S,
	table: CountTable,
	contexts: HashMap<NGram, CountTable>,
}

impl<S: Splitter> ContextLexiconBuilder<S> {
	/// Creates a builder using the `n` preceding units as context.
	///
	/// # Errors
	/// Returns an error if `n < 1`.
	pub fn new(splitter: S, n: usize) -> Result<Self> {
		if n < 1 {
			return Err(Error::invalid_argument("n", "context length must be >= 1"));
		}
		Ok(Self { n, splitter, table: CountTable::default(), contexts: HashMap::new() })
	}

	/// Acquires information from `text`.
	pub fn add(&mut self, text: &str) {
		let sequence = self.splitter.split(text);
		for unit in &sequence {
			self.table.observe(unit);
		}

		for window in sequence.windows(self.n + 1) {
			let (context, next) = window.split_at(self.n);
			self.contexts.entry(context.to_vec()).or_default().observe(&next[0]);
		}
	}

	pub fn n(&self) -> usize {
		self.n
	}

	/// Number of units observed so far.
	pub fn total(&self) -> usize {
		self.table.total()
	}

	/// Returns the unconditional lexicon accumulated so far.
	pub fn lexicon(&self) -> Lexicon {
		self.table.lexicon()
	}

	/// Returns the context lexicon accumulated so far.
	pub fn context_lexicon(&self) -> ContextLexicon {
		// Every key comes from a window of n + 1 units.
		ContextLexicon::from_parts(
			self.n,
			self.contexts.iter().map(|(context, table)| (context.clone(), table.lexicon())).collect(),
		)
	}

	/// Merges another builder into this one.
	///
	/// # Errors
	/// Returns an error if the context lengths differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.n != other.n {
			return Err(Error::ContextLengthMismatch { expected: self.n, found: other.n });
		}

		self.table.merge(&other.table);
		for (context, table) in &other.contexts {
			match self.contexts.get_mut(context) {
				Some(existing) => existing.merge(table),
				None => {
					self.contexts.insert(context.clone(), table.clone());
				}
			}
		}

		Ok(())
	}
}
