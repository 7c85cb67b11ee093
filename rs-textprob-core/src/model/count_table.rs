use std::collections::HashMap;

use super::lexicon::Lexicon;
use super::probability::Unit;

/// Occurrence counts of linguistic units.
///
/// A `CountTable` is the mutable accumulator behind every builder: the
/// unconditional counts of a [`LexiconBuilder`](super::builder::LexiconBuilder)
/// and the per-context counts of a
/// [`ContextLexiconBuilder`](super::builder::ContextLexiconBuilder).
///
/// ## Responsibilities:
/// - Accumulate unit occurrences during ingestion
/// - Produce immutable [`Lexicon`] snapshots
/// - Merge with another table (parallel ingestion support)
///
/// ## Invariants
/// - `total` is the sum of all occurrence counts
/// - Each occurrence count is strictly positive
#[derive(Clone, Debug, Default)]
pub(crate) struct CountTable {
	/// Example: { "e" => 42, "a" => 3 }
	counts: HashMap<Unit, usize>,
	total: usize,
}

impl CountTable {
	/// Records one occurrence of `unit`.
	pub fn observe(&mut self, unit: &str) {
		match self.counts.get_mut(unit) {
			Some(count) => *count += 1,
			None => {
				self.counts.insert(unit.to_owned(), 1);
			}
		}
		self.total += 1;
	}

	pub fn total(&self) -> usize {
		self.total
	}

	/// Returns an immutable snapshot of the counts.
	///
	/// The table keeps its counts and can go on observing.
	pub fn lexicon(&self) -> Lexicon {
		Lexicon::from_counts(self.counts.clone())
	}

	/// Merges another table into this one. Occurrence counts are summed.
	pub fn merge(&mut self, other: &Self) {
		for (unit, occurrence) in &other.counts {
			*self.counts.entry(unit.clone()).or_insert(0) += *occurrence;
		}
		self.total += other.total;
	}
}
