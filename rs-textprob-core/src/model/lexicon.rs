use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::probability::{NGram, Probability, Unit};
use super::trie::Trie;
use crate::error::{Error, Result};

/// Persisted form of a [`Lexicon`]: the counts and the total number of observations.
pub type SerializedLexicon = (HashMap<Unit, usize>, usize);

/// Immutable table associating linguistic units with probabilities.
///
/// A `Lexicon` is built once from observed counts and never changes
/// afterwards. The probability of a unit is `count / total_observations`.
///
/// # Invariants
/// - `total_observations` equals the sum of all counts
/// - Probabilities of all units sum to 1 when `total_observations > 0`
/// - Looking up an absent unit yields `None`, never zero
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(try_from = "SerializedLexicon", into = "SerializedLexicon")]
pub struct Lexicon {
	counts: HashMap<Unit, usize>,
	probabilities: HashMap<Unit, Probability>,
	total_observations: usize,
}

impl Lexicon {
	/// Creates a lexicon from observed counts.
	///
	/// `total_observations` is taken as the sum of the counts, saturating at
	/// `usize::MAX`. Zero counts are dropped.
	pub fn from_counts(mut counts: HashMap<Unit, usize>) -> Self {
		counts.retain(|_, count| *count > 0);
		let total_observations = counts.values().fold(0usize, |acc, count| acc.saturating_add(*count));
		Self::with_total(counts, total_observations)
	}

	fn with_total(counts: HashMap<Unit, usize>, total_observations: usize) -> Self {
		let probabilities = counts
			.iter()
			.map(|(unit, count)| (unit.clone(), *count as Probability / total_observations as Probability))
			.collect();
		Self { counts, probabilities, total_observations }
	}

	/// Returns the probability of `unit`, or `None` if it was never observed.
	pub fn get(&self, unit: &str) -> Option<Probability> {
		self.probabilities.get(unit).copied()
	}

	/// Returns the probability of `unit`, or `default` if it was never observed.
	pub fn get_or(&self, unit: &str, default: Probability) -> Probability {
		self.get(unit).unwrap_or(default)
	}

	/// Returns how many times `unit` was observed.
	pub fn count(&self, unit: &str) -> usize {
		self.counts.get(unit).copied().unwrap_or(0)
	}

	pub fn total_observations(&self) -> usize {
		self.total_observations
	}

	/// Number of distinct units.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(unit, probability)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, Probability)> {
		self.probabilities.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// Drops units observed fewer than `min_n` times.
	///
	/// The total is recomputed from the remaining counts, so the
	/// probabilities of the summary still sum to 1.
	pub fn summarize(&self, min_n: usize) -> Self {
		Self::from_counts(
			self.counts
				.iter()
				.filter(|(_, count)| **count >= min_n)
				.map(|(unit, count)| (unit.clone(), *count))
				.collect(),
		)
	}
}

impl TryFrom<SerializedLexicon> for Lexicon {
	type Error = Error;

	fn try_from((counts, total_observations): SerializedLexicon) -> Result<Self> {
		if let Some((unit, _)) = counts.iter().find(|(_, count)| **count == 0) {
			return Err(Error::MalformedLexicon(format!("'{unit}' has a count of zero")));
		}
		let Some(sum) = counts.values().try_fold(0usize, |acc, count| acc.checked_add(*count)) else {
			return Err(Error::MalformedLexicon("counts overflow the observation total".to_owned()));
		};
		if sum != total_observations {
			return Err(Error::MalformedLexicon(format!(
				"counts sum to {sum} but {total_observations} observations are recorded"
			)));
		}
		Ok(Self::with_total(counts, total_observations))
	}
}

impl From<Lexicon> for SerializedLexicon {
	fn from(lexicon: Lexicon) -> Self {
		(lexicon.counts, lexicon.total_observations)
	}
}

/// Immutable mapping from a context to the lexicon of what follows it.
///
/// This is a fixed-order conditional model: every context has exactly
/// `order` units. An absent context means "no observations for this
/// context", which is distinct from a present context whose lexicon does
/// not list a given unit.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(try_from = "Trie", into = "Trie")]
pub struct ContextLexicon {
	order: usize,
	lexicons: HashMap<NGram, Lexicon>,
}

impl ContextLexicon {
	/// Creates an empty context lexicon for contexts of `order` units.
	pub fn new(order: usize) -> Self {
		Self { order, lexicons: HashMap::new() }
	}

	/// Creates a context lexicon from `(context, lexicon)` pairs.
	///
	/// # Errors
	/// - Returns [`Error::InvalidArgument`] if `order` is zero.
	/// - Returns [`Error::ContextLengthMismatch`] if a context does not have
	///   `order` units.
	pub fn from_entries<I>(order: usize, entries: I) -> Result<Self>
	where
		I: IntoIterator<Item = (NGram, Lexicon)>,
	{
		if order == 0 {
			return Err(Error::invalid_argument("order", "contexts must hold at least one unit"));
		}
		let mut lexicons = HashMap::new();
		for (context, lexicon) in entries {
			if context.len() != order {
				return Err(Error::ContextLengthMismatch { expected: order, found: context.len() });
			}
			lexicons.insert(context, lexicon);
		}
		Ok(Self { order, lexicons })
	}

	pub(crate) fn from_parts(order: usize, lexicons: HashMap<NGram, Lexicon>) -> Self {
		Self { order, lexicons }
	}

	/// Number of units in every context.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Returns the lexicon following `context`, if that context was observed.
	pub fn get(&self, context: &[Unit]) -> Option<&Lexicon> {
		self.lexicons.get(context)
	}

	pub fn contains(&self, context: &[Unit]) -> bool {
		self.lexicons.contains_key(context)
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.lexicons.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lexicons.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&NGram, &Lexicon)> {
		self.lexicons.iter()
	}

	/// Summarizes every lexicon with [`Lexicon::summarize`] and drops the
	/// contexts left with fewer than `min_n` observations.
	pub fn summarize(&self, min_n: usize) -> Self {
		let lexicons = self
			.lexicons
			.iter()
			.map(|(context, lexicon)| (context.clone(), lexicon.summarize(min_n)))
			.filter(|(_, lexicon)| !lexicon.is_empty() && lexicon.total_observations() >= min_n)
			.collect();
		Self { order: self.order, lexicons }
	}
}

impl IntoIterator for ContextLexicon {
	type Item = (NGram, Lexicon);
	type IntoIter = std::collections::hash_map::IntoIter<NGram, Lexicon>;

	fn into_iter(self) -> Self::IntoIter {
		self.lexicons.into_iter()
	}
}
