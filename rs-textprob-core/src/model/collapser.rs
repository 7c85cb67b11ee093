use super::estimator::Estimator;
use super::probability::{Probability, safe_mul};
use super::splitter::Splitter;

/// Probability of a whole string.
pub trait TextEstimator: Send + Sync {
	/// Returns the probability of `text`, or `None` if it is undefined.
	fn probability(&self, text: &str) -> Option<Probability>;
}

/// Reduces the per-unit probabilities of a string to a single scalar.
///
/// The string is split, the estimator runs over the units, and the
/// resulting probabilities are multiplied together.
///
/// # Notes
/// - One undefined unit makes the whole string undefined.
/// - A string with no unit has probability 1.
pub struct Collapser {
	estimator: Box<dyn Estimator>,
	splitter: Box<dyn Splitter>,
}

impl Collapser {
	pub fn new<E, S>(estimator: E, splitter: S) -> Self
	where
		E: Estimator + 'static,
		S: Splitter + 'static,
	{
		Self { estimator: Box::new(estimator), splitter: Box::new(splitter) }
	}

	/// Returns the collapsed probability of `text`.
	pub fn probability(&self, text: &str) -> Option<Probability> {
		let sequence = self.splitter.split(text);
		self.estimator
			.evaluate(&sequence)
			.into_iter()
			.fold(Some(1.0), safe_mul)
	}
}

impl TextEstimator for Collapser {
	fn probability(&self, text: &str) -> Option<Probability> {
		Collapser::probability(self, text)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;
	use std::sync::Arc;

	use super::*;
	use crate::model::estimator::{ConstantEstimator, StatelessEstimator};
	use crate::model::lexicon::Lexicon;
	use crate::model::probability::assert_close;
	use crate::model::splitter::{Characters, LatinTokens};

	fn stateless(pairs: &[(&str, usize)]) -> StatelessEstimator {
		let counts: HashMap<_, _> = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
		StatelessEstimator::new(Arc::new(Lexicon::from_counts(counts)))
	}

	#[test]
	fn empty_sequence_is_certain() {
		assert_eq!(Collapser::new(ConstantEstimator(0.3), Characters).probability(""), Some(1.0));
		assert_eq!(Collapser::new(stateless(&[]), LatinTokens).probability("   "), Some(1.0));
	}

	#[test]
	fn multiplies_unit_probabilities() {
		let collapser = Collapser::new(stateless(&[("a", 3), ("b", 1)]), Characters);
		assert_close(collapser.probability("aab").unwrap(), 0.75 * 0.75 * 0.25);
	}

	#[test]
	fn undefined_unit_poisons_string() {
		let collapser = Collapser::new(stateless(&[("a", 3), ("b", 1)]), Characters);
		assert_eq!(collapser.probability("abz"), None);
	}

	#[test]
	fn zero_is_not_undefined() {
		let collapser = Collapser::new(ConstantEstimator(0.0), Characters);
		assert_eq!(collapser.probability("ab"), Some(0.0));
	}
}
