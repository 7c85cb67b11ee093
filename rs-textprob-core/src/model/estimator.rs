//! Sequential conditional probability estimators.
//!
//! An [`Estimator`] maps a sequence of units to one optional probability per
//! position. `None` means the probability is undefined at that position,
//! which is distinct from a probability of zero.
//!
//! Estimators compose: a [`CompoundEstimator`] is built from three other
//! estimators, any of which may itself be compound.

use std::sync::Arc;

use super::collapser::Collapser;
use super::lexicon::{ContextLexicon, Lexicon};
use super::probability::{Probability, Unit};
use super::splitter::Splitter;

/// Per-unit conditional probability function.
///
/// Implementations are pure: evaluating the same sequence twice yields the
/// same result, and evaluation may happen from several threads at once.
pub trait Estimator: Send + Sync {
	/// Returns one optional probability per unit of `sequence`.
	fn evaluate(&self, sequence: &[Unit]) -> Vec<Option<Probability>>;
}

impl<E: Estimator + ?Sized> Estimator for Box<E> {
	fn evaluate(&self, sequence: &[Unit]) -> Vec<Option<Probability>> {
		(**self).evaluate(sequence)
	}
}

impl<E: Estimator + ?Sized> Estimator for Arc<E> {
	fn evaluate(&self, sequence: &[Unit]) -> Vec<Option<Probability>> {
		(**self).evaluate(sequence)
	}
}

/// Assigns the same probability to every position.
#[derive(Clone, Copy, Debug)]
pub struct ConstantEstimator(pub Probability);

impl Estimator for ConstantEstimator {
	fn evaluate(&self, sequence: &[Unit]) -> Vec<Option<Probability>> {
		vec![Some(self.0); sequence.len()]
	}
}

/// Context-free estimator backed by a [`Lexicon`].
///
/// Each unit gets its lexicon probability, or `None` if it was never observed.
#[derive(Clone, Debug)]
pub struct StatelessEstimator {
	lexicon: Arc<Lexicon>,
}

impl StatelessEstimator {
	pub fn new(lexicon: Arc<Lexicon>) -> Self {
		Self { lexicon }
	}
}

impl Estimator for StatelessEstimator {
	fn evaluate(&self, sequence: &[Unit]) -> Vec<Option<Probability>> {
		sequence.iter().map(|unit| self.lexicon.get(unit)).collect()
	}
}

/// Fixed-order Markov estimator backed by a [`ContextLexicon`].
///
/// With `k` the context length, the first `k` positions are always
/// undefined. Position `i >= k` is looked up in the lexicon following the
/// `k` preceding units, and is undefined if that context was never observed
/// or never followed by the unit. No smoothing happens here: unseen units are
/// left to a [`CompoundEstimator`].
#[derive(Clone, Debug)]
pub struct MarkovEstimator {
	context_lexicon: Arc<ContextLexicon>,
}

impl MarkovEstimator {
	pub fn new(context_lexicon: Arc<ContextLexicon>) -> Self {
		Self { context_lexicon }
	}
}

impl Estimator for MarkovEstimator {
	fn evaluate(&self, sequence: &[Unit]) -> Vec<Option<Probability>> {
		let k = self.context_lexicon.order();
		let mut result = vec![None; sequence.len().min(k)];

		for window in sequence.windows(k + 1) {
			let (context, unit) = window.split_at(k);
			result.push(
				self.context_lexicon
					.get(context)
					.and_then(|lexicon| lexicon.get(&unit[0])),
			);
		}

		result
	}
}

/// Back-off combinator.
///
/// At each position, with `p1` the primary estimate and `p3` the mixing
/// weight (the probability mass of "known unit" outcomes):
/// - `p3` undefined → undefined
/// - `p1` defined → `p1 * p3`
/// - `p1` undefined → `p2 * (1 - p3)`, where `p2` is obtained by splitting
///   the unit into finer units and collapsing the fallback estimator over them
///
/// The fallback is only evaluated at positions where the primary estimator
/// is undefined.
pub struct CompoundEstimator {
	primary: Box<dyn Estimator>,
	fallback: Collapser,
	weight: Box<dyn Estimator>,
}

impl CompoundEstimator {
	/// # Parameters
	/// - `primary`: the estimator used whenever it is defined
	/// - `fallback`: the estimator over finer units, for units unseen by `primary`
	/// - `weight`: the probability mass reserved for units known to `primary`
	/// - `splitter`: splits a unit into the finer units read by `fallback`
	pub fn new<P, F, W, S>(primary: P, fallback: F, weight: W, splitter: S) -> Self
	where
		P: Estimator + 'static,
		F: Estimator + 'static,
		W: Estimator + 'static,
		S: Splitter + 'static,
	{
		Self {
			primary: Box::new(primary),
			fallback: Collapser::new(fallback, splitter),
			weight: Box::new(weight),
		}
	}
}

impl Estimator for CompoundEstimator {
	fn evaluate(&self, sequence: &[Unit]) -> Vec<Option<Probability>> {
		let primary = self.primary.evaluate(sequence);
		let weight = self.weight.evaluate(sequence);

		primary
			.into_iter()
			.zip(weight)
			.zip(sequence)
			.map(|((p1, p3), unit)| {
				let p3 = p3?;
				match p1 {
					Some(p1) => Some(p1 * p3),
					None => self.fallback.probability(unit).map(|p2| p2 * (1.0 - p3)),
				}
			})
			.collect()
	}
}
