//! Default estimator stacks over [`LanguageData`].
//!
//! The Markov stack, from coarsest to finest:
//!
//! ```text
//! token Markov chain ─┬─ token lexicon
//!                     └─ (unseen token) character Markov chain ─┬─ character lexicon
//!                                                               └─ (unseen character) certainty
//! ```
//!
//! Every arrow is a [`CompoundEstimator`]. Weights of the form
//! `1 - 1 / total` give each unseen unit the mass of a single observation.

use std::path::Path;

use log::debug;

use super::collapser::{Collapser, TextEstimator};
use super::estimator::{CompoundEstimator, ConstantEstimator, MarkovEstimator, StatelessEstimator};
use super::language_data::LanguageData;
use super::probability::Probability;
use super::splitter::{Characters, LatinTokens};
use crate::config::{ModelConfig, ModelKind};
use crate::error::Result;

/// Probability mass left to units seen among `total` observations.
///
/// An empty lexicon knows nothing, so all the mass goes to the fallback.
fn known_mass(total: usize) -> Probability {
	if total == 0 { 0.0 } else { 1.0 - 1.0 / total as Probability }
}

/// Probability of text under a single language.
///
/// Built once from the language data, then evaluated many times. Evaluation
/// is read-only and may happen from several threads at once.
pub struct LanguageModel {
	code: String,
	collapser: Collapser,
}

impl LanguageModel {
	/// Loads the data of `code` from `folder` and builds the stack selected by `config`.
	///
	/// # Errors
	/// Returns an error if the language data is missing or malformed.
	pub fn load<P: AsRef<Path>>(folder: P, code: &str, config: &ModelConfig, cache_binary: bool) -> Result<Self> {
		let data = LanguageData::load(folder, code, cache_binary)?;
		Ok(Self::new(code, &data, config))
	}

	pub fn new(code: &str, data: &LanguageData, config: &ModelConfig) -> Self {
		debug!("Building {:?} model for '{code}'", config.kind);
		let collapser = match config.kind {
			ModelKind::Markov => markov(data, config),
			ModelKind::Stateless => stateless(data),
		};
		Self { code: code.to_owned(), collapser }
	}

	/// Language code of this model.
	pub fn code(&self) -> &str {
		&self.code
	}
}

impl TextEstimator for LanguageModel {
	fn probability(&self, text: &str) -> Option<Probability> {
		self.collapser.probability(text)
	}
}

/// Token lexicon, backing off to the character lexicon for unseen tokens.
pub fn stateless(data: &LanguageData) -> Collapser {
	Collapser::new(
		CompoundEstimator::new(
			StatelessEstimator::new(data.token_lexicon.clone()),
			StatelessEstimator::new(data.char_lexicon.clone()),
			ConstantEstimator(known_mass(data.token_lexicon.total_observations())),
			Characters,
		),
		LatinTokens,
	)
}

/// Token Markov chain with token and character back-offs.
pub fn markov(data: &LanguageData, config: &ModelConfig) -> Collapser {
	let tokens = CompoundEstimator::new(
		MarkovEstimator::new(data.token_context_lexicon.clone()),
		StatelessEstimator::new(data.token_lexicon.clone()),
		ConstantEstimator(config.token_context_weight()),
		LatinTokens,
	);
	let char_lexicon = CompoundEstimator::new(
		StatelessEstimator::new(data.char_lexicon.clone()),
		ConstantEstimator(1.0),
		ConstantEstimator(known_mass(data.char_lexicon.total_observations())),
		Characters,
	);
	let chars = CompoundEstimator::new(
		MarkovEstimator::new(data.char_context_lexicon.clone()),
		char_lexicon,
		ConstantEstimator(config.char_context_weight()),
		LatinTokens,
	);

	Collapser::new(
		CompoundEstimator::new(
			tokens,
			chars,
			ConstantEstimator(known_mass(data.token_lexicon.total_observations())),
			Characters,
		),
		LatinTokens,
	)
}
