use std::collections::BTreeMap;

use log::{debug, warn};

use super::collapser::TextEstimator;
use super::language_model::LanguageModel;
use super::probability::{Probability, or_default};
use crate::config::ClassifierConfig;
use crate::error::{Error, Result};

/// A candidate language: its prior weight and its text probability.
struct Candidate {
	prior: f64,
	estimator: Box<dyn TextEstimator>,
}

/// Language classifier with priors.
///
/// # Responsibilities
/// - Hold one text estimator and one prior weight per candidate language
/// - Score a text as `prior * P(text | language)`, an undefined probability
///   counting as 0
/// - Normalize the scores into a posterior distribution
///
/// # Invariants
/// - There is at least one candidate
/// - Priors are finite and non-negative
pub struct Classifier {
	candidates: BTreeMap<String, Candidate>,
}

impl Classifier {
	/// Creates a classifier from `(language code, prior, estimator)` triples.
	///
	/// # Errors
	/// Returns an error if there is no candidate or a prior is invalid.
	pub fn new<I>(candidates: I) -> Result<Self>
	where
		I: IntoIterator<Item = (String, f64, Box<dyn TextEstimator>)>,
	{
		let mut map = BTreeMap::new();
		for (code, prior, estimator) in candidates {
			if !prior.is_finite() || prior < 0.0 {
				return Err(Error::invalid_argument("priors", format!("invalid prior {prior} for '{code}'")));
			}
			map.insert(code, Candidate { prior, estimator });
		}
		if map.is_empty() {
			return Err(Error::invalid_argument("priors", "no candidate language"));
		}
		Ok(Self { candidates: map })
	}

	/// Loads the language model of every language in `config.priors`.
	///
	/// # Errors
	/// Fails on the first language whose data is missing or malformed.
	pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
		let mut candidates = Vec::new();
		for (code, prior) in config.priors() {
			let model = LanguageModel::load(&config.data_dir, code, &config.model, config.cache_binary)?;
			candidates.push((code.to_owned(), prior, Box::new(model) as Box<dyn TextEstimator>));
		}
		debug!("Loaded {} languages from {}", candidates.len(), config.data_dir.display());
		Self::new(candidates)
	}

	/// Returns the candidate language codes.
	pub fn languages(&self) -> impl Iterator<Item = &str> {
		self.candidates.keys().map(String::as_str)
	}

	/// Returns the posterior probability of every candidate language for `text`.
	///
	/// The posteriors sum to 1. If every score is zero (all probabilities
	/// undefined or all priors zero), the distribution is uniform.
	pub fn classify(&self, text: &str) -> BTreeMap<String, Probability> {
		let scores = self
			.candidates
			.iter()
			.map(|(code, candidate)| {
				(code.clone(), candidate.prior * or_default(candidate.estimator.probability(text), 0.0))
			})
			.collect();
		normalize(scores)
	}

	/// Returns the most probable language for `text` with its posterior.
	///
	/// Ties go to the smallest language code.
	pub fn most_likely(&self, text: &str) -> Option<(String, Probability)> {
		self.classify(text)
			.into_iter()
			.fold(None, |best: Option<(String, Probability)>, (code, p)| match best {
				Some((_, best_p)) if best_p >= p => best,
				_ => Some((code, p)),
			})
	}
}

/// Normalizes scores into a distribution.
///
/// - If the total is > 0, probabilities are proportional to the scores.
/// - If the total is 0, distributes uniform probabilities.
fn normalize(scores: BTreeMap<String, f64>) -> BTreeMap<String, Probability> {
	let sum: f64 = scores.values().sum();

	if sum > 0.0 {
		return scores.into_iter().map(|(code, score)| (code, score / sum)).collect();
	}

	warn!("No language can explain the text, falling back to a uniform distribution");
	let uniform = 1.0 / scores.len() as f64;
	scores.into_keys().map(|code| (code, uniform)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::probability::assert_close;

	/// Gives every text the same probability.
	struct Flat(Option<Probability>);

	impl TextEstimator for Flat {
		fn probability(&self, _text: &str) -> Option<Probability> {
			self.0
		}
	}

	fn classifier(entries: &[(&str, f64, Option<Probability>)]) -> Result<Classifier> {
		Classifier::new(
			entries
				.iter()
				.map(|(code, prior, p)| (code.to_string(), *prior, Box::new(Flat(*p)) as Box<dyn TextEstimator>)),
		)
	}

	#[test]
	fn posterior_follows_priors() {
		let classifier = classifier(&[("en", 2.0, Some(0.01)), ("fr", 1.0, Some(0.01))]).unwrap();
		let posterior = classifier.classify("anything");
		assert_close(posterior["en"], 2.0 / 3.0);
		assert_close(posterior["fr"], 1.0 / 3.0);
	}

	#[test]
	fn undefined_everywhere_is_uniform() {
		let classifier = classifier(&[("en", 2.0, None), ("fr", 1.0, None)]).unwrap();
		let posterior = classifier.classify("anything");
		assert_close(posterior["en"], 0.5);
		assert_close(posterior["fr"], 0.5);
	}

	#[test]
	fn zero_priors_are_uniform() {
		let classifier = classifier(&[("en", 0.0, Some(0.2)), ("fr", 0.0, Some(0.1)), ("de", 0.0, None)]).unwrap();
		for p in classifier.classify("x").values() {
			assert_close(*p, 1.0 / 3.0);
		}
	}

	#[test]
	fn undefined_counts_as_zero() {
		let classifier = classifier(&[("en", 1.0, Some(0.3)), ("fr", 5.0, None)]).unwrap();
		let posterior = classifier.classify("x");
		assert_close(posterior["en"], 1.0);
		assert_close(posterior["fr"], 0.0);
		assert_eq!(classifier.most_likely("x").map(|(code, _)| code), Some("en".to_owned()));
	}

	#[test]
	fn rejects_bad_construction() {
		assert!(classifier(&[]).is_err());
		assert!(classifier(&[("en", -1.0, None)]).is_err());
		assert!(classifier(&[("en", f64::INFINITY, None)]).is_err());
	}

	#[test]
	fn ties_go_to_first_code() {
		let classifier = classifier(&[("fr", 1.0, Some(0.5)), ("de", 1.0, Some(0.5))]).unwrap();
		assert_eq!(classifier.most_likely("x").map(|(code, _)| code), Some("de".to_owned()));
		assert_eq!(classifier.languages().collect::<Vec<_>>(), vec!["de", "fr"]);
	}
}
