use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io;

/// Parameters for building language data from a corpus.
///
/// # Fields
/// - `token_n`: number of preceding tokens used as context
/// - `char_n`: number of preceding characters used as context
/// - `max_tokens`: stop ingesting once this many tokens were observed
/// - `min_count`: if set, the finished data is summarized with this threshold
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BuildConfig {
	pub token_n: usize,
	pub char_n: usize,
	pub max_tokens: Option<usize>,
	pub min_count: Option<usize>,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self { token_n: 1, char_n: 2, max_tokens: None, min_count: None }
	}
}

/// Which estimator stack a language model uses.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
	/// Token and character Markov chains backing off to lexicons.
	#[default]
	Markov,
	/// Token lexicon backing off to the character lexicon.
	Stateless,
}

/// Constant mixing weights of the default estimator stacks.
///
/// Each weight is the probability mass given to units known to the Markov
/// estimator; the rest goes to its lexicon fallback. These are fixed
/// hyperparameters, not learned values.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
	pub kind: ModelKind,
	token_context_weight: f64,
	char_context_weight: f64,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self { kind: ModelKind::Markov, token_context_weight: 0.5, char_context_weight: 0.5 }
	}
}

impl ModelConfig {
	pub fn token_context_weight(&self) -> f64 {
		self.token_context_weight
	}

	pub fn char_context_weight(&self) -> f64 {
		self.char_context_weight
	}

	/// Sets the weight of the token Markov chain (0.0..=1.0).
	///
	/// # Errors
	/// Returns an error if the value is outside the valid range.
	pub fn set_token_context_weight(&mut self, weight: f64) -> Result<()> {
		self.token_context_weight = check_weight("token_context_weight", weight)?;
		Ok(())
	}

	/// Sets the weight of the character Markov chain (0.0..=1.0).
	///
	/// # Errors
	/// Returns an error if the value is outside the valid range.
	pub fn set_char_context_weight(&mut self, weight: f64) -> Result<()> {
		self.char_context_weight = check_weight("char_context_weight", weight)?;
		Ok(())
	}

	fn validate(&self) -> Result<()> {
		check_weight("token_context_weight", self.token_context_weight)?;
		check_weight("char_context_weight", self.char_context_weight)?;
		Ok(())
	}
}

fn check_weight(arg: &'static str, weight: f64) -> Result<f64> {
	if !(0.0..=1.0).contains(&weight) {
		return Err(Error::invalid_argument(arg, format!("must be between 0.0 and 1.0, got {weight}")));
	}
	Ok(weight)
}

/// Everything needed to construct a [`Classifier`](crate::model::classifier::Classifier).
///
/// # Invariants
/// - Priors are finite and non-negative (they need not sum to 1)
/// - Model weights are within 0.0..=1.0
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
	/// Directory holding one `<code>.json` file per language.
	pub data_dir: PathBuf,
	/// Language code → prior weight (not normalized).
	priors: BTreeMap<String, f64>,
	pub model: ModelConfig,
	/// Keep a compact `<code>.bin` copy next to each JSON file and prefer it.
	pub cache_binary: bool,
}

impl Default for ClassifierConfig {
	fn default() -> Self {
		Self {
			data_dir: PathBuf::from("./data"),
			priors: Self::default_priors(),
			model: ModelConfig::default(),
			cache_binary: false,
		}
	}
}

impl ClassifierConfig {
	/// Creates a configuration reading language data from `data_dir`.
	///
	/// # Errors
	/// Returns an error if a prior is negative or not finite.
	pub fn new<P: AsRef<Path>>(data_dir: P, priors: BTreeMap<String, f64>) -> Result<Self> {
		let config = Self {
			data_dir: io::normalize_folder(data_dir),
			priors,
			..Self::default()
		};
		config.validate()?;
		Ok(config)
	}

	/// Approximate base rates of the five most common languages on the web.
	pub fn default_priors() -> BTreeMap<String, f64> {
		[("en", 10.58), ("es", 5.47), ("fr", 4.07), ("pt", 3.54), ("de", 1.74)]
			.into_iter()
			.map(|(code, prior)| (code.to_owned(), prior))
			.collect()
	}

	/// Reads a configuration from a JSON file.
	///
	/// Missing fields take their default value.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let mut config: Self = serde_json::from_str(&fs::read_to_string(path)?)?;
		config.data_dir = io::normalize_folder(&config.data_dir);
		config.validate()?;
		Ok(config)
	}

	/// Returns an iterator over `(language code, prior)` pairs.
	pub fn priors(&self) -> impl Iterator<Item = (&str, f64)> {
		self.priors.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// Sets (or adds) the prior of a language.
	///
	/// # Errors
	/// Returns an error if the prior is negative or not finite.
	pub fn set_prior(&mut self, code: &str, prior: f64) -> Result<()> {
		check_prior(code, prior)?;
		self.priors.insert(code.to_owned(), prior);
		Ok(())
	}

	fn validate(&self) -> Result<()> {
		for (code, prior) in &self.priors {
			check_prior(code, *prior)?;
		}
		self.model.validate()
	}
}

fn check_prior(code: &str, prior: f64) -> Result<()> {
	if !prior.is_finite() || prior < 0.0 {
		return Err(Error::invalid_argument(
			"priors",
			format!("prior of '{code}' must be a non-negative number, got {prior}"),
		));
	}
	Ok(())
}
