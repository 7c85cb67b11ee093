use std::fs;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::thread;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::builder::ContextLexiconBuilder;
use super::lexicon::{ContextLexicon, Lexicon};
use super::splitter::{Characters, LatinTokens};
use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::io::{language_path, list_files, read_file};

/// Everything known about one language: token and character lexicons and
/// context lexicons.
///
/// Persisted as one JSON object per language with the fields
/// `token_lexicon`, `token_context_lexicon`, `char_lexicon` and
/// `char_context_lexicon`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LanguageData {
	pub token_lexicon: Arc<Lexicon>,
	pub token_context_lexicon: Arc<ContextLexicon>,
	pub char_lexicon: Arc<Lexicon>,
	pub char_context_lexicon: Arc<ContextLexicon>,
}

impl LanguageData {
	/// Loads the data of language `code` from `folder`.
	///
	/// - Reads `<folder>/<code>.json`.
	/// - With `cache_binary`, a `<folder>/<code>.bin` file is used instead when
	///   it is at least as recent as the JSON file, and (re)written after
	///   parsing the JSON otherwise. `postcard` is used for compact
	///   serialization.
	///
	/// # Errors
	/// - [`Error::MissingLanguageData`] if the JSON file does not exist, even
	///   when a binary cache does.
	/// - Parse errors if a file is malformed.
	pub fn load<P: AsRef<Path>>(folder: P, code: &str, cache_binary: bool) -> Result<Self> {
		let folder = folder.as_ref();
		let json_path = language_path(folder, code, "json");
		let binary_path = language_path(folder, code, "bin");

		if !json_path.is_file() {
			return Err(Error::MissingLanguageData { code: code.to_owned(), path: json_path });
		}
		if cache_binary && is_fresh_cache(&json_path, &binary_path) {
			debug!("Loading '{code}' from binary cache {}", binary_path.display());
			return Self::load_binary(binary_path);
		}

		debug!("Loading '{code}' from {}", json_path.display());
		let data = Self::load_json(&json_path)?;
		if cache_binary {
			data.save_binary(&binary_path)?;
			info!("Wrote binary cache {}", binary_path.display());
		}
		Ok(data)
	}

	/// Lists the language codes having a JSON file in `folder`.
	pub fn available<P: AsRef<Path>>(folder: P) -> Result<Vec<String>> {
		Ok(list_files(folder, "json")?)
	}

	pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = fs::read(path)?;
		Ok(serde_json::from_slice(&bytes)?)
	}

	pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		fs::write(path, serde_json::to_vec(self)?)?;
		Ok(())
	}

	pub fn load_binary<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = fs::read(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}

	pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		fs::write(path, postcard::to_stdvec(self)?)?;
		Ok(())
	}

	/// Builds language data from a stream of text chunks.
	///
	/// Chunks may be cut anywhere: each one is split independently, so a
	/// boundary only loses the contexts spanning it.
	///
	/// # Behavior
	/// - Stops once `config.max_tokens` tokens were observed, if set.
	/// - Summarizes the result with `config.min_count`, if set.
	pub fn from_corpus<I, T>(corpus: I, config: &BuildConfig) -> Result<Self>
	where
		I: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		let mut builder = LanguageDataBuilder::new(config)?;
		for text in corpus {
			if config.max_tokens.is_some_and(|max| builder.total_tokens() >= max) {
				warn!("Reached {} tokens, ignoring the rest of the corpus", builder.total_tokens());
				break;
			}
			builder.add(text.as_ref());
		}
		Ok(builder.finish(config))
	}

	/// Reads a text file, splits its lines into chunks, builds partial data
	/// in parallel, merges the partial builders and returns the result.
	///
	/// # Behavior
	/// - Splits input lines into chunks (based on CPU cores * factor).
	/// - Spawns threads to build partial builders for each chunk.
	/// - Merges all partial builders sequentially.
	///
	/// # Notes
	/// - `config.max_tokens` is ignored here: every line is ingested. A
	///   warning is logged when it is set. Use [`LanguageData::from_corpus`]
	///   over the lines to cap the corpus.
	pub fn from_corpus_file<P: AsRef<Path>>(filename: P, config: &BuildConfig) -> Result<Self> {
		if let Some(max) = config.max_tokens {
			warn!("max_tokens ({max}) is ignored by parallel ingestion, every line is used");
		}
		let lines = read_file(&filename)?;
		let template = LanguageDataBuilder::new(config)?;
		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = lines.len().div_ceil(chunks).max(1);
		info!(
			"Building language data from {} lines of {} in chunks of {chunk_size}",
			lines.len(),
			filename.as_ref().display()
		);

		let (tx, rx) = mpsc::channel();
		let mut workers = Vec::new();
		for chunk in lines.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();
			let mut partial = template.clone();

			workers.push(thread::spawn(move || {
				for line in &chunk {
					partial.add(line);
				}
				// The receiver outlives every worker.
				let _ = tx.send(partial);
			}));
		}
		drop(tx);

		let mut builder = template;
		for partial in rx.iter() {
			builder.merge(&partial)?;
		}
		for worker in workers {
			if worker.join().is_err() {
				return Err(Error::Io(std::io::Error::other("a corpus worker panicked")));
			}
		}

		Ok(builder.finish(config))
	}

	/// Drops units and contexts observed fewer than `min_n` times.
	///
	/// Trades fidelity for storage size.
	pub fn summarize(&self, min_n: usize) -> Self {
		Self {
			token_lexicon: Arc::new(self.token_lexicon.summarize(min_n)),
			token_context_lexicon: Arc::new(self.token_context_lexicon.summarize(min_n)),
			char_lexicon: Arc::new(self.char_lexicon.summarize(min_n)),
			char_context_lexicon: Arc::new(self.char_context_lexicon.summarize(min_n)),
		}
	}
}

/// Whether `binary` exists and was modified no earlier than `json`.
fn is_fresh_cache(json: &Path, binary: &Path) -> bool {
	let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified()).ok();
	match (modified(json), modified(binary)) {
		(Some(json), Some(binary)) => binary >= json,
		_ => false,
	}
}

/// Feeds the same text chunks to a token-level and a character-level
/// context lexicon builder.
#[derive(Clone, Debug)]
pub struct LanguageDataBuilder {
	tokens: ContextLexiconBuilder<LatinTokens>,
	chars: ContextLexiconBuilder<Characters>,
}

impl LanguageDataBuilder {
	/// # Errors
	/// Returns an error if a context length of `config` is zero.
	pub fn new(config: &BuildConfig) -> Result<Self> {
		Ok(Self {
			tokens: ContextLexiconBuilder::new(LatinTokens, config.token_n)?,
			chars: ContextLexiconBuilder::new(Characters, config.char_n)?,
		})
	}

	/// Acquires information from `text`.
	pub fn add(&mut self, text: &str) {
		self.tokens.add(text);
		self.chars.add(text);
	}

	/// Number of tokens observed so far.
	pub fn total_tokens(&self) -> usize {
		self.tokens.total()
	}

	/// Merges another builder into this one.
	///
	/// # Errors
	/// Returns an error if the context lengths differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		self.tokens.merge(&other.tokens)?;
		self.chars.merge(&other.chars)
	}

	/// Returns a snapshot of the accumulated data, summarized with
	/// `config.min_count` if set.
	pub fn finish(&self, config: &BuildConfig) -> LanguageData {
		let data = LanguageData {
			token_lexicon: Arc::new(self.tokens.lexicon()),
			token_context_lexicon: Arc::new(self.tokens.context_lexicon()),
			char_lexicon: Arc::new(self.chars.lexicon()),
			char_context_lexicon: Arc::new(self.chars.context_lexicon()),
		};
		info!(
			"Built language data: {} tokens ({} distinct), {} characters ({} distinct)",
			data.token_lexicon.total_observations(),
			data.token_lexicon.len(),
			data.char_lexicon.total_observations(),
			data.char_lexicon.len()
		);

		match config.min_count {
			Some(min_n) => data.summarize(min_n),
			None => data,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	fn sample() -> LanguageData {
		LanguageData::from_corpus(["the cat sat", "the dog sat", "a cat"], &BuildConfig::default()).unwrap()
	}

	#[test]
	fn builds_all_four_tables() {
		let data = sample();
		assert_eq!(data.token_lexicon.total_observations(), 8);
		assert_eq!(data.token_lexicon.count("the"), 2);
		assert_eq!(data.token_context_lexicon.order(), 1);
		assert_eq!(data.char_context_lexicon.order(), 2);
		assert_eq!(
			data.token_context_lexicon.get(&["the".to_owned()]).unwrap().get("cat"),
			Some(0.5)
		);
		assert_eq!(data.char_lexicon.count(" "), 5);
	}

	#[test]
	fn json_field_names() {
		let value = serde_json::to_value(sample()).unwrap();
		for field in ["token_lexicon", "token_context_lexicon", "char_lexicon", "char_context_lexicon"] {
			assert!(value.get(field).is_some(), "missing {field}");
		}
	}

	#[test]
	fn max_tokens_stops_ingestion() {
		let config = BuildConfig { max_tokens: Some(3), ..BuildConfig::default() };
		let data = LanguageData::from_corpus(["one two three", "four"], &config).unwrap();
		assert_eq!(data.token_lexicon.total_observations(), 3);
		assert_eq!(data.token_lexicon.get("four"), None);
	}

	#[test]
	fn min_count_summarizes() {
		let config = BuildConfig { min_count: Some(2), ..BuildConfig::default() };
		let data = LanguageData::from_corpus(["the cat sat", "the dog sat", "a cat"], &config).unwrap();
		assert_eq!(data.token_lexicon.get("dog"), None);
		assert_eq!(data.token_lexicon.total_observations(), 6);
	}

	#[test]
	fn parallel_build_matches_sequential() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		let lines: Vec<String> = (0..100).map(|i| format!("line number {i} of the corpus")).collect();
		fs::write(&path, lines.join("\n")).unwrap();

		let parallel = LanguageData::from_corpus_file(&path, &BuildConfig::default()).unwrap();
		let sequential = LanguageData::from_corpus(&lines, &BuildConfig::default()).unwrap();
		assert_eq!(parallel, sequential);
	}

	#[test]
	fn load_missing_language_fails() {
		let dir = tempfile::tempdir().unwrap();
		assert!(matches!(
			LanguageData::load(dir.path(), "xx", false),
			Err(Error::MissingLanguageData { .. })
		));
	}

	#[test]
	fn load_malformed_language_fails() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("xx.json"), r#"{"token_lexicon": 3}"#).unwrap();
		assert!(matches!(LanguageData::load(dir.path(), "xx", false), Err(Error::Json(_))));
	}

	#[test]
	fn binary_cache_is_written_and_used() {
		let dir = tempfile::tempdir().unwrap();
		let data = sample();
		data.save_json(dir.path().join("en.json")).unwrap();

		let loaded = LanguageData::load(dir.path(), "en", true).unwrap();
		assert_eq!(loaded, data);
		assert!(dir.path().join("en.bin").exists());
		assert_eq!(LanguageData::load(dir.path(), "en", true).unwrap(), data);
	}

	#[test]
	fn binary_cache_without_json_is_not_served() {
		let dir = tempfile::tempdir().unwrap();
		let data = sample();
		data.save_json(dir.path().join("en.json")).unwrap();
		LanguageData::load(dir.path(), "en", true).unwrap();

		fs::remove_file(dir.path().join("en.json")).unwrap();
		assert!(matches!(
			LanguageData::load(dir.path(), "en", true),
			Err(Error::MissingLanguageData { .. })
		));
		assert_eq!(LanguageData::available(dir.path()).unwrap(), Vec::<String>::new());
	}

	#[test]
	fn stale_binary_cache_is_rebuilt() {
		let dir = tempfile::tempdir().unwrap();
		let json_path = dir.path().join("en.json");
		let binary_path = dir.path().join("en.bin");
		sample().save_json(&json_path).unwrap();
		LanguageData::load(dir.path(), "en", true).unwrap();

		let retrained = LanguageData::from_corpus(["a brand new corpus"], &BuildConfig::default()).unwrap();
		retrained.save_json(&json_path).unwrap();
		let json_time = fs::metadata(&json_path).unwrap().modified().unwrap();
		fs::File::options()
			.write(true)
			.open(&binary_path)
			.unwrap()
			.set_modified(json_time - Duration::from_secs(60))
			.unwrap();

		assert_eq!(LanguageData::load(dir.path(), "en", true).unwrap(), retrained);
		assert!(fs::metadata(&binary_path).unwrap().modified().unwrap() >= json_time);
		assert_eq!(LanguageData::load_binary(&binary_path).unwrap(), retrained);
	}

	#[test]
	fn parallel_build_ignores_max_tokens() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		fs::write(&path, "one two three\nfour five\nsix").unwrap();

		let config = BuildConfig { max_tokens: Some(2), ..BuildConfig::default() };
		let data = LanguageData::from_corpus_file(&path, &config).unwrap();
		assert_eq!(data.token_lexicon.total_observations(), 6);
	}
}
