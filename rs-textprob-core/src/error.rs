//! Definition of errors.
//!
//! Undefined probabilities are not errors: they travel as `None` through
//! estimators and collapsers. Everything here is a persistence or
//! configuration failure and is always returned to the caller.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("binary cache error: {0}")]
	Binary(#[from] postcard::Error),

	/// The data file of a language is absent.
	#[error("no language data for '{code}' at {}", .path.display())]
	MissingLanguageData { code: String, path: PathBuf },

	#[error("malformed lexicon: {0}")]
	MalformedLexicon(String),

	/// A persisted trie whose shape cannot be read back as a context lexicon.
	#[error("malformed trie: {0}")]
	MalformedTrie(String),

	#[error("invalid argument '{arg}': {msg}")]
	InvalidArgument { arg: &'static str, msg: String },

	/// Every context of a context lexicon must have the same length.
	#[error("context length mismatch: expected {expected}, found {found}")]
	ContextLengthMismatch { expected: usize, found: usize },
}

impl Error {
	pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
	where
		S: Into<String>,
	{
		Self::InvalidArgument { arg, msg: msg.into() }
	}

	pub(crate) fn malformed_trie<S: Into<String>>(msg: S) -> Self {
		Self::MalformedTrie(msg.into())
	}
}
