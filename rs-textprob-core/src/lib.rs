//! N-gram based text probability library.
//!
//! This crate estimates how likely a string is to have been produced by a
//! given natural language. It provides:
//! - Splitters turning text into characters or word-like tokens
//! - Lexicons and context lexicons built from observed counts
//! - Stateless, Markov and compound (back-off) estimators
//! - A collapser reducing per-unit probabilities to one scalar
//! - Persisted per-language data and a prior-weighted classifier

/// Crate-wide error type.
pub mod error;

/// Explicit configuration objects (building, models, classifier).
pub mod config;

/// Probability models, estimators and the classifier.
pub mod model;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Error, Result};
