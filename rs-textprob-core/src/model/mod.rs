//! Top-level module for the text probability system.
//!
//! Leaf to root:
//! - Splitters turning text into units (`splitter`)
//! - Lexicons and context lexicons (`lexicon`) and their builders (`builder`)
//! - Trie persistence of context lexicons (`trie`)
//! - Stateless, Markov and compound estimators (`estimator`)
//! - Whole-string probabilities (`collapser`)
//! - Per-language data and default stacks (`language_data`, `language_model`)
//! - The prior-weighted classifier (`classifier`)

/// Probability, unit and n-gram types.
pub mod probability;

/// Splitting strings into characters or word-like tokens.
pub mod splitter;

/// Immutable unit → probability tables, with and without context.
pub mod lexicon;

/// Mutable unit counts shared by the builders.
///
/// This module is not exposed publicly.
mod count_table;

/// Accumulating lexicons and context lexicons from a corpus.
pub mod builder;

/// Encoding context lexicons as tagged tries for persistence.
pub mod trie;

/// Per-unit conditional probability estimators, including back-off.
pub mod estimator;

/// Reducing per-unit probabilities to the probability of a string.
pub mod collapser;

/// The four tables describing a language, their persistence and construction.
pub mod language_data;

/// Default estimator stacks over language data.
pub mod language_model;

/// Combining per-language probabilities with priors into a posterior.
pub mod classifier;
