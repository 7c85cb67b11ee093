use std::sync::OnceLock;

use regex::Regex;

use super::probability::Unit;

/// Partitions a string into an ordered sequence of linguistic units.
///
/// Implementations must be pure and idempotent: splitting a unit produced
/// by the same splitter yields that unit again.
pub trait Splitter: Send + Sync {
	fn split(&self, text: &str) -> Vec<Unit>;
}

/// Every Unicode scalar value is a unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct Characters;

impl Splitter for Characters {
	fn split(&self, text: &str) -> Vec<Unit> {
		text.chars().map(String::from).collect()
	}
}

/// Word-like tokens for Latin-script text.
///
/// Maximal runs of word characters (letters, numbers, `_` and the
/// replacement character) form one token. Any other character is a token by
/// itself. Whitespace-only tokens are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct LatinTokens;

impl LatinTokens {
	const PATTERN: &'static str = r"[\p{L}\p{N}_\x{FFFD}]+|[^\p{L}\p{N}_\x{FFFD}]";
}

impl Splitter for LatinTokens {
	fn split(&self, text: &str) -> Vec<Unit> {
		static RE: OnceLock<Regex> = OnceLock::new();
		let re = RE.get_or_init(|| Regex::new(Self::PATTERN).expect("Invalid regex pattern"));

		re.find_iter(text)
			.map(|m| m.as_str())
			.filter(|token| !token.trim().is_empty())
			.map(str::to_owned)
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn characters_are_scalar_values() {
		assert_eq!(Characters.split("où"), vec!["o", "ù"]);
		assert!(Characters.split("").is_empty());
	}

	#[test]
	fn latin_tokens_isolate_punctuation() {
		assert_eq!(
			LatinTokens.split("\"en\" denota al inglés"),
			vec!["\"", "en", "\"", "denota", "al", "inglés"]
		);
		assert_eq!(LatinTokens.split("l'Internet"), vec!["l", "'", "Internet"]);
		assert_eq!(LatinTokens.split("106,460,000 km2"), vec!["106", ",", "460", ",", "000", "km2"]);
	}

	#[test]
	fn combining_marks_are_not_word_characters() {
		assert_eq!(LatinTokens.split("हिंदी"), vec!["ह", "ि", "ं", "द", "ी"]);
		assert_eq!(LatinTokens.split("a\u{FFFD}b_c"), vec!["a\u{FFFD}b_c"]);
	}

	#[test]
	fn latin_tokens_drop_whitespace() {
		assert!(LatinTokens.split("  \t\n").is_empty());
		assert_eq!(LatinTokens.split(" a  b "), vec!["a", "b"]);
	}

	#[test]
	fn splitters_are_idempotent() {
		for token in LatinTokens.split("sondern jeder darf, geht!") {
			assert_eq!(LatinTokens.split(&token), vec![token.clone()]);
		}
		for c in Characters.split("donc") {
			assert_eq!(Characters.split(&c), vec![c.clone()]);
		}
	}
}
