//! Elemental types shared by every model.

/// A probability in `[0, 1]`.
pub type Probability = f64;

/// A linguistic unit: a single character or a word-like token,
/// depending on the splitter that produced it.
pub type Unit = String;

/// A fixed-length sequence of units used as a lookup key (a context).
pub type NGram = Vec<Unit>;

/// Multiplies two probabilities that may be undefined.
///
/// The product is undefined as soon as one factor is.
pub fn safe_mul(a: Option<Probability>, b: Option<Probability>) -> Option<Probability> {
	Some(a? * b?)
}

/// Coerces an undefined probability to `default`.
pub fn or_default(p: Option<Probability>, default: Probability) -> Probability {
	p.unwrap_or(default)
}

#[cfg(test)]
pub(crate) fn assert_close(actual: f64, expected: f64) {
	assert!(
		(actual - expected).abs() < 1e-9,
		"expected {expected}, got {actual}"
	);
}
