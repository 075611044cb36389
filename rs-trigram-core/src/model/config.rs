/// Number of tokens generated when the caller has no preference.
pub const DEFAULT_MAX_LENGTH: usize = 50;

/// Parameters fixed when a `TrigramModel` is constructed.
///
/// # Invariants
/// - `unk_threshold` never changes for the lifetime of a model; retraining
///   reuses it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelConfig {
	/// Raw tokens seen at most this many times in the training text are
	/// replaced by the unknown marker before counting.
	pub unk_threshold: usize,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self { unk_threshold: 1 }
	}
}

impl ModelConfig {
	/// Returns a copy of this configuration with another unknown-word threshold.
	pub fn with_unk_threshold(mut self, unk_threshold: usize) -> Self {
		self.unk_threshold = unk_threshold;
		self
	}
}
