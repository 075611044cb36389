use std::collections::BTreeMap;

use rand::Rng;

/// Occurrence counts of tokens.
///
/// A `FrequencyTable` is either the unigram table of a model or the set of
/// observed continuations of one context (a preceding token for bigrams,
/// a preceding pair for trigrams).
///
/// Conceptually, this is the outgoing edge list of a node in a Markov chain
/// where edges are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate token occurrences during training
/// - Draw a token using weighted random sampling
///
/// ## Invariants
/// - Every stored count is strictly positive
/// - `total` is the sum of all stored counts
///
/// Tokens are kept ordered so that a seeded RNG always yields the same draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
	/// Token -> number of observations.
	/// Example: { "cat" => 2, "dog" => 1 }
	counts: BTreeMap<String, usize>,
	/// Cached sum of `counts`.
	total: usize,
}

impl FrequencyTable {
	/// Creates a new empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `token`.
	///
	/// - If the token already exists, its count is increased.
	/// - Otherwise, it is inserted with a count of 1.
	pub fn add(&mut self, token: &str) {
		match self.counts.get_mut(token) {
			Some(count) => *count += 1,
			None => {
				self.counts.insert(token.to_owned(), 1);
			}
		}
		self.total += 1;
	}

	/// Returns the count of `token`, 0 if it was never observed.
	pub fn get(&self, token: &str) -> usize {
		self.counts.get(token).copied().unwrap_or(0)
	}

	/// Returns `true` if `token` was observed at least once.
	pub fn contains(&self, token: &str) -> bool {
		self.counts.contains_key(token)
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of distinct tokens.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// Returns `true` if no token was observed.
	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(token, count)` pairs in token order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.counts.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// Draws a token with probability proportional to its count.
	///
	/// Returns `None` if the table is empty.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		self.sample_filtered(None, rng)
	}

	/// Draws a token as [`sample`](Self::sample) does, with `excluded`
	/// removed from the candidates.
	///
	/// The remaining counts are used as they are; removing one entry does
	/// not rescale the others beyond the implicit change of the total.
	/// Returns `None` if nothing remains.
	pub fn sample_excluding<R: Rng>(&self, excluded: &str, rng: &mut R) -> Option<&str> {
		self.sample_filtered(Some(excluded), rng)
	}

	/// Single weighted draw:
	/// - an O(n) scan over the counts
	/// - a cumulative subtraction to select a bucket
	fn sample_filtered<R: Rng>(&self, excluded: Option<&str>, rng: &mut R) -> Option<&str> {
		let skipped = excluded.map_or(0, |token| self.get(token));
		let total = self.total - skipped;
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (token, count) in self.iter() {
			if Some(token) == excluded {
				continue;
			}
			if r < count {
				return Some(token);
			}
			r -= count;
		}

		// Unreachable while `total` matches the counts
		None
	}
}
