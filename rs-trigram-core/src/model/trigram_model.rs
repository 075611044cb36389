use std::collections::{HashMap, HashSet};
use std::path::Path;

use rand::Rng;

use super::config::ModelConfig;
use super::frequency_table::FrequencyTable;
use super::generator::Generator;
use crate::io::{self, CorpusError, TextEncoding};
use crate::text;

/// Start-of-sentence marker, padded twice in front of every sentence.
pub const START_TOKEN: &str = "<s>";
/// End-of-sentence marker, appended once to every sentence.
pub const END_TOKEN: &str = "</s>";
/// Placeholder for words at or below the unknown-word threshold.
pub const UNK_TOKEN: &str = "<UNK>";

/// The three reserved tokens, always part of the vocabulary.
pub const RESERVED_TOKENS: [&str; 3] = [UNK_TOKEN, START_TOKEN, END_TOKEN];

/// A word-level trigram language model.
///
/// The model stores, for the training text:
/// - `unigrams`: how often each token occurs, markers included
/// - `bigrams`: for each token, the tokens observed right after it
/// - `trigrams`: for each ordered pair, the tokens observed right after it,
///   nested by first then second token
/// - `vocabulary`: the tokens kept verbatim, other words become `<UNK>`
///
/// # Responsibilities
/// - Split, tokenize and filter training text
/// - Count n-grams per sentence, never across a sentence boundary
/// - Hand out read access to the tables for generation
///
/// # Invariants
/// - `vocabulary` always contains `<UNK>`, `<s>` and `</s>`
/// - Every token in a continuation table also has a unigram count >= 1
/// - Training replaces all tables; counts never accumulate across calls
///
/// Training takes `&mut self` and generation `&self`: train first, then
/// share the model for concurrent generation.
#[derive(Clone, Debug, PartialEq)]
pub struct TrigramModel {
	config: ModelConfig,
	unigrams: FrequencyTable,
	bigrams: HashMap<String, FrequencyTable>,
	trigrams: HashMap<String, HashMap<String, FrequencyTable>>,
	vocabulary: HashSet<String>,
}

impl Default for TrigramModel {
	fn default() -> Self {
		Self::with_config(ModelConfig::default())
	}
}

impl TrigramModel {
	/// Creates an untrained model with the default configuration
	/// (unknown-word threshold of 1).
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an untrained model with the given unknown-word threshold.
	pub fn with_unk_threshold(unk_threshold: usize) -> Self {
		Self::with_config(ModelConfig::default().with_unk_threshold(unk_threshold))
	}

	/// Creates an untrained model.
	///
	/// All tables are empty and the vocabulary holds only the reserved tokens.
	pub fn with_config(config: ModelConfig) -> Self {
		Self {
			config,
			unigrams: FrequencyTable::new(),
			bigrams: HashMap::new(),
			trigrams: HashMap::new(),
			vocabulary: reserved_vocabulary(),
		}
	}

	/// Trains the model on `text`, discarding anything learned before.
	///
	/// # Behavior
	/// - Splits `text` into sentences and tokenizes each one
	/// - Keeps in the vocabulary every token seen more than `unk_threshold`
	///   times, plus the reserved tokens
	/// - Replaces other tokens by `<UNK>`, pads each sentence as
	///   `<s> <s> ... </s>` and counts its unigrams, bigrams and trigrams
	///
	/// # Notes
	/// - Empty input, or input without any word, leaves empty tables.
	/// - Sentences without any word contribute nothing.
	pub fn train(&mut self, text: &str) {
		let sentences = text::tokenize_sentences(text);

		// Raw frequencies, before padding or substitution
		let mut raw_counts: HashMap<&str, usize> = HashMap::new();
		for token in sentences.iter().flatten() {
			*raw_counts.entry(token.as_str()).or_insert(0) += 1;
		}

		let mut vocabulary = reserved_vocabulary();
		vocabulary.extend(
			raw_counts
				.iter()
				.filter(|(_, count)| **count > self.config.unk_threshold)
				.map(|(token, _)| (*token).to_owned()),
		);

		let mut unigrams = FrequencyTable::new();
		let mut bigrams: HashMap<String, FrequencyTable> = HashMap::new();
		let mut trigrams: HashMap<String, HashMap<String, FrequencyTable>> = HashMap::new();

		for tokens in &sentences {
			let mut padded: Vec<&str> = Vec::with_capacity(tokens.len() + 3);
			padded.push(START_TOKEN);
			padded.push(START_TOKEN);
			padded.extend(tokens.iter().map(|token| {
				if vocabulary.contains(token) { token.as_str() } else { UNK_TOKEN }
			}));
			padded.push(END_TOKEN);

			for token in &padded {
				unigrams.add(token);
			}

			for pair in padded.windows(2) {
				bigrams.entry(pair[0].to_owned()).or_default().add(pair[1]);
			}

			for triple in padded.windows(3) {
				trigrams
					.entry(triple[0].to_owned())
					.or_default()
					.entry(triple[1].to_owned())
					.or_default()
					.add(triple[2]);
			}
		}

		log::debug!(
			"trained on {} sentences: {} distinct raw tokens, vocabulary of {}, {} unigrams",
			sentences.len(),
			raw_counts.len(),
			vocabulary.len(),
			unigrams.total()
		);

		// Swap only once everything is counted
		self.unigrams = unigrams;
		self.bigrams = bigrams;
		self.trigrams = trigrams;
		self.vocabulary = vocabulary;
	}

	/// Reads a whole file in the given encoding and trains on its content.
	///
	/// # Errors
	/// Returns the read or decode error unchanged. The model is left as it
	/// was when an error occurs.
	pub fn train_from_file<P: AsRef<Path>>(&mut self, path: P, encoding: TextEncoding) -> Result<(), CorpusError> {
		let text = io::read_text(path, encoding)?;
		self.train(&text);
		Ok(())
	}

	/// Generates up to `max_length` words using the thread-local RNG.
	///
	/// See [`generate_with_rng`](Self::generate_with_rng).
	pub fn generate(&self, max_length: usize) -> String {
		self.generate_with_rng(max_length, &mut rand::rng())
	}

	/// Generates up to `max_length` space-separated words.
	///
	/// Starts from the `(<s>, <s>)` context and draws each next token from
	/// the trigram table, backing off to the bigram table, then to the
	/// unigram table without `<s>`. Stops early on `</s>` or when nothing
	/// can be drawn. Reserved tokens never appear in the result.
	///
	/// An untrained model returns an empty string.
	pub fn generate_with_rng<R: Rng>(&self, max_length: usize, rng: &mut R) -> String {
		self.generator().run(max_length, rng)
	}

	/// Returns a generator positioned at the start of a sentence.
	pub fn generator(&self) -> Generator<'_> {
		Generator::new(self)
	}

	/// Returns the configuration the model was built with.
	pub fn config(&self) -> ModelConfig {
		self.config
	}

	/// Raw tokens seen at most this many times were mapped to `<UNK>`.
	pub fn unk_threshold(&self) -> usize {
		self.config.unk_threshold
	}

	/// Returns `true` once a training call produced at least one sentence.
	pub fn is_trained(&self) -> bool {
		!self.unigrams.is_empty()
	}

	/// Tokens kept verbatim during the last training, reserved tokens included.
	pub fn vocabulary(&self) -> &HashSet<String> {
		&self.vocabulary
	}

	/// Number of vocabulary tokens, the three reserved ones included.
	pub fn vocabulary_size(&self) -> usize {
		self.vocabulary.len()
	}

	/// Returns `true` if `token` is kept verbatim rather than mapped to `<UNK>`.
	pub fn in_vocabulary(&self, token: &str) -> bool {
		self.vocabulary.contains(token)
	}

	/// The unigram table, markers included.
	pub fn unigrams(&self) -> &FrequencyTable {
		&self.unigrams
	}

	/// Occurrences of `token` in the padded sentences, 0 if unseen.
	pub fn unigram_count(&self, token: &str) -> usize {
		self.unigrams.get(token)
	}

	/// Sum of all unigram counts, i.e. the number of padded tokens.
	pub fn total_unigram_count(&self) -> usize {
		self.unigrams.total()
	}

	/// Tokens observed right after `previous`.
	pub fn bigram_continuations(&self, previous: &str) -> Option<&FrequencyTable> {
		self.bigrams.get(previous)
	}

	/// Times `next` directly followed `previous`.
	pub fn bigram_count(&self, previous: &str, next: &str) -> usize {
		self.bigram_continuations(previous).map_or(0, |table| table.get(next))
	}

	/// Tokens observed right after the pair `(first, second)`.
	pub fn trigram_continuations(&self, first: &str, second: &str) -> Option<&FrequencyTable> {
		self.trigrams.get(first)?.get(second)
	}

	/// Times `next` directly followed the pair `(first, second)`.
	pub fn trigram_count(&self, first: &str, second: &str, next: &str) -> usize {
		self.trigram_continuations(first, second).map_or(0, |table| table.get(next))
	}

	/// Iterates over every trigram context pair.
	pub fn trigram_contexts(&self) -> impl Iterator<Item = (&str, &str)> {
		self.trigrams.iter().flat_map(|(first, seconds)| {
			seconds.keys().map(move |second| (first.as_str(), second.as_str()))
		})
	}
}

fn reserved_vocabulary() -> HashSet<String> {
	RESERVED_TOKENS.iter().map(|token| (*token).to_owned()).collect()
}
