use std::sync::LazyLock;

use regex::Regex;

// Constant patterns, compiling them cannot fail
static SENTENCE_BOUNDARY: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("Failed to build sentence regex"));
static WORD: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[A-Za-z0-9']+").expect("Failed to build word regex"));

/// Splits text into sentences.
///
/// A boundary is a `.`, `!` or `?` followed by whitespace. The punctuation
/// stays with the sentence it ends; the whitespace is dropped. Every
/// sentence is trimmed and empty ones are skipped.
///
/// Abbreviations are not special-cased: `"Mr. Smith"` is two sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
	let mut sentences = Vec::new();
	let mut start = 0;

	for boundary in SENTENCE_BOUNDARY.find_iter(text) {
		// Punctuation is ASCII, one byte
		sentences.push(&text[start..boundary.start() + 1]);
		start = boundary.end();
	}
	sentences.push(&text[start..]);

	sentences
		.into_iter()
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.collect()
}

/// Splits a sentence into lowercase word tokens.
///
/// A token is a maximal run of ASCII letters, digits and apostrophes.
/// Everything else is a separator.
///
/// # Examples
/// `"Don't stop, Alice!"` -> `["don't", "stop", "alice"]`
pub fn tokenize(sentence: &str) -> Vec<String> {
	let lower = sentence.to_lowercase();
	WORD.find_iter(&lower).map(|m| m.as_str().to_owned()).collect()
}

/// Splits text into sentences and tokenizes each one.
///
/// Sentences without any token are dropped.
pub fn tokenize_sentences(text: &str) -> Vec<Vec<String>> {
	split_sentences(text)
		.into_iter()
		.map(tokenize)
		.filter(|tokens| !tokens.is_empty())
		.collect()
}
