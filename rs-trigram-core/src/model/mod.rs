//! Top-level module for the trigram model.
//!
//! It includes:
//! - The trained model and its count tables (`TrigramModel`)
//! - Count mappings with weighted sampling (`FrequencyTable`)
//! - The backoff walk used for generation (`Generator`)
//! - Construction-time configuration (`ModelConfig`)

/// Trigram model state, training and read accessors.
///
/// Owns the unigram table, the bigram and trigram continuation tables
/// and the vocabulary.
pub mod trigram_model;

/// Count mapping from token to number of observations.
///
/// Used both for the unigram table and for every continuation table,
/// and supports weighted random sampling.
pub mod frequency_table;

/// Backoff generation over a trained model.
///
/// Walks trigram, then bigram, then unigram tables one step at a time.
pub mod generator;

/// Configuration fixed at model construction.
pub mod config;
