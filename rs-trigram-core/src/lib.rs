//! Word-level trigram language model.
//!
//! This crate provides:
//! - Sentence splitting and tokenization of raw text
//! - Unigram/bigram/trigram counting with unknown-word substitution
//! - Probabilistic generation with trigram -> bigram -> unigram backoff
//! - Training from files in a caller-chosen text encoding
//!
//! A model is trained once (or retrained, replacing its tables) and then
//! read by any number of generation calls. Training needs `&mut self`
//! and generation only `&self`, so sharing across threads follows the usual
//! single-writer discipline: finish training before handing out shared
//! references.

/// Trigram model, count tables and the backoff generator.
pub mod model;

/// Sentence splitting and word tokenization.
pub mod text;

/// Reading and decoding training files.
///
/// Not exposed, only its types are re-exported.
mod io;

pub use io::{CorpusError, TextEncoding};
pub use model::config::{DEFAULT_MAX_LENGTH, ModelConfig};
pub use model::generator::{Backoff, Draw, Generator, Step, StopReason};
pub use model::trigram_model::{END_TOKEN, START_TOKEN, TrigramModel, UNK_TOKEN};
