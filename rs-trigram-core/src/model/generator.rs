use rand::Rng;

use super::trigram_model::{END_TOKEN, START_TOKEN, TrigramModel, UNK_TOKEN};

/// Table a token was drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backoff {
	/// Continuations of the full two-token context.
	Trigram,
	/// Continuations of the last context token only.
	Bigram,
	/// Whole unigram table, `<s>` excluded.
	Unigram,
}

/// A token drawn from the model and the table that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Draw<'m> {
	pub token: &'m str,
	pub backoff: Backoff,
}

/// Why a generation run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
	/// `</s>` was drawn.
	EndOfSequence,
	/// No table had anything to draw from.
	Exhausted,
	/// The requested number of steps was reached.
	MaxLength,
}

/// Outcome of a single generation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step<'m> {
	/// A word was drawn; it belongs in the output.
	Emitted(&'m str),
	/// `<UNK>` or `<s>` was drawn. The context moved forward but the
	/// token is not part of the output.
	Absorbed(&'m str),
	/// Generation is over.
	Stopped(StopReason),
}

/// Walks a trained model one token at a time.
///
/// # Responsibilities
/// - Keep the rolling two-token context
/// - Draw the next token with trigram -> bigram -> unigram backoff
/// - Keep reserved tokens out of the output
///
/// The generator only borrows the model; any number of them can run
/// against the same model.
#[derive(Clone, Debug)]
pub struct Generator<'m> {
	model: &'m TrigramModel,
	context: (&'m str, &'m str),
}

impl<'m> Generator<'m> {
	/// Creates a generator at the start of a sentence, context `(<s>, <s>)`.
	pub fn new(model: &'m TrigramModel) -> Self {
		Self::with_context(model, START_TOKEN, START_TOKEN)
	}

	/// Creates a generator from an arbitrary context.
	///
	/// The pair does not need to have been observed during training.
	pub fn with_context(model: &'m TrigramModel, first: &'m str, second: &'m str) -> Self {
		Self { model, context: (first, second) }
	}

	/// Returns the current two-token context.
	pub fn context(&self) -> (&'m str, &'m str) {
		self.context
	}

	/// Draws the next token without moving the context.
	///
	/// # Behavior
	/// - Samples the trigram continuations of the context if there are any
	/// - Otherwise samples the bigram continuations of the second token
	/// - Otherwise samples the unigram table with `<s>` left out
	///
	/// Returns `None` when all three are empty.
	pub fn draw<R: Rng>(&self, rng: &mut R) -> Option<Draw<'m>> {
		let model = self.model;
		let (first, second) = self.context;

		if let Some(token) = model.trigram_continuations(first, second).and_then(|table| table.sample(rng)) {
			return Some(Draw { token, backoff: Backoff::Trigram });
		}

		if let Some(token) = model.bigram_continuations(second).and_then(|table| table.sample(rng)) {
			return Some(Draw { token, backoff: Backoff::Bigram });
		}

		// <s> cannot follow a word, drawing it would stall the walk
		model
			.unigrams()
			.sample_excluding(START_TOKEN, rng)
			.map(|token| Draw { token, backoff: Backoff::Unigram })
	}

	/// Draws the next token and moves the context forward.
	///
	/// `</s>` and exhaustion stop the walk and leave the context unchanged.
	pub fn step<R: Rng>(&mut self, rng: &mut R) -> Step<'m> {
		let Some(draw) = self.draw(rng) else {
			return Step::Stopped(StopReason::Exhausted);
		};
		log::trace!("{:?} -> {} ({:?})", self.context, draw.token, draw.backoff);

		if draw.token == END_TOKEN {
			return Step::Stopped(StopReason::EndOfSequence);
		}

		self.context = (self.context.1, draw.token);
		if draw.token == UNK_TOKEN || draw.token == START_TOKEN {
			Step::Absorbed(draw.token)
		} else {
			Step::Emitted(draw.token)
		}
	}

	/// Runs at most `max_length` steps and joins the emitted words with spaces.
	pub fn run<R: Rng>(mut self, max_length: usize, rng: &mut R) -> String {
		let mut words: Vec<&str> = Vec::new();
		let mut reason = StopReason::MaxLength;

		for _ in 0..max_length {
			match self.step(rng) {
				Step::Emitted(token) => words.push(token),
				Step::Absorbed(_) => (),
				Step::Stopped(stop) => {
					reason = stop;
					break;
				}
			}
		}

		log::debug!("generated {} words, stopped on {:?}", words.len(), reason);
		words.join(" ")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn trained(text: &str, unk_threshold: usize) -> TrigramModel {
		let mut model = TrigramModel::with_unk_threshold(unk_threshold);
		model.train(text);
		model
	}

	#[test]
	fn test_untrained_model_is_exhausted() {
		let model = TrigramModel::new();
		let mut rng = StdRng::seed_from_u64(1);
		let mut generator = model.generator();
		assert_eq!(generator.draw(&mut rng), None);
		assert_eq!(generator.step(&mut rng), Step::Stopped(StopReason::Exhausted));
	}

	#[test]
	fn test_start_context_uses_trigram_table() {
		let model = trained("the cat sat.", 0);
		let mut rng = StdRng::seed_from_u64(2);
		let draw = model.generator().draw(&mut rng).unwrap();
		assert_eq!(draw, Draw { token: "the", backoff: Backoff::Trigram });
	}

	#[test]
	fn test_unseen_pair_backs_off_to_bigram() {
		// ("sat", "the") never occurs, "the" is always followed by "cat"
		let model = trained("the cat sat. the cat ran.", 0);
		let mut rng = StdRng::seed_from_u64(3);
		let generator = Generator::with_context(&model, "sat", "the");
		assert_eq!(model.trigram_continuations("sat", "the"), None);

		for _ in 0..20 {
			let draw = generator.draw(&mut rng).unwrap();
			assert_eq!(draw, Draw { token: "cat", backoff: Backoff::Bigram });
		}
	}

	#[test]
	fn test_unknown_token_backs_off_to_unigram() {
		let model = trained("the cat sat. the cat ran.", 0);
		let mut rng = StdRng::seed_from_u64(4);
		let generator = Generator::with_context(&model, "zebra", "yak");

		for _ in 0..50 {
			let draw = generator.draw(&mut rng).unwrap();
			assert_eq!(draw.backoff, Backoff::Unigram);
			assert_ne!(draw.token, START_TOKEN);
		}
	}

	#[test]
	fn test_step_moves_context() {
		let model = trained("the cat sat.", 0);
		let mut rng = StdRng::seed_from_u64(5);
		let mut generator = model.generator();

		assert_eq!(generator.step(&mut rng), Step::Emitted("the"));
		assert_eq!(generator.context(), (START_TOKEN, "the"));
		assert_eq!(generator.step(&mut rng), Step::Emitted("cat"));
		assert_eq!(generator.step(&mut rng), Step::Emitted("sat"));
		assert_eq!(generator.step(&mut rng), Step::Stopped(StopReason::EndOfSequence));
		assert_eq!(generator.context(), ("cat", "sat"));
	}

	#[test]
	fn test_unknown_token_is_absorbed() {
		// Every word is seen once, all of them map to <UNK>
		let model = trained("alpha beta.", 1);
		let mut rng = StdRng::seed_from_u64(6);
		let mut generator = model.generator();

		assert_eq!(generator.step(&mut rng), Step::Absorbed(UNK_TOKEN));
		assert_eq!(generator.step(&mut rng), Step::Absorbed(UNK_TOKEN));
		assert_eq!(generator.step(&mut rng), Step::Stopped(StopReason::EndOfSequence));
		assert_eq!(model.generate_with_rng(10, &mut rng), "");
	}

	#[test]
	fn test_start_token_from_custom_context_is_absorbed() {
		// Only (x, <s>) contexts reach the bigram row of <s>, which holds <s> itself
		let model = trained("word word.", 0);
		let mut rng = StdRng::seed_from_u64(7);

		for _ in 0..20 {
			let mut generator = Generator::with_context(&model, "word", START_TOKEN);
			match generator.step(&mut rng) {
				Step::Absorbed(token) => assert_eq!(token, START_TOKEN),
				Step::Emitted(token) => assert_eq!(token, "word"),
				Step::Stopped(reason) => panic!("unexpected stop: {reason:?}"),
			}
		}
	}

	#[test]
	fn test_run_respects_max_length() {
		// "a a a ..." loops on itself: (a, a) -> a
		let model = trained(&format!("{}.", ["a"; 40].join(" ")), 0);
		let mut rng = StdRng::seed_from_u64(8);

		assert_eq!(model.generator().run(0, &mut rng), "");
		for max_length in [1, 5, 12] {
			let text = model.generator().run(max_length, &mut rng);
			assert!(text.split(' ').count() <= max_length, "{text}");
		}
	}

	#[test]
	fn test_same_seed_same_text() {
		let model = trained("the cat sat. the dog sat. the cat ran. a dog ran.", 0);
		let first = model.generate_with_rng(20, &mut StdRng::seed_from_u64(9));
		let second = model.generate_with_rng(20, &mut StdRng::seed_from_u64(9));
		assert_eq!(first, second);
	}
}
