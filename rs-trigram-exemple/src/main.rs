use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_trigram_core::{DEFAULT_MAX_LENGTH, TextEncoding, TrigramModel};

const SAMPLE: &str = "
    Alice was beginning to get very tired of sitting by her sister on the bank,
    and of having nothing to do: once or twice she had peeped into the book her
    sister was reading, but it had no pictures or conversations in it, 'and what
    is the use of a book,' thought Alice 'without pictures or conversation?'
";

#[derive(Parser, Debug)]
#[command(name = "rs-trigram-exemple")]
#[command(about = "Train a trigram model and print generated text")]
#[command(version)]
struct Args {
    /// Train on this file instead of the built-in paragraph
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Encoding of the training file (utf-8, utf-8-lossy, latin-1, ascii, utf-16, utf-16le, utf-16be)
    #[arg(short, long, default_value = "utf-8")]
    encoding: TextEncoding,

    /// Words seen at most this many times become <UNK>
    #[arg(short, long, default_value_t = 0)]
    unk_threshold: usize,

    /// Maximum number of words per sample
    #[arg(short, long, default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    /// Number of samples to print
    #[arg(short, long, default_value_t = 1)]
    samples: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    // Words seen at most 'unk_threshold' times are replaced by <UNK>
    // before counting. The default of 0 keeps every word of the sample.
    let mut model = TrigramModel::with_unk_threshold(args.unk_threshold);

    // Read and decode errors are returned as they are
    match &args.file {
        Some(path) => {
            log::info!("training on {} ({})", path.display(), args.encoding);
            model.train_from_file(path, args.encoding)?;
        }
        None => {
            log::info!("training on the built-in paragraph");
            model.train(SAMPLE);
        }
    }

    log::info!(
        "vocabulary of {} tokens, {} unigrams",
        model.vocabulary_size(),
        model.total_unigram_count()
    );

    // A fixed seed gives the same samples on every run
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    for i in 0..args.samples {
        let text = model.generate_with_rng(args.max_length, &mut rng);
        if args.samples > 1 {
            println!("{}: {}", i + 1, text);
        } else {
            println!("{}", text);
        }
    }

    Ok(())
}
