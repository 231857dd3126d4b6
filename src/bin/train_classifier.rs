use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;

use finsmart_rs::{TrainedClassifier, load_corpus_csv};

/// A utility for training the fallback classifier used by the finsmart_rs server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the trained classifier to, e.g. 'classifier.json'.
    #[arg(long, short)]
    output_path: PathBuf,

    /// A CSV file with the header 'description,category' to train on.
    ///
    /// The built-in corpus is used when this is not given.
    #[arg(long, short)]
    corpus: Option<PathBuf>,
}

/// Train the classifier and write it to disk as JSON.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'classifier.json').");
            exit(1);
        }
    }

    let classifier = match &args.corpus {
        Some(corpus_path) => {
            println!("Reading training corpus from {corpus_path:#?}");
            let samples = load_corpus_csv(File::open(corpus_path)?)?;
            println!("Training on {} samples...", samples.len());
            TrainedClassifier::train(&samples)?
        }
        None => {
            println!("Training on the built-in corpus...");
            TrainedClassifier::train_default()?
        }
    };

    println!("Learned labels {:?}", classifier.labels());

    classifier.save(output_path)?;

    println!("Saved classifier to {output_path:#?}");

    Ok(())
}
