use std::{env, error::Error, path::PathBuf};

use lexicon::LexiconConfig;
use semantic::{SemanticConfig, Vectorizer};

/// Usage: `cargo run -p papervec-semantic --example embed -- <word_model.wv> "some text"`
fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let model = args
        .next()
        .map(PathBuf::from)
        .ok_or("usage: embed <word_model.wv> [text]")?;
    let text = args
        .next()
        .unwrap_or_else(|| "Cells divide when membrane proteins bind.".into());

    let cfg = SemanticConfig {
        word_vectors_path: model,
        ..SemanticConfig::default()
    };
    let vectorizer = Vectorizer::from_config(&cfg, &LexiconConfig::default())?;

    println!("model dim: {}", vectorizer.dim());
    println!("valid lemmas: {:?}", vectorizer.valid_lemmas(&text));

    let embedding = vectorizer.vectorize(&text)?;
    let values = embedding.to_vec();
    println!("tokens: {}", embedding.token_count);
    println!("first values: {:?}", &values[..values.len().min(8)]);

    Ok(())
}
