//! Synthetic fixtures shared by the benchmarks.

#![allow(dead_code)]

use std::sync::Arc;

use papervec::{Lexicon, Vectorizer, WordVectors};

/// Dimension of the production word model.
pub const DIM: usize = 300;

/// Prose whose lemmas all appear in [`model_words`].
pub const SAMPLE_PARAGRAPH: &str = "Cells divide rapidly when membrane proteins bind growth \
factors. The binding signal activates kinase cascades that regulate gene expression, protein \
synthesis and cell migration. Mutant receptors bind ligands weakly and cells fail to divide.";

/// Vocabulary covering [`SAMPLE_PARAGRAPH`] plus filler words.
pub fn model_words(extra: usize) -> Vec<String> {
    let mut words: Vec<String> = [
        "cell", "divide", "rapidly", "membrane", "protein", "bind", "growth", "factor", "binding",
        "signal", "activate", "kinase", "cascade", "regulate", "gene", "expression", "synthesis",
        "migration", "mutant", "receptor", "ligand", "weakly", "fail",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect();
    words.extend((0..extra).map(|i| format!("term{i}")));
    words
}

/// Deterministic pseudo-random vector in `[-0.5, 0.5)`.
pub fn seeded_vector(seed: u64, dim: usize) -> Vec<f64> {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    (0..dim)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5
        })
        .collect()
}

/// Vectorizer over a synthetic `DIM`-wide model with `extra` filler words.
pub fn vectorizer(extra: usize) -> Vectorizer {
    let entries = model_words(extra)
        .into_iter()
        .enumerate()
        .map(|(i, word)| {
            let vector = seeded_vector(i as u64, DIM)
                .into_iter()
                .map(|v| v as f32)
                .collect();
            (word, vector)
        });
    let vectors = WordVectors::from_entries(DIM, entries).expect("synthetic model");
    Vectorizer::new(Arc::new(vectors), Arc::new(Lexicon::default()))
}

/// `SAMPLE_PARAGRAPH` repeated until it holds at least `words` words.
pub fn text_of_len(words: usize) -> String {
    let per = SAMPLE_PARAGRAPH.split_whitespace().count();
    let repeats = words.div_ceil(per).max(1);
    vec![SAMPLE_PARAGRAPH; repeats].join(" ")
}
