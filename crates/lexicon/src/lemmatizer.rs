//! Rule-based English lemmatization.
//!
//! Lemmas are derived in three steps:
//!
//! 1. lowercase the surface form,
//! 2. look it up in the exception table (irregular verbs, Latin plurals),
//! 3. keep the lowercased form when the [`Vocabulary`] already knows it,
//! 4. otherwise try the suffix rules in order and accept the first candidate
//!    the vocabulary knows.
//!
//! When nothing matches the lowercased form itself is the lemma. Known words
//! are never rewritten, so `thing` stays `thing` and `species` stays
//! `species` even when `the` and `specie` are in the model.
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};

use crate::error::LexiconError;

/// Anything that can answer "is this word known?".
///
/// The embedding model implements this so lemmatization and vocabulary
/// filtering agree on the same word list.
pub trait Vocabulary {
    fn contains_word(&self, word: &str) -> bool;
}

impl<S: std::hash::BuildHasher> Vocabulary for HashSet<String, S> {
    fn contains_word(&self, word: &str) -> bool {
        self.contains(word)
    }
}

impl<V: Vocabulary + ?Sized> Vocabulary for &V {
    fn contains_word(&self, word: &str) -> bool {
        (**self).contains_word(word)
    }
}

/// Minimum length of a rule-produced stem, in characters.
const MIN_STEM_CHARS: usize = 2;

/// Minimum stem length for the `ing`/`ed`/`er`/`est` rules.
const MIN_INFLECTED_STEM_CHARS: usize = 3;

/// Suffix rewrite rules as `(suffix, replacement, min stem chars)`, tried in
/// order: noun, verb, then adjective rules.
const SUFFIX_RULES: &[(&str, &str, usize)] = &[
    // nouns
    ("s", "", MIN_STEM_CHARS),
    ("ses", "s", MIN_STEM_CHARS),
    ("ves", "f", MIN_STEM_CHARS),
    ("xes", "x", MIN_STEM_CHARS),
    ("zes", "z", MIN_STEM_CHARS),
    ("ches", "ch", MIN_STEM_CHARS),
    ("shes", "sh", MIN_STEM_CHARS),
    ("men", "man", MIN_STEM_CHARS),
    ("ies", "y", MIN_STEM_CHARS),
    // verbs
    ("es", "e", MIN_STEM_CHARS),
    ("es", "", MIN_STEM_CHARS),
    ("ed", "e", MIN_INFLECTED_STEM_CHARS),
    ("ed", "", MIN_INFLECTED_STEM_CHARS),
    ("ing", "e", MIN_INFLECTED_STEM_CHARS),
    ("ing", "", MIN_INFLECTED_STEM_CHARS),
    // adjectives
    ("er", "", MIN_INFLECTED_STEM_CHARS),
    ("est", "", MIN_INFLECTED_STEM_CHARS),
    ("er", "e", MIN_INFLECTED_STEM_CHARS),
    ("est", "e", MIN_INFLECTED_STEM_CHARS),
];

/// Irregular forms that no suffix rule recovers.
const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("went", "go"),
    ("gone", "go"),
    ("made", "make"),
    ("found", "find"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("saw", "see"),
    ("seen", "see"),
    ("knew", "know"),
    ("known", "know"),
    ("led", "lead"),
    ("began", "begin"),
    ("begun", "begin"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("thought", "think"),
    ("brought", "bring"),
    ("held", "hold"),
    ("kept", "keep"),
    ("ran", "run"),
    ("wrote", "write"),
    ("written", "write"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("children", "child"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("analyses", "analysis"),
    ("hypotheses", "hypothesis"),
    ("syntheses", "synthesis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("spectra", "spectrum"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("bacteria", "bacterium"),
    ("fungi", "fungus"),
    ("nuclei", "nucleus"),
    ("loci", "locus"),
    ("stimuli", "stimulus"),
    ("larvae", "larva"),
    ("mitochondria", "mitochondrion"),
];

/// English lemmatizer: exception table plus vocabulary-gated suffix rules.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: FxHashMap<String, String>,
    lowercase: bool,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Lemmatizer {
    /// Built-in English exception table.
    pub fn english() -> Self {
        let exceptions = IRREGULAR
            .iter()
            .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
            .collect();
        Self {
            exceptions,
            lowercase: true,
        }
    }

    /// Keeps the original casing when no rule or exception applies.
    pub fn preserve_case(mut self) -> Self {
        self.lowercase = false;
        self
    }

    /// Merges `{form: lemma}` entries over the current exception table.
    pub fn with_lookup<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (form, lemma) in entries {
            self.exceptions
                .insert(form.into().to_lowercase(), lemma.into());
        }
        self
    }

    /// Reads a JSON object of `{form: lemma}` pairs and merges it.
    pub fn with_lookup_file(self, path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| LexiconError::LookupTable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(self.with_lookup(table))
    }

    /// Number of entries in the exception table.
    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    /// Returns the lemma of `word`.
    pub fn lemmatize<V: Vocabulary + ?Sized>(&self, word: &str, vocab: &V) -> String {
        let lower = word.to_lowercase();
        if let Some(lemma) = self.exceptions.get(&lower) {
            return lemma.clone();
        }
        if vocab.contains_word(&lower) {
            return lower;
        }

        let mut tried = FxHashSet::default();
        for &(suffix, replacement, min_stem) in SUFFIX_RULES {
            let Some(stem) = lower.strip_suffix(suffix) else {
                continue;
            };
            if stem.chars().count() < min_stem {
                continue;
            }
            let candidate = format!("{stem}{replacement}");
            if candidate == lower || !tried.insert(candidate.clone()) {
                continue;
            }
            if vocab.contains_word(&candidate) {
                return candidate;
            }
        }

        if self.lowercase {
            lower
        } else {
            word.to_string()
        }
    }
}
