// ============================================================
// Layer 4 — Word Vocabulary
// ============================================================
// Maps words to token indices, fitted once over the corpus.
//
// Fitting:
//   - lower-case every word
//   - split on whitespace only; punctuation stays part of the
//     word ("end." and "end" are different words)
//   - count occurrences over the whole corpus
//   - most frequent word gets index 1, then 2, ...
//     ties keep the order in which words were first seen
//
// Index 0 is reserved:
//   - it is the padding index used by the batcher
//   - the one-hot width is therefore vocab_size + 1
//   - it is also the tokenizer's unknown token, so every word
//     missing from the vocabulary encodes to 0 and is then
//     filtered out — unknown words are dropped, not replaced
//
// The mapping is stored as a HuggingFace WordLevel tokenizer
// (Lowercase normalizer + WhitespaceSplit pre-tokenizer) so it
// can be saved to tokenizer.json and reloaded unchanged.

use serde_json::{json, Map, Value};
use std::{collections::HashMap, str::FromStr};
use tokenizers::Tokenizer;

use crate::domain::{Document, DocumentSource, TokenEncoder};
use crate::error::{PipelineError, PipelineResult};

/// Reserved token occupying index 0
pub const PAD_TOKEN: &str = "[PAD]";

/// Index of the reserved token
pub const PAD_ID: u32 = 0;

/// Immutable word ↔ index table backed by a word-level tokenizer.
#[derive(Clone)]
pub struct Vocabulary {
    tokenizer:  Tokenizer,
    vocab_size: usize,
}

impl std::fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vocabulary")
            .field("vocab_size", &self.vocab_size)
            .finish()
    }
}

impl Vocabulary {
    /// Fit a vocabulary over one pass of documents.
    /// The first document error aborts the fit.
    pub fn fit<I>(documents: I) -> PipelineResult<Self>
    where
        I: IntoIterator<Item = PipelineResult<Document>>,
    {
        let mut counter = WordCounter::default();
        let mut doc_count = 0usize;
        for doc in documents {
            counter.add_text(&doc?.text);
            doc_count += 1;
        }

        let words = counter.into_ranked_words();
        tracing::info!(
            "Fitted vocabulary: {} words from {} documents",
            words.len(),
            doc_count
        );
        Self::from_words(words)
    }

    /// Fit a vocabulary over a fresh pass of `source`
    pub fn fit_source<S: DocumentSource + ?Sized>(source: &S) -> PipelineResult<Self> {
        Self::fit(source.documents()?)
    }

    /// Build a vocabulary from words already in index order.
    /// The first word gets index 1; repeated words keep their first index.
    pub fn from_words<I, W>(words: I) -> PipelineResult<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut vocab = Map::new();
        vocab.insert(PAD_TOKEN.to_string(), json!(PAD_ID));

        let mut next_id = PAD_ID + 1;
        for word in words {
            let word = normalize_word(word.as_ref());
            if word.is_empty() || vocab.contains_key(&word) {
                continue;
            }
            vocab.insert(word, json!(next_id));
            next_id += 1;
        }

        let tokenizer = Tokenizer::from_str(&word_level_json(vocab).to_string())
            .map_err(|e| PipelineError::Tokenizer(e.to_string()))?;
        Self::from_tokenizer(tokenizer)
    }

    /// Wrap a tokenizer loaded from disk.
    /// It must reserve index 0 for the padding token.
    pub fn from_tokenizer(tokenizer: Tokenizer) -> PipelineResult<Self> {
        if tokenizer.token_to_id(PAD_TOKEN) != Some(PAD_ID) {
            return Err(PipelineError::Tokenizer(format!(
                "tokenizer does not map '{PAD_TOKEN}' to index {PAD_ID}"
            )));
        }
        let vocab_size = tokenizer.get_vocab_size(false).saturating_sub(1);
        Ok(Self { tokenizer, vocab_size })
    }

    /// Number of real words (index 0 excluded)
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Width of a one-hot target row: every word plus the reserved index
    pub fn num_classes(&self) -> usize {
        self.vocab_size + 1
    }

    /// Index of a word, or None if the word is unknown
    pub fn index_of(&self, word: &str) -> Option<u32> {
        self.tokenizer
            .token_to_id(&normalize_word(word))
            .filter(|&id| id != PAD_ID)
    }

    /// Word stored at an index, or None for 0 and out-of-range indices
    pub fn word_of(&self, index: u32) -> Option<String> {
        if index == PAD_ID {
            return None;
        }
        self.tokenizer.id_to_token(index)
    }

    /// The underlying tokenizer (used for persistence)
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

impl TokenEncoder for Vocabulary {
    fn encode(&self, text: &str) -> PipelineResult<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| PipelineError::Tokenizer(e.to_string()))?;

        Ok(encoding
            .get_ids()
            .iter()
            .copied()
            .filter(|&id| id != PAD_ID)
            .collect())
    }
}

/// Lower-case one character at a time, the way the tokenizer's
/// Lowercase normalizer does. `str::to_lowercase` would turn a
/// word-final 'Σ' into 'ς' and the word could never be encoded.
fn normalize_word(word: &str) -> String {
    word.chars().flat_map(char::to_lowercase).collect()
}

// ─── Word Counting ────────────────────────────────────────────────────────────
/// Frequency table that remembers first-seen order for tie breaking.
#[derive(Default)]
struct WordCounter {
    position: HashMap<String, usize>,
    counts:   Vec<(String, usize)>,
}

impl WordCounter {
    fn add_text(&mut self, text: &str) {
        for word in text.split_whitespace() {
            let word = normalize_word(word);
            match self.position.get(&word) {
                Some(&i) => self.counts[i].1 += 1,
                None => {
                    self.position.insert(word.clone(), self.counts.len());
                    self.counts.push((word, 1));
                }
            }
        }
    }

    /// Words by descending count; sort_by is stable so ties keep first-seen order
    fn into_ranked_words(mut self) -> Vec<String> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.into_iter().map(|(word, _)| word).collect()
    }
}

/// HuggingFace tokenizer JSON for a WordLevel model over `vocab`.
/// The reserved token doubles as the unknown token.
fn word_level_json(vocab: Map<String, Value>) -> Value {
    json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": { "type": "Lowercase" },
        "pre_tokenizer": { "type": "WhitespaceSplit" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": PAD_TOKEN
        }
    })
}
