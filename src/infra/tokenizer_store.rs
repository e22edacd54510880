// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Persists the fitted vocabulary so every run over the same
// corpus uses identical token indices.
//
//   <store_dir>/tokenizer.json   ← HuggingFace WordLevel tokenizer
//
// load_or_fit:
//   tokenizer.json exists → load it
//   otherwise             → fit over one corpus pass, save, return
//
// Fitting reads the whole corpus once; loading is instant, so
// repeated batch runs should always go through the store.

use std::{fs, path::PathBuf};
use tokenizers::Tokenizer;

use crate::data::vocabulary::Vocabulary;
use crate::domain::DocumentSource;
use crate::error::{PipelineError, PipelineResult};

/// File name of the persisted tokenizer
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Saves and restores the vocabulary in a directory.
pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of the tokenizer file
    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// True if a tokenizer has been saved here before
    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Load an existing vocabulary or fit a new one from `source`
    pub fn load_or_fit<S: DocumentSource + ?Sized>(&self, source: &S) -> PipelineResult<Vocabulary> {
        if self.exists() {
            tracing::info!("Loading existing tokenizer from '{}'", self.path().display());
            self.load()
        } else {
            tracing::info!("No tokenizer in '{}', fitting a new one", self.dir.display());
            self.fit_and_save(source)
        }
    }

    /// Load a previously saved vocabulary
    pub fn load(&self) -> PipelineResult<Vocabulary> {
        let path      = self.path();
        let tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            PipelineError::Tokenizer(format!("cannot load '{}': {e}", path.display()))
        })?;
        Vocabulary::from_tokenizer(tokenizer)
    }

    /// Fit over one pass of `source` and overwrite any saved tokenizer
    pub fn fit_and_save<S: DocumentSource + ?Sized>(&self, source: &S) -> PipelineResult<Vocabulary> {
        let vocab = Vocabulary::fit_source(source)?;
        self.save(&vocab)?;
        Ok(vocab)
    }

    /// Write `vocab` to the store, creating the directory if needed
    pub fn save(&self, vocab: &Vocabulary) -> PipelineResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| PipelineError::io(&self.dir, e))?;

        let path = self.path();
        vocab.tokenizer().save(&path, true).map_err(|e| {
            PipelineError::Tokenizer(format!("cannot write '{}': {e}", path.display()))
        })?;

        tracing::info!(
            "Tokenizer with {} words saved to '{}'",
            vocab.vocab_size(),
            path.display()
        );
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Document, TokenEncoder};

    #[test]
    fn test_fit_then_reload_gives_same_indices() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().join("store"));
        let docs  = vec![Document::new("1", "b a b\n\nc a b")];

        assert!(!store.exists());
        let fitted = store.load_or_fit(&docs).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.vocab_size(), fitted.vocab_size());
        assert_eq!(loaded.encode("a b c").unwrap(), fitted.encode("a b c").unwrap());
        assert_eq!(loaded.index_of("b"), Some(1));
    }

    #[test]
    fn test_existing_tokenizer_is_not_refitted() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        store.load_or_fit(&vec![Document::new("1", "x y")]).unwrap();

        // A different corpus must not change the stored vocabulary
        let vocab = store.load_or_fit(&vec![Document::new("1", "p q r s")]).unwrap();
        assert_eq!(vocab.vocab_size(), 2);
        assert_eq!(vocab.index_of("p"), None);
    }

    #[test]
    fn test_load_without_file_fails() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        assert!(matches!(store.load(), Err(PipelineError::Tokenizer(_))));
    }
}
