// ============================================================
// Layer 4 — Input-Output Pair Generator
// ============================================================
// Streams next-word training examples out of a corpus.
//
// For every document, in source order:
//   split into segments at newline runs
//   for every segment, in text order:
//     encode to token indices (unknown words vanish)
//     for i in 1..len:
//       emit encoded[0..=i]
//
// Example (vocabulary a:1 … g:7):
//   "a b\n\nc d e"  →  [1,2]  [3,4]  [3,4,5]
//   "f g"           →  [6,7]
//
// A segment that encodes to fewer than two tokens emits
// nothing. The iterator is lazy: one document's segments are
// held in memory at a time, and a new pass is started by
// building a new generator from the same source.

use serde::Serialize;

use crate::data::segmenter::split_segments;
use crate::domain::{DocumentIter, DocumentSource, InputOutputPair, TokenEncoder};
use crate::error::PipelineResult;

/// Lazy stream of pairs over one pass of a DocumentSource.
///
/// Yields each source or encoder error once, then ends.
pub struct InputOutputPairs<'a, E> {
    /// None once the pass is finished or has failed
    documents: Option<DocumentIter<'a>>,
    encoder:   E,
    /// Remaining segments of the current document
    segments:  std::vec::IntoIter<String>,
    /// Token indices of the current segment
    encoded:   Vec<u32>,
    /// Last index of the next pair to emit from `encoded`
    next_end:  usize,
}

impl<'a, E: TokenEncoder> InputOutputPairs<'a, E> {
    /// Start a new pass over `source`.
    pub fn new<S: DocumentSource + ?Sized>(source: &'a S, encoder: E) -> PipelineResult<Self> {
        Ok(Self {
            documents: Some(source.documents()?),
            encoder,
            segments:  Vec::new().into_iter(),
            encoded:   Vec::new(),
            next_end:  0,
        })
    }

    fn finish(&mut self) {
        self.documents = None;
        self.segments  = Vec::new().into_iter();
        self.encoded.clear();
    }
}

impl<E: TokenEncoder> Iterator for InputOutputPairs<'_, E> {
    type Item = PipelineResult<InputOutputPair>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // ── Pending prefixes of the current segment ───────────────────────
            if self.next_end < self.encoded.len() {
                let tokens = self.encoded[..=self.next_end].to_vec();
                self.next_end += 1;
                if let Some(pair) = InputOutputPair::new(tokens) {
                    return Some(Ok(pair));
                }
                continue;
            }

            // ── Next segment of the current document ──────────────────────────
            if let Some(segment) = self.segments.next() {
                match self.encoder.encode(&segment) {
                    Ok(ids) => {
                        self.encoded  = ids;
                        self.next_end = 1;
                    }
                    Err(e) => {
                        self.finish();
                        return Some(Err(e));
                    }
                }
                continue;
            }

            // ── Next document ─────────────────────────────────────────────────
            let documents = self.documents.as_mut()?;
            match documents.next() {
                Some(Ok(doc)) => {
                    let segments: Vec<String> =
                        split_segments(&doc.text).map(str::to_owned).collect();
                    tracing::trace!(
                        "{}: {} segments",
                        doc.source.display(),
                        segments.len()
                    );
                    self.segments = segments.into_iter();
                }
                Some(Err(e)) => {
                    self.finish();
                    return Some(Err(e));
                }
                None => {
                    self.finish();
                    return None;
                }
            }
        }
    }
}

// ─── Corpus Statistics ────────────────────────────────────────────────────────
/// Counts gathered in one pass without materialising any pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    /// Documents read
    pub documents: usize,
    /// Non-empty segments seen
    pub segments: usize,
    /// Input-output pairs the generator would emit
    pub pairs: usize,
    /// Longest encoded segment, in tokens
    pub max_sequence_length: usize,
}

/// Walk the corpus once and count documents, segments and pairs.
pub fn corpus_stats<S, E>(source: &S, encoder: E) -> PipelineResult<CorpusStats>
where
    S: DocumentSource + ?Sized,
    E: TokenEncoder,
{
    let mut stats = CorpusStats::default();

    for doc in source.documents()? {
        let doc = doc?;
        stats.documents += 1;

        for segment in split_segments(&doc.text) {
            let len = encoder.encode(segment)?.len();
            stats.segments += 1;
            stats.pairs += len.saturating_sub(1);
            stats.max_sequence_length = stats.max_sequence_length.max(len);
        }
    }

    tracing::debug!(
        "Corpus stats: {} documents, {} segments, {} pairs, longest sequence {}",
        stats.documents,
        stats.segments,
        stats.pairs,
        stats.max_sequence_length
    );
    Ok(stats)
}

/// Length in tokens of the longest encoded segment in the corpus
pub fn max_sequence_length<S, E>(source: &S, encoder: E) -> PipelineResult<usize>
where
    S: DocumentSource + ?Sized,
    E: TokenEncoder,
{
    Ok(corpus_stats(source, encoder)?.max_sequence_length)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Document;
    use crate::error::PipelineError;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Single-letter table a:1 … g:7 without going through the tokenizer
    struct Letters(HashMap<String, u32>);

    impl Letters {
        fn new() -> Self {
            Self(
                ["a", "b", "c", "d", "e", "f", "g"]
                    .iter()
                    .enumerate()
                    .map(|(i, w)| (w.to_string(), i as u32 + 1))
                    .collect(),
            )
        }
    }

    impl TokenEncoder for Letters {
        fn encode(&self, text: &str) -> PipelineResult<Vec<u32>> {
            Ok(text.split_whitespace().filter_map(|w| self.0.get(w).copied()).collect())
        }
    }

    fn collect(docs: &[Document]) -> Vec<Vec<u32>> {
        InputOutputPairs::new(docs, Letters::new())
            .unwrap()
            .map(|p| p.unwrap().tokens().to_vec())
            .collect()
    }

    #[test]
    fn test_two_document_scenario() {
        let docs = vec![Document::new("1", "a b\n\nc d e"), Document::new("2", "f g")];
        assert_eq!(
            collect(&docs),
            vec![vec![1, 2], vec![3, 4], vec![3, 4, 5], vec![6, 7]]
        );
    }

    #[test]
    fn test_short_segments_emit_nothing() {
        let docs = vec![Document::new("1", "a\n\nzzz yyy\n\nb c")];
        assert_eq!(collect(&docs), vec![vec![2, 3]]);
    }

    #[test]
    fn test_unknown_words_are_skipped_inside_a_segment() {
        let docs = vec![Document::new("1", "a xx b")];
        assert_eq!(collect(&docs), vec![vec![1, 2]]);
    }

    #[test]
    fn test_error_is_yielded_once_then_stream_ends() {
        struct Failing;
        impl DocumentSource for Failing {
            fn documents(&self) -> PipelineResult<DocumentIter<'_>> {
                Ok(Box::new(
                    vec![
                        Ok(Document::new("1", "a b")),
                        Err(PipelineError::UnknownEncoding("x".to_string())),
                        Ok(Document::new("3", "c d")),
                    ]
                    .into_iter(),
                ))
            }
        }

        let mut pairs = InputOutputPairs::new(&Failing, Letters::new()).unwrap();
        assert!(pairs.next().unwrap().is_ok());
        assert!(pairs.next().unwrap().is_err());
        assert!(pairs.next().is_none());
    }

    #[test]
    fn test_corpus_stats() {
        let docs  = vec![Document::new("1", "a b\n\nc d e"), Document::new("2", "f g\n\nx")];
        let stats = corpus_stats(&docs, Letters::new()).unwrap();
        assert_eq!(
            stats,
            CorpusStats { documents: 2, segments: 4, pairs: 4, max_sequence_length: 3 }
        );
    }

    proptest! {
        #[test]
        fn prop_segment_of_n_tokens_yields_n_minus_one_pairs(
            letters in proptest::collection::vec(0usize..7, 0..20)
        ) {
            let words: Vec<&str> = letters.iter().map(|&i| ["a", "b", "c", "d", "e", "f", "g"][i]).collect();
            let docs  = vec![Document::new("p", words.join(" "))];
            let pairs = collect(&docs);
            let n     = words.len();

            prop_assert_eq!(pairs.len(), n.saturating_sub(1));
            for (i, pair) in pairs.iter().enumerate() {
                // pair i (1-indexed) has prefix length i and target = token i
                prop_assert_eq!(pair.len(), i + 2);
                prop_assert_eq!(pair[i + 1], letters[i + 1] as u32 + 1);
            }
        }
    }
}
