// ============================================================
// Layer 4 — Segment Splitter
// ============================================================
// Cuts a document into segments at every run of newlines.
//
//   "a b\n\nc d e\n"  →  ["a b", "c d e"]
//
// Runs of several newlines count as one boundary, so no empty
// segment can appear between them, and a leading or trailing
// newline does not produce one either. Carriage returns and
// other whitespace are left for the tokenizer to deal with.

/// Iterate over the non-empty newline-delimited segments of `text`.
pub fn split_segments(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|segment| !segment.is_empty())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newline_runs_are_one_boundary() {
        let segments: Vec<&str> = split_segments("a b\n\n\nc d e").collect();
        assert_eq!(segments, vec!["a b", "c d e"]);
    }

    #[test]
    fn test_edges_produce_no_empty_segments() {
        let segments: Vec<&str> = split_segments("\n\nx\n").collect();
        assert_eq!(segments, vec!["x"]);
    }

    #[test]
    fn test_text_without_newlines_is_one_segment() {
        let segments: Vec<&str> = split_segments("just one line").collect();
        assert_eq!(segments, vec!["just one line"]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(split_segments("").count(), 0);
        assert_eq!(split_segments("\n\n").count(), 0);
    }
}
