// ============================================================
// Layer 3 — InputOutputPair Domain Type
// ============================================================
// A training example for next-word prediction.
//
// Every encoded segment of n tokens yields n-1 pairs, one per
// prefix length:
//
//   Segment: "c d e"  →  [3, 4, 5]
//   Pair 1:  [3, 4]      prefix [3]     target 4
//   Pair 2:  [3, 4, 5]   prefix [3, 4]  target 5
//
// The pair is stored as a single token run; the last token is
// the target and everything before it is the prefix. This is
// exactly the row shape the padder consumes.

use serde::{Deserialize, Serialize};

/// A token sequence of length ≥ 2 whose last element is the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOutputPair {
    tokens: Vec<u32>,
}

impl InputOutputPair {
    /// Build a pair from a token run.
    /// Returns None if the run is too short to hold a prefix and a target.
    pub fn new(tokens: Vec<u32>) -> Option<Self> {
        if tokens.len() < 2 {
            return None;
        }
        Some(Self { tokens })
    }

    /// The conditioning prefix (all but the last token)
    pub fn prefix(&self) -> &[u32] {
        &self.tokens[..self.tokens.len() - 1]
    }

    /// The token to predict
    pub fn target(&self) -> u32 {
        self.tokens[self.tokens.len() - 1]
    }

    /// Prefix followed by target
    pub fn tokens(&self) -> &[u32] {
        &self.tokens
    }

    /// Total number of tokens (prefix length + 1)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false — a pair holds at least two tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl AsRef<[u32]> for InputOutputPair {
    fn as_ref(&self) -> &[u32] {
        &self.tokens
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_target() {
        let pair = InputOutputPair::new(vec![3, 4, 5]).unwrap();
        assert_eq!(pair.prefix(), &[3, 4]);
        assert_eq!(pair.target(), 5);
        assert_eq!(pair.len(), 3);
    }

    #[test]
    fn test_single_token_is_not_a_pair() {
        assert!(InputOutputPair::new(vec![1]).is_none());
        assert!(InputOutputPair::new(Vec::new()).is_none());
    }
}
