// ============================================================
// Layer 4 — Padding and One-Hot Encoding
// ============================================================
// The two matrix services the batcher relies on.
//
// pad_sequences — ragged token runs → fixed-width matrix
//
//   max_len = 3, padding = Pre, truncating = Pre, value = 0
//     [1, 2]        → [0, 1, 2]
//     [3, 4, 5]     → [3, 4, 5]
//     [6, 7, 8, 9]  → [7, 8, 9]     (oldest token dropped)
//
// to_categorical — class indices → one-hot rows
//
//   num_classes = 4
//     [2, 0]  → [[0, 0, 1, 0],
//                [1, 0, 0, 0]]

use ndarray::Array2;

use crate::error::{PipelineError, PipelineResult};

/// Which end of a sequence receives padding or loses tokens on truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadSide {
    /// Left side — the most recent tokens stay aligned to the right
    Pre,
    /// Right side
    Post,
}

/// Pad or truncate every sequence to exactly `max_len` columns.
pub fn pad_sequences<S: AsRef<[u32]>>(
    sequences:  &[S],
    max_len:    usize,
    padding:    PadSide,
    truncating: PadSide,
    value:      u32,
) -> Array2<u32> {
    let mut matrix = Array2::from_elem((sequences.len(), max_len), value);

    for (row, seq) in sequences.iter().enumerate() {
        let seq = seq.as_ref();

        let kept = if seq.len() > max_len {
            match truncating {
                PadSide::Pre  => &seq[seq.len() - max_len..],
                PadSide::Post => &seq[..max_len],
            }
        } else {
            seq
        };

        let offset = match padding {
            PadSide::Pre  => max_len - kept.len(),
            PadSide::Post => 0,
        };

        for (col, &token) in kept.iter().enumerate() {
            matrix[[row, offset + col]] = token;
        }
    }

    matrix
}

/// One-hot encode class indices into rows of width `num_classes`.
pub fn to_categorical(indices: &[u32], num_classes: usize) -> PipelineResult<Array2<f64>> {
    let mut matrix = Array2::zeros((indices.len(), num_classes));

    for (row, &index) in indices.iter().enumerate() {
        let col = index as usize;
        if col >= num_classes {
            return Err(PipelineError::ClassOutOfRange { index, num_classes });
        }
        matrix[[row, col]] = 1.0;
    }

    Ok(matrix)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_pre_padding_and_pre_truncation() {
        let seqs = vec![vec![1, 2], vec![3, 4, 5], vec![6, 7, 8, 9]];
        let m    = pad_sequences(&seqs, 3, PadSide::Pre, PadSide::Pre, 0);
        assert_eq!(m, arr2(&[[0, 1, 2], [3, 4, 5], [7, 8, 9]]));
    }

    #[test]
    fn test_post_padding_and_post_truncation() {
        let seqs = vec![vec![1, 2], vec![6, 7, 8, 9]];
        let m    = pad_sequences(&seqs, 3, PadSide::Post, PadSide::Post, 0);
        assert_eq!(m, arr2(&[[1, 2, 0], [6, 7, 8]]));
    }

    #[test]
    fn test_custom_pad_value() {
        let seqs = vec![vec![5u32]];
        let m    = pad_sequences(&seqs, 3, PadSide::Pre, PadSide::Pre, 9);
        assert_eq!(m, arr2(&[[9, 9, 5]]));
    }

    #[test]
    fn test_no_sequences() {
        let seqs: Vec<Vec<u32>> = Vec::new();
        let m = pad_sequences(&seqs, 4, PadSide::Pre, PadSide::Pre, 0);
        assert_eq!(m.shape(), &[0, 4]);
    }

    #[test]
    fn test_one_hot_rows() {
        let y = to_categorical(&[2, 0], 4).unwrap();
        assert_eq!(y, arr2(&[[0.0, 0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 0.0]]));
    }

    #[test]
    fn test_one_hot_rejects_out_of_range() {
        let err = to_categorical(&[1, 4], 4).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ClassOutOfRange { index: 4, num_classes: 4 }
        ));
    }
}
