// ============================================================
// Layer 6 — Memory Estimator
// ============================================================
// Answers "how big would this matrix be?" before it exists,
// and "how big is it?" once it does.
//
//   projected_gib(&[128, 50_001], 8)
//     = 128 × 50_001 × 8 bytes / 2^30
//     ≈ 0.0477 GB
//
// The batcher uses the projection as its guard: the one-hot
// target matrix grows with vocabulary size, and a large
// vocabulary times a large batch can exhaust RAM long before
// the model ever sees it.

use ndarray::{ArrayBase, Data, Dimension};

/// Bytes in one GB (binary, 2^30)
pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert a byte count to GB
pub fn bytes_to_gib(bytes: usize) -> f64 {
    bytes as f64 / BYTES_PER_GIB
}

/// Projected size in GB of a dense array of `shape` with `item_size`-byte elements.
///
/// Monotone and linear in every dimension and in `item_size`.
/// Computed in floating point so huge shapes cannot overflow.
pub fn projected_gib(shape: &[usize], item_size: usize) -> f64 {
    let elements: f64 = shape.iter().map(|&d| d as f64).product();
    elements * item_size as f64 / BYTES_PER_GIB
}

/// Measured footprint of an existing array
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixMemory {
    /// Array header plus element buffer, in GB
    pub object_gib: f64,
    /// Element buffer only, in GB
    pub values_gib: f64,
    /// Bytes per element
    pub item_size: usize,
}

/// Measure an array's memory: header, element buffer and element size.
pub fn matrix_memory<S, D>(matrix: &ArrayBase<S, D>) -> MatrixMemory
where
    S: Data,
    D: Dimension,
{
    let item_size    = std::mem::size_of::<S::Elem>();
    let values_bytes = matrix.len() * item_size;
    let header_bytes = std::mem::size_of_val(matrix);

    MatrixMemory {
        object_gib: bytes_to_gib(header_bytes + values_bytes),
        values_gib: bytes_to_gib(values_bytes),
        item_size,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use proptest::prelude::*;

    #[test]
    fn test_one_gib() {
        assert_relative_eq!(projected_gib(&[1024, 1024, 1024], 1), 1.0);
        assert_relative_eq!(projected_gib(&[128, 1024 * 1024], 8), 1.0);
    }

    #[test]
    fn test_empty_dimension_is_zero() {
        assert_eq!(projected_gib(&[0, 1000], 8), 0.0);
    }

    #[test]
    fn test_matrix_memory_of_f64_matrix() {
        let m   = Array2::<f64>::zeros((1024, 1024));
        let mem = matrix_memory(&m);
        assert_eq!(mem.item_size, 8);
        assert_relative_eq!(mem.values_gib, 8.0 / 1024.0);
        assert!(mem.object_gib > mem.values_gib);
    }

    #[test]
    fn test_bytes_to_gib() {
        assert_relative_eq!(bytes_to_gib(512 * 1024 * 1024), 0.5);
    }

    proptest! {
        #[test]
        fn prop_doubling_a_dimension_doubles_the_estimate(
            rows in 1usize..10_000,
            cols in 1usize..10_000,
            item in 1usize..16,
        ) {
            let base = projected_gib(&[rows, cols], item);
            assert_relative_eq!(projected_gib(&[rows * 2, cols], item), 2.0 * base);
            assert_relative_eq!(projected_gib(&[rows, cols * 2], item), 2.0 * base);
            assert_relative_eq!(projected_gib(&[rows, cols], item * 2), 2.0 * base);
        }

        #[test]
        fn prop_monotone_in_every_argument(
            rows in 1usize..10_000,
            cols in 1usize..10_000,
            item in 1usize..16,
        ) {
            let base = projected_gib(&[rows, cols], item);
            prop_assert!(projected_gib(&[rows + 1, cols], item) > base);
            prop_assert!(projected_gib(&[rows, cols + 1], item) > base);
            prop_assert!(projected_gib(&[rows, cols], item + 1) > base);
        }
    }
}
