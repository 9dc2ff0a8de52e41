//! Similarity scoring.

/// Cosine similarity in `[-1, 1]`. Higher is more similar.
///
/// Zero vectors have no direction and score 0 against everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    // Accumulate in f64: squared f32 components overflow f32 around 1e19.
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f64::EPSILON {
        return 0.0;
    }
    // Clamp to handle floating point error
    (dot / denom).clamp(-1.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_directions_score_one() {
        let score = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn large_magnitudes_do_not_overflow() {
        let same = cosine_similarity(&[1e20, 1e20], &[1e20, 1e20]);
        assert!((same - 1.0).abs() < 1e-6);

        let orthogonal = cosine_similarity(&[1e20, 1e20], &[1e20, -1e20]);
        assert!(orthogonal.abs() < 1e-6);

        let extreme = cosine_similarity(&[f32::MAX, f32::MAX], &[f32::MAX, 0.0]);
        assert!(extreme.is_finite());
    }
}
