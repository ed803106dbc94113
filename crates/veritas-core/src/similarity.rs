//! Vector helpers for inner-product retrieval.
//!
//! Query and indexed vectors are unit length, so the inner product computed by
//! the index equals cosine similarity.

/// Inner product of two equal-length slices.
///
/// Panics if slices have different lengths; callers check dimensions first.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(
        a.len(),
        b.len(),
        "vector dimension mismatch: {} vs {}",
        a.len(),
        b.len()
    );
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale `v` to unit L2 norm in place. Zero vectors are left unchanged.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_vectors_dot_is_cosine() {
        let mut a = vec![3.0, 4.0, 0.0];
        let mut b = vec![0.0, 4.0, 3.0];
        l2_normalize(&mut a);
        l2_normalize(&mut b);
        assert!((dot(&a, &b) - 0.64).abs() < 1e-6);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_untouched() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn opposite_unit_vectors() {
        let mut a = vec![1.0, 2.0, 3.0];
        let mut b = vec![-1.0, -2.0, -3.0];
        l2_normalize(&mut a);
        l2_normalize(&mut b);
        let sim = dot(&a, &b);
        assert!((sim + 1.0).abs() < 1e-6, "got {}", sim);
    }

    #[test]
    #[should_panic(expected = "vector dimension mismatch")]
    fn dimension_mismatch() {
        dot(&[1.0, 2.0], &[1.0, 2.0, 3.0]);
    }
}
