//! Dense vector helpers.

/// `true` when every component is zero (or the vector is empty).
#[inline]
pub fn is_zero(v: &[f32]) -> bool {
    v.iter().all(|x| *x == 0.0)
}

/// L2 norm.
#[inline]
pub fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Canonical unit vector `[1, 0, …, 0]`.
pub fn unit_vector(dim: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    if let Some(first) = v.first_mut() {
        *first = 1.0;
    }
    v
}

/// Replaces a zero-magnitude vector with [`unit_vector`] so cosine stays defined.
pub fn ensure_nonzero(v: Vec<f32>) -> Vec<f32> {
    if is_zero(&v) { unit_vector(v.len()) } else { v }
}

/// Scales to unit length in place; zero vectors are left unchanged.
pub fn l2_normalize(v: &mut [f32]) {
    let n = norm(v);
    if n > 0.0 {
        for x in v.iter_mut() {
            *x /= n;
        }
    }
}

/// Cosine similarity in `[-1, 1]`, computed in f64. Zero when either vector has
/// zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0)
}
