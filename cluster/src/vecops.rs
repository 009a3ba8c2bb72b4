//! L2 normalization and cosine similarity.
//!
//! Accumulation is done in f64 and narrowed to f32 on the way out, so
//! long 1536-d embeddings do not lose precision in the sum of squares.

use crate::error::{ClusterError, Result};

/// Returns the Euclidean norm of `v`.
pub fn norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt()
}

/// Returns `v / ||v||`.
///
/// Fails with [`ClusterError::DegenerateVector`] when the norm is zero (or
/// not finite), so a zero vector can never slip into similarity math as if
/// it had a direction.
pub fn normalize(v: &[f32]) -> Result<Vec<f32>> {
    let mut out = v.to_vec();
    normalize_in_place(&mut out)?;
    Ok(out)
}

/// Normalizes `v` to unit length in place.
pub fn normalize_in_place(v: &mut [f32]) -> Result<()> {
    let n = norm(v);
    if n == 0.0 || !n.is_finite() {
        return Err(ClusterError::DegenerateVector);
    }
    let scale = 1.0 / n;
    for x in v.iter_mut() {
        *x = ((*x as f64) * scale) as f32;
    }
    Ok(())
}

/// Cosine similarity of two unit vectors, i.e. their dot product.
///
/// Both inputs must already be normalized and of equal length. Neither is
/// re-checked here beyond a debug assertion; use [`checked_cosine`] at
/// boundaries where the dimensionality is not yet trusted.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "cosine: dimension mismatch");
    dot(a, b) as f32
}

/// Like [`cosine`] but rejects mismatched dimensionality.
pub fn checked_cosine(a: &[f32], b: &[f32]) -> Result<f32> {
    ensure_dim(b, a.len())?;
    Ok(cosine(a, b))
}

/// Returns an error unless `v` has exactly `dim` components.
pub fn ensure_dim(v: &[f32], dim: usize) -> Result<()> {
    if v.len() != dim {
        return Err(ClusterError::DimensionMismatch {
            expected: dim,
            got: v.len(),
        });
    }
    Ok(())
}

pub(crate) fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x as f64) * (y as f64))
        .sum()
}

/// Squared Euclidean distance.
pub(crate) fn sq_dist(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = (x as f64) - (y as f64);
            d * d
        })
        .sum()
}
