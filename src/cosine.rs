// ---------------------------------------------------------------------------
// Vector arithmetic over lexicon-indexed emotion vectors
// ---------------------------------------------------------------------------
//
// Vectors encoded against an older, smaller lexicon are shorter than the
// current dimensionality; every operation here treats missing trailing
// dimensions as zero, so stored vectors survive lexicon growth unchanged.
// Accumulation happens in f64 to keep scores stable across component order.
// ---------------------------------------------------------------------------

/// Dot product over the shared prefix of two vectors. Trailing dimensions
/// present in only one vector contribute nothing.
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
	let len = a.len().min(b.len());
	let mut sum: f64 = 0.0;
	for i in 0..len {
		sum += (a[i] as f64) * (b[i] as f64);
	}
	sum
}

/// Euclidean (L2) norm of a vector.
pub fn magnitude(v: &[f32]) -> f64 {
	let mut sum: f64 = 0.0;
	for &x in v {
		let xf = x as f64;
		sum += xf * xf;
	}
	sum.sqrt()
}

/// Cosine similarity between two unit vectors: the dot product, clamped to
/// [-1, 1] against float drift. Callers uphold the unit-norm invariant.
pub fn unit_cosine(a: &[f32], b: &[f32]) -> f64 {
	dot(a, b).clamp(-1.0, 1.0)
}

/// Scale a vector to unit length in place. Returns false and leaves the
/// vector untouched when its norm is zero.
pub fn normalize_in_place(v: &mut [f32]) -> bool {
	let norm = magnitude(v);
	if norm == 0.0 {
		return false;
	}
	for x in v.iter_mut() {
		*x = ((*x as f64) / norm) as f32;
	}
	true
}

/// Whether every component is finite (no NaN or infinities).
pub fn is_finite_vector(v: &[f32]) -> bool {
	v.iter().all(|x| x.is_finite())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dot_of_orthogonal_vectors_is_zero() {
		let a = vec![1.0f32, 0.0];
		let b = vec![0.0f32, 1.0];
		assert!(dot(&a, &b).abs() < 1e-10);
	}

	#[test]
	fn dot_zero_pads_shorter_vector() {
		// A vector encoded before the lexicon grew from 2 to 4 dimensions
		let old = vec![0.6f32, 0.8];
		let new = vec![0.6f32, 0.8, 0.5, 0.5];
		let expected = 0.6 * 0.6 + 0.8 * 0.8;
		assert!((dot(&old, &new) - expected).abs() < 1e-6);
	}

	#[test]
	fn unit_cosine_of_identical_unit_vectors_is_one() {
		let v = vec![0.6f32, 0.8];
		assert!((unit_cosine(&v, &v) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn unit_cosine_of_opposite_unit_vectors_is_minus_one() {
		let a = vec![1.0f32, 0.0];
		let b = vec![-1.0f32, 0.0];
		assert!((unit_cosine(&a, &b) + 1.0).abs() < 1e-10);
	}

	#[test]
	fn unit_cosine_stays_in_range_despite_drift() {
		// Components that multiply out just past 1.0
		let a = vec![1.0000001f32, 0.0];
		assert!(unit_cosine(&a, &a) <= 1.0);
	}

	#[test]
	fn magnitude_basic() {
		let v = vec![3.0f32, 4.0];
		assert!((magnitude(&v) - 5.0).abs() < 1e-10);
	}

	#[test]
	fn magnitude_empty_is_zero() {
		assert_eq!(magnitude(&[]), 0.0);
	}

	#[test]
	fn normalize_produces_unit_vector() {
		let mut v = vec![3.0f32, 4.0];
		assert!(normalize_in_place(&mut v));
		assert!((magnitude(&v) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn normalize_zero_vector_returns_false() {
		let mut v = vec![0.0f32, 0.0];
		assert!(!normalize_in_place(&mut v));
		assert_eq!(v, vec![0.0, 0.0]);
	}

	#[test]
	fn finite_check_catches_nan_and_infinity() {
		assert!(is_finite_vector(&[0.1, 0.2]));
		assert!(!is_finite_vector(&[0.1, f32::NAN]));
		assert!(!is_finite_vector(&[f32::INFINITY]));
		assert!(is_finite_vector(&[]));
	}
}
