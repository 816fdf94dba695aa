use ndarray::Array1;

/// Scales `vec` to unit euclidean length. Vectors with no mass stay zero.
pub(crate) fn normalize_vector(vec: &Array1<f32>) -> Array1<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if norm > 1e-10 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

/// Scales `vec` so its absolute values sum to one.
pub(crate) fn l1_normalize_vector(vec: &Array1<f32>) -> Array1<f32> {
    let norm: f32 = vec.iter().map(|x| x.abs()).sum();
    if norm > 1e-10 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_l2_normalization() {
        let v = normalize_vector(&array![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let v = normalize_vector(&Array1::zeros(3));
        assert!(v.iter().all(|&x| x == 0.0));
        let v = l1_normalize_vector(&Array1::zeros(3));
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_l1_normalization() {
        let v = l1_normalize_vector(&array![1.0, -3.0]);
        assert!((v[0] - 0.25).abs() < 1e-6);
        assert!((v[1] + 0.75).abs() < 1e-6);
    }
}
