use crate::EmbeddingError;

/// In-place L2 normalization. Zero vectors are left untouched.
pub fn l2_normalize_in_place(v: &mut [f32]) {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if norm_sq > 0.0 {
        let inv_norm = norm_sq.sqrt().recip();
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
}

/// Reject vectors the ranker cannot score.
pub(crate) fn validate_vector(v: &[f32]) -> Result<(), EmbeddingError> {
    if v.is_empty() {
        return Err(EmbeddingError::Inference("model returned an empty vector".into()));
    }
    if let Some(idx) = v.iter().position(|x| !x.is_finite()) {
        return Err(EmbeddingError::Inference(format!(
            "model returned a non-finite value at index {idx}"
        )));
    }
    Ok(())
}
