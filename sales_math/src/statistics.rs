//! Fit statistics over whole slices

use crate::{MathError, Result};

/// Root mean square of the pairwise differences `actual - fitted`
pub fn residual_rms(actual: &[f64], fitted: &[f64]) -> Result<f64> {
    if actual.len() != fitted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match fitted length ({})",
            actual.len(),
            fitted.len()
        )));
    }
    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "No residuals to measure".to_string(),
        ));
    }

    let sum_sq: f64 = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).powi(2))
        .sum();

    Ok((sum_sq / actual.len() as f64).sqrt())
}
