//! Reduction of raw per-element result fields to summary scalars
//!
//! The solver hands back one value per mesh element (or node); a reduction
//! collapses that array into the single number a sweep row records.

use serde::{Deserialize, Serialize};

/// How a raw result field is collapsed to one scalar per sweep point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    /// Largest element value (the usual choice for stress and displacement)
    #[default]
    Max,
    /// Smallest element value
    Min,
    /// Arithmetic mean over all elements
    Mean,
}

impl Reduction {
    /// Apply the reduction. Returns `None` for an empty field array;
    /// the caller turns that into a [`ReductionError`](crate::error::ReductionError)
    /// with the field name attached.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let reduced = match self {
            Reduction::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Reduction::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Reduction::Mean => values.iter().sum::<f64>() / values.len() as f64,
        };
        Some(reduced)
    }

    /// Short label used in column headers ("Max", "Min", "Mean")
    pub fn label(&self) -> &'static str {
        match self {
            Reduction::Max => "Max",
            Reduction::Min => "Min",
            Reduction::Mean => "Mean",
        }
    }
}
