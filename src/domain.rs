/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines validated domain bounds used to center and scale the polynomial tail.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Axis-aligned bounds of the modelled domain.

use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// Validated lower/upper bounds of the modelled domain.
///
/// Bounds only influence the polynomial tail: higher-dimensional monomials
/// are centered on the box midpoint and normalized by the mean half-diameter,
/// and the 1-D Chebyshev basis is rescaled onto `[lower, upper]`. The kernel
/// block never sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainBounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl DomainBounds {
    /// Creates bounds after checking that both vectors have equal, nonzero
    /// length and that every pair is finite with `lower < upper`.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, FitError> {
        if lower.len() != upper.len() || lower.is_empty() {
            return Err(FitError::InputDimensionMismatch {
                expected: lower.len().max(1),
                found: upper.len(),
            });
        }

        for (axis, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(FitError::InvalidBounds {
                    axis,
                    lower: lo,
                    upper: hi,
                });
            }
        }

        Ok(Self { lower, upper })
    }

    /// Convenience constructor for 1-D domains.
    pub fn scalar(lower: f64, upper: f64) -> Result<Self, FitError> {
        Self::new(vec![lower], vec![upper])
    }

    /// Number of input dimensions.
    pub fn dimensions(&self) -> usize {
        self.lower.len()
    }

    /// Lower bound per axis.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bound per axis.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Midpoint of the box along each axis.
    pub(crate) fn center(&self) -> Vec<f64> {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(lo, hi)| (lo + hi) / 2.0)
            .collect()
    }

    /// Mean of the per-axis half-widths; the monomial normalizer.
    pub(crate) fn mean_half_diameter(&self) -> f64 {
        let total: f64 = self
            .lower
            .iter()
            .zip(&self.upper)
            .map(|(lo, hi)| (hi - lo) / 2.0)
            .sum();
        total / self.dimensions() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strictly_increasing_bounds() {
        let bounds = DomainBounds::new(vec![0.0, -1.0], vec![1.0, 1.0]).unwrap();
        assert_eq!(bounds.dimensions(), 2);
        assert_eq!(bounds.center(), vec![0.5, 0.0]);
        assert_eq!(bounds.mean_half_diameter(), 0.75);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = DomainBounds::scalar(4.0, 1.0).unwrap_err();
        assert!(matches!(err, FitError::InvalidBounds { axis: 0, .. }));
    }

    #[test]
    fn rejects_zero_width_axes() {
        let err = DomainBounds::new(vec![0.0, 2.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FitError::InvalidBounds { axis: 1, .. }));
    }

    #[test]
    fn rejects_non_finite_bounds() {
        let err = DomainBounds::scalar(0.0, f64::INFINITY).unwrap_err();
        assert!(matches!(err, FitError::InvalidBounds { .. }));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = DomainBounds::new(vec![0.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FitError::InputDimensionMismatch { .. }));
    }
}
