/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides benchmark test functions for validating and demonstrating surrogate accuracy.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Benchmark functions used to generate sample values in tests and demos.

use faer::Mat;

/// Struct that implements benchmark functions to generate values for testing
/// surrogate interpolation quality.
pub struct RbfTestFunctions;

impl RbfTestFunctions {
    /// Franke's two-dimensional test function: a standard scattered-data
    /// interpolation benchmark mixing two peaks, a ridge, and a dip over
    /// the unit square.
    pub fn franke_2d(points: &Mat<f64>) -> Mat<f64> {
        assert_eq!(points.ncols(), 2);

        Mat::from_fn(points.nrows(), 1, |i, _| {
            let nx = 9.0 * points[(i, 0)];
            let ny = 9.0 * points[(i, 1)];

            let term1 = 0.75 * (-((nx - 2.0).powi(2) + (ny - 2.0).powi(2)) / 4.0).exp();
            let term2 = 0.75 * (-(nx + 1.0).powi(2) / 49.0 - (ny + 1.0).powi(2) / 10.0).exp();
            let term3 = 0.5 * (-((nx - 7.0).powi(2) + (ny - 3.0).powi(2)) / 4.0).exp();
            let term4 = -0.2 * (-(nx - 4.0).powi(2) - (ny - 7.0).powi(2)).exp();

            term1 + term2 + term3 + term4
        })
    }

    /// Smooth n-dimensional bowl `f(x) = sum_i x_i^2`, usable at any input
    /// dimensionality.
    pub fn bowl_nd(points: &Mat<f64>) -> Mat<f64> {
        Mat::from_fn(points.nrows(), 1, |i, _| {
            points.row(i).iter().map(|x| x * x).sum()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn franke_matches_a_known_value() {
        let points = mat![[0.0, 0.0]];
        let values = RbfTestFunctions::franke_2d(&points);

        // Sum of the four terms at the origin.
        let expected = 0.75 * (-2.0_f64).exp()
            + 0.75 * (-1.0 / 49.0 - 1.0_f64 / 10.0).exp()
            + 0.5 * (-58.0 / 4.0_f64).exp()
            - 0.2 * (-65.0_f64).exp();

        assert!((values[(0, 0)] - expected).abs() < 1E-12);
    }

    #[test]
    fn bowl_sums_squares_in_any_dimension() {
        let points = mat![[1.0, 2.0, 3.0]];
        let values = RbfTestFunctions::bowl_nd(&points);
        assert_eq!(values[(0, 0)], 14.0);
    }
}
