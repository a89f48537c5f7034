/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the error taxonomy for surrogate construction, update, and evaluation.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Error types for surrogate fitting and evaluation.

use thiserror::Error;

/// Errors raised while fitting or updating a surrogate.
///
/// Fitting is all-or-nothing: any of these aborts the construct/update call,
/// and an update that fails leaves the surrogate with its previous samples
/// and coefficients.
#[derive(Debug, Error)]
pub enum FitError {
    /// The sample set has differing numbers of points and values.
    #[error("sample count mismatch: {num_points} points but {num_values} values")]
    SampleCountMismatch { num_points: usize, num_values: usize },

    /// No sample points were provided.
    #[error("cannot fit a surrogate on an empty sample set")]
    EmptySampleSet,

    /// An input point's width disagrees with the trained dimensionality.
    #[error("input has {found} coordinates but the surrogate expects {expected}")]
    InputDimensionMismatch { expected: usize, found: usize },

    /// An output's width disagrees with the stored outputs.
    #[error("output has {found} components but the stored outputs have {expected}")]
    OutputDimensionMismatch { expected: usize, found: usize },

    /// A bound pair is inverted, collapsed to zero width, or non-finite.
    #[error(
        "invalid bounds along axis {axis}: lower {lower} must be strictly below upper {upper}"
    )]
    InvalidBounds { axis: usize, lower: f64, upper: f64 },

    /// The displacement scale factor is non-positive or non-finite.
    #[error("scale factor must be a positive finite value, got {scale_factor}")]
    InvalidScaleFactor { scale_factor: f64 },

    /// Two sample locations are indistinguishable to the kernel.
    #[error(
        "sample points {first} and {second} are duplicates: scaled separation {distance:.3e} \
         is below the kernel cutoff {cutoff:.3e}"
    )]
    DuplicatePoints {
        first: usize,
        second: usize,
        distance: f64,
        cutoff: f64,
    },

    /// Fewer samples than polynomial tail columns, so the augmented system
    /// cannot have a unique solution.
    #[error("{num_points} samples cannot support a polynomial tail of {basis_size} columns")]
    InsufficientSamples { num_points: usize, basis_size: usize },

    /// The assembled system is singular or ill-conditioned.
    #[error("interpolation system is singular or ill-conditioned: {detail}")]
    SingularSystem { detail: String },
}

/// Errors raised while evaluating a fitted surrogate.
///
/// No solve happens at evaluation time, so the only failure mode is a query
/// whose shape disagrees with the trained inputs.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The query's width disagrees with the trained dimensionality.
    #[error("query point has {found} coordinates but the surrogate was trained on {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}
