/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for RBF surrogate modelling.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Radial Basis Function (RBF) surrogate models.
//!
//! A surrogate is a cheap approximation of an expensive black-box function,
//! fitted from a finite set of scattered samples so that optimizers and
//! analysts can query predicted values without re-invoking the expensive
//! function. This crate builds **exact-interpolation** RBF surrogates: the
//! fitted model passes through every training sample, by construction.
//!
//! Fitting assembles the classic augmented symmetric system: a kernel block
//! of pairwise radial responses bordered by a polynomial tail that restores
//! well-posedness and reproduces polynomials up to the kernel's minimal
//! degree. The system is solved directly with a shared factorisation across
//! all output columns. New samples are absorbed in place by rebuilding the whole
//! system; the surrogate's public identity never changes.
//!
//! # Features
//! - Linear, cubic, multiquadric, and thin plate spline kernels, plus custom
//!   `(radial function, minimal degree)` pairs
//! - Dimension-generic polynomial tails: rescaled Chebyshev polynomials in
//!   1-D, centered monomials of any total degree in any dimension
//! - Scalar- and vector-valued outputs solved against one factorisation
//! - Dense or sparse system storage behind a single interface
//! - Loud failure on degenerate geometry: duplicate samples, collapsed
//!   bounds, and singular systems are errors, never silent garbage
//! - Versioned JSON model persistence
//! - Built on [`faer`](https://docs.rs/faer/latest/faer/) for linear
//!   algebra, avoiding complex build dependencies
//!
//! # Examples
//!
//! ```
//! use faer::mat;
//! use rbf_surrogate::config::SurrogateSettings;
//! use rbf_surrogate::{DomainBounds, RadialKernel, RbfSurrogate};
//!
//! // Samples of y = 2x on [1, 4]
//! let points = mat![[1.0], [2.0], [3.0], [4.0]];
//! let values = mat![[2.0], [4.0], [6.0], [8.0]];
//!
//! let settings = SurrogateSettings::builder(RadialKernel::Linear).build();
//!
//! let mut surrogate = RbfSurrogate::builder(points, values, DomainBounds::scalar(1.0, 4.0)?)
//!     .settings(settings)
//!     .build()?;
//!
//! let prediction = surrogate.predict(&[2.5])?;
//! assert!((prediction.scalar().unwrap() - 5.0).abs() < 1e-6);
//!
//! // Absorb a new sample; the model is rebuilt and still interpolates.
//! surrogate.add_sample(&[5.0], &[10.0])?;
//! assert!((surrogate.predict(&[5.0])?.scalar().unwrap() - 10.0).abs() < 1e-6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # References
//! 1. Fasshauer, G., 2007. Meshfree Approximation Methods with Matlab.
//!    World Scientific Publishing Co.
//! 2. Buhmann, M. D., 2003. Radial Basis Functions: Theory and
//!    Implementations. Cambridge University Press.
//! 3. Forrester, A., Sobester, A., Keane, A., 2008. Engineering Design via
//!    Surrogate Modelling: A Practical Guide. Wiley.
pub mod config;

pub mod progress;

mod common;

mod domain;

mod error;

mod kernels;

mod linalg;

mod polynomials;

mod rbf;

mod rbf_test_functions;

pub use {
    common::{
        create_evaluation_grid, csv_to_point_arrays, generate_random_points, get_distance,
        point_arrays_to_csv,
    },
    domain::DomainBounds,
    error::{EvalError, FitError},
    kernels::{CustomKernel, RadialKernel},
    rbf::{Coefficients, ModelIOError, Prediction, RbfSurrogate, RbfSurrogateBuilder},
    rbf_test_functions::RbfTestFunctions,
};
