/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the radial kernel catalog and its scaled pairwise evaluations.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::RowRef;
use serde::{Deserialize, Serialize};

/// A user-supplied radial function paired with the minimal polynomial degree
/// its interpolation system requires to stay well posed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CustomKernel {
    /// Radial profile applied to the scaled displacement norm.
    pub phi: fn(f64) -> f64,

    /// Minimal polynomial tail degree for this kernel.
    pub min_degree: usize,
}

/// Radial kernel selector.
///
/// Each kernel maps the norm of a scaled displacement to a scalar and carries
/// the minimal polynomial degree needed to keep the augmented interpolation
/// system well posed. The degree drives the size of the polynomial tail built
/// by the surrogate; see [`RadialKernel::min_degree`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RadialKernel {
    /// Linear kernel with `phi(r) = r`, minimal degree 0.
    Linear,

    /// Cubic kernel with `phi(r) = r^3`, minimal degree 1.
    Cubic,

    /// Multiquadric kernel with `phi(r) = sqrt(r^2 + 1)`, minimal degree 1.
    Multiquadric,

    /// Thin plate spline kernel with `phi(r) = r^2 ln r` and `phi(0) = 0`,
    /// minimal degree 2.
    ThinPlate,

    /// Caller-provided radial function and minimal degree.
    ///
    /// Function pointers cannot be persisted, so saving a model built on a
    /// custom kernel fails with a serialization error.
    #[serde(skip)]
    Custom(CustomKernel),
}

impl RadialKernel {
    /// Evaluates the radial profile at distance `r`.
    ///
    /// Every kernel returns a finite value for any finite `r >= 0`; the thin
    /// plate spline pins the `r = 0` singularity of `r^2 ln r` to zero.
    #[inline(always)]
    pub fn phi(&self, r: f64) -> f64 {
        match self {
            RadialKernel::Linear => r,
            RadialKernel::Cubic => r.powi(3),
            RadialKernel::Multiquadric => (r * r + 1.0).sqrt(),
            RadialKernel::ThinPlate => match r.abs() < f64::EPSILON {
                true => 0.0,
                false => r.powi(2) * r.ln(),
            },
            RadialKernel::Custom(kernel) => (kernel.phi)(r),
        }
    }

    /// Returns the minimal polynomial tail degree for this kernel.
    #[inline(always)]
    pub fn min_degree(&self) -> usize {
        match self {
            RadialKernel::Linear => 0,
            RadialKernel::Cubic => 1,
            RadialKernel::Multiquadric => 1,
            RadialKernel::ThinPlate => 2,
            RadialKernel::Custom(kernel) => kernel.min_degree,
        }
    }

    /// Kernel response for a pair of points, with the displacement divided by
    /// `scale_factor` before the norm is taken.
    #[inline(always)]
    pub(crate) fn evaluate(
        &self,
        target: RowRef<f64>,
        source: RowRef<f64>,
        scale_factor: f64,
    ) -> f64 {
        let r = crate::common::get_distance(target, source) / scale_factor;
        self.phi(r)
    }
}
