/////////////////////////////////////////////////////////////////////////////////////////////
//
// Evaluates the polynomial tail bases appended to the kernel interpolation system.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;
use serde::{Deserialize, Serialize};

use crate::domain::DomainBounds;

/// Ordered polynomial tail attached to the kernel block.
///
/// 1-D surrogates use Chebyshev polynomials rescaled onto the domain; higher
/// dimensions use centered monomials of bounded total degree. Either way the
/// tail is a fixed, ordered list of functions whose values fill the border
/// blocks of the augmented system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) enum PolynomialTail {
    /// Chebyshev polynomials `T_0 .. T_{size-1}` mapped onto `[lower, upper]`.
    Chebyshev { size: usize },

    /// Centered monomials, one multi-index per column.
    Monomial { exponents: Vec<Vec<u32>> },
}

impl PolynomialTail {
    /// Builds the tail for the given dimensionality and polynomial degree.
    ///
    /// Degree 0 yields the single constant function for any dimensionality,
    /// so pure kernel interpolation still carries one constant column.
    pub fn new(dimensions: usize, degree: usize) -> Self {
        match dimensions {
            1 => PolynomialTail::Chebyshev {
                size: degree.max(1),
            },
            _ => PolynomialTail::Monomial {
                exponents: monomial_exponents(dimensions, degree),
            },
        }
    }

    /// Number of tail columns in the augmented system.
    pub fn size(&self) -> usize {
        match self {
            PolynomialTail::Chebyshev { size } => *size,
            PolynomialTail::Monomial { exponents } => exponents.len(),
        }
    }

    /// Evaluates every tail function at every point, returning an
    /// `n x size` basis matrix.
    pub fn evaluate(&self, points: &Mat<f64>, bounds: &DomainBounds) -> Mat<f64> {
        match self {
            PolynomialTail::Chebyshev { size } => {
                let lower = bounds.lower()[0];
                let upper = bounds.upper()[0];
                let n = points.nrows();

                let mut basis = Mat::<f64>::zeros(n, *size);

                for i in 0..n {
                    let t = -1.0 + 2.0 * (points[(i, 0)] - lower) / (upper - lower);

                    // Three-term recurrence; identical to cos(k acos t) on
                    // the domain and stays finite outside it.
                    let mut prev = 1.0;
                    let mut curr = t;
                    for k in 0..*size {
                        if k == 0 {
                            basis[(i, k)] = 1.0;
                        } else {
                            basis[(i, k)] = curr;
                            let next = 2.0 * t * curr - prev;
                            prev = curr;
                            curr = next;
                        }
                    }
                }

                basis
            }
            PolynomialTail::Monomial { exponents } => {
                let center = bounds.center();
                let normalizer = bounds.mean_half_diameter();
                let n = points.nrows();

                Mat::from_fn(n, exponents.len(), |i, j| {
                    exponents[j]
                        .iter()
                        .enumerate()
                        .fold(1.0, |term, (axis, &power)| {
                            let z = (points[(i, axis)] - center[axis]) / normalizer;
                            term * z.powi(power as i32)
                        })
                })
            }
        }
    }
}

/// Multi-indices of total degree <= `degree` in `dimensions` variables.
///
/// Graded order: ascending total degree, and within a grade the leading axes
/// carry the higher exponents first, so degree 2 in two variables reads
/// `1, x, y, x^2, x*y, y^2`. The count is `C(degree + dimensions, degree)`.
fn monomial_exponents(dimensions: usize, degree: usize) -> Vec<Vec<u32>> {
    let mut exponents = Vec::new();
    let mut scratch = vec![0u32; dimensions];

    for total in 0..=degree as u32 {
        push_grade(total, 0, &mut scratch, &mut exponents);
    }

    exponents
}

fn push_grade(remaining: u32, axis: usize, scratch: &mut Vec<u32>, out: &mut Vec<Vec<u32>>) {
    if axis + 1 == scratch.len() {
        scratch[axis] = remaining;
        out.push(scratch.clone());
        return;
    }

    for power in (0..=remaining).rev() {
        scratch[axis] = power;
        push_grade(remaining - power, axis + 1, scratch, out);
    }
}
