/////////////////////////////////////////////////////////////////////////////////////////////
//
// Assembles and solves the augmented symmetric interpolation system.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # linalg
//!
//! Assembly of the augmented `(n + p) x (n + p)` interpolation system and the
//! storage-mode-specific factorisations used to solve it. The assembler emits
//! a storage-agnostic entry list; dense and sparse backings materialise the
//! same entries and therefore agree to solver tolerance.

use faer::linalg::solvers::{PartialPivLu, Solve};
use faer::sparse::linalg::solvers::{Lu as SparseLu, SymbolicLu};
use faer::sparse::{SparseColMat, Triplet};
use faer::{concat, Mat};

use crate::config::StorageMode;
use crate::domain::DomainBounds;
use crate::error::FitError;
use crate::kernels::RadialKernel;
use crate::polynomials::PolynomialTail;

/// Builds the entry list of the augmented system.
///
/// Layout: `D[i][j] = phi(|x_i - x_j| / scale)` for the kernel block,
/// `D[i][n + t] = D[n + t][i] = basis_t(x_i)` for the polynomial border, and
/// nothing in the trailing `p x p` block, which stays structurally zero. The
/// kernel block walks the upper triangle only; each off-diagonal entry is
/// mirrored, so the logical matrix is symmetric by construction.
pub(crate) fn assemble_entries(
    points: &Mat<f64>,
    kernel: RadialKernel,
    scale_factor: f64,
    tail: &PolynomialTail,
    bounds: &DomainBounds,
) -> Vec<(usize, usize, f64)> {
    let n = points.nrows();
    let p = tail.size();

    let mut entries = Vec::with_capacity(n * n + 2 * n * p);

    for j in 0..n {
        let source = points.row(j);
        for i in 0..=j {
            let value = kernel.evaluate(points.row(i), source, scale_factor);
            entries.push((i, j, value));
            if i != j {
                entries.push((j, i, value));
            }
        }
    }

    let basis = tail.evaluate(points, bounds);
    for i in 0..n {
        for t in 0..p {
            let value = basis[(i, t)];
            entries.push((i, n + t, value));
            entries.push((n + t, i, value));
        }
    }

    entries
}

/// Stacks the stored outputs above the zero rows constraining the tail,
/// producing the `(n + p) x k` right-hand side.
pub(crate) fn assemble_rhs(point_values: &Mat<f64>, basis_size: usize) -> Mat<f64> {
    concat![
        [point_values],
        [Mat::<f64>::zeros(basis_size, point_values.ncols())]
    ]
}

/// Dense or sparse backing for the assembled system.
///
/// The choice is a performance knob only; both variants hold the same
/// logical values.
pub(crate) enum SystemMatrix {
    Dense(Mat<f64>),
    Sparse(SparseColMat<usize, f64>),
}

impl SystemMatrix {
    /// Materialises the entry list in the requested storage mode.
    pub fn from_entries(
        order: usize,
        entries: &[(usize, usize, f64)],
        storage_mode: StorageMode,
    ) -> Self {
        match storage_mode {
            StorageMode::Dense => {
                let mut matrix = Mat::<f64>::zeros(order, order);
                for &(row, col, value) in entries {
                    matrix[(row, col)] = value;
                }
                SystemMatrix::Dense(matrix)
            }
            StorageMode::Sparse => {
                let triplets: Vec<Triplet<usize, usize, f64>> = entries
                    .iter()
                    .map(|&(row, col, value)| Triplet::new(row, col, value))
                    .collect();

                let matrix = SparseColMat::try_new_from_triplets(order, order, &triplets)
                    .expect("assembled entries are in range");

                SystemMatrix::Sparse(matrix)
            }
        }
    }

    /// Factorises the system: partial-pivot LU for dense storage, sparse LU
    /// otherwise.
    pub fn factorize(&self) -> Result<SystemSolver, FitError> {
        match self {
            SystemMatrix::Dense(matrix) => Ok(SystemSolver::Dense(matrix.partial_piv_lu())),
            SystemMatrix::Sparse(matrix) => {
                let symbolic =
                    SymbolicLu::try_new(matrix.symbolic()).map_err(|e| FitError::SingularSystem {
                        detail: format!("sparse symbolic analysis failed: {:?}", e),
                    })?;

                let factor = SparseLu::try_new_with_symbolic(symbolic, matrix.as_ref()).map_err(
                    |e| FitError::SingularSystem {
                        detail: format!("sparse factorisation failed: {:?}", e),
                    },
                )?;

                Ok(SystemSolver::Sparse(factor))
            }
        }
    }
}

/// Factorised system ready to solve against one or more right-hand sides.
///
/// Multi-output surrogates pass all `k` columns at once, so the
/// factorisation cost is shared across outputs.
pub(crate) enum SystemSolver {
    Dense(PartialPivLu<f64>),
    Sparse(SparseLu<usize, f64>),
}

impl SystemSolver {
    pub fn solve(&self, rhs: &Mat<f64>) -> Mat<f64> {
        match self {
            SystemSolver::Dense(factor) => factor.solve(rhs),
            SystemSolver::Sparse(factor) => factor.solve(rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::{mat, utils::approx::*};

    fn dense_system(points: &Mat<f64>, kernel: RadialKernel, degree: usize) -> Mat<f64> {
        let d = points.ncols();
        let bounds = DomainBounds::new(vec![-2.0; d], vec![2.0; d]).unwrap();
        let tail = PolynomialTail::new(d, degree);

        let entries = assemble_entries(points, kernel, 1.0, &tail, &bounds);
        let order = points.nrows() + tail.size();

        match SystemMatrix::from_entries(order, &entries, StorageMode::Dense) {
            SystemMatrix::Dense(matrix) => matrix,
            SystemMatrix::Sparse(_) => unreachable!(),
        }
    }

    #[test]
    fn assembled_matrix_is_symmetric() {
        let points = mat![[0.0, 0.0], [1.0, 0.5], [-1.0, 1.5], [0.25, -0.75]];

        for kernel in [
            RadialKernel::Linear,
            RadialKernel::Cubic,
            RadialKernel::Multiquadric,
            RadialKernel::ThinPlate,
        ] {
            let matrix = dense_system(&points, kernel, kernel.min_degree());
            let transposed = matrix.transpose().to_owned();

            let approx_eq = CwiseMat(ApproxEq::eps() * 128.0 * (2 as f64));
            assert!(&matrix ~ &transposed);
        }
    }

    #[test]
    fn trailing_polynomial_block_is_zero() {
        let points = mat![[0.0, 0.0], [1.0, 0.5], [-1.0, 1.5], [0.25, -0.75]];
        let matrix = dense_system(&points, RadialKernel::ThinPlate, 2);

        let n = points.nrows();
        let p = matrix.nrows() - n;
        assert!(p == 6);

        for i in 0..p {
            for j in 0..p {
                assert!(matrix[(n + i, n + j)] == 0.0);
            }
        }
    }

    #[test]
    fn kernel_diagonal_holds_phi_of_zero() {
        let points = mat![[0.0, 0.0], [1.0, 0.5], [-1.0, 1.5]];

        let matrix = dense_system(&points, RadialKernel::Multiquadric, 1);
        for i in 0..points.nrows() {
            assert!(matrix[(i, i)] == 1.0);
        }

        let matrix = dense_system(&points, RadialKernel::ThinPlate, 2);
        for i in 0..points.nrows() {
            assert!(matrix[(i, i)] == 0.0);
        }
    }

    #[test]
    fn rhs_stacks_values_above_zero_rows() {
        let values = mat![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let rhs = assemble_rhs(&values, 2);

        assert!(rhs.shape() == (5, 2));
        assert!(rhs[(1, 1)] == 20.0);
        assert!(rhs[(3, 0)] == 0.0);
        assert!(rhs[(4, 1)] == 0.0);
    }

    #[test]
    fn dense_solve_reproduces_the_rhs() {
        let points = mat![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.5, 0.25]];
        let matrix = dense_system(&points, RadialKernel::Linear, 0);

        let rhs = assemble_rhs(&mat![[1.0], [2.0], [3.0], [4.0], [5.0]], 1);

        let solver = SystemMatrix::Dense(matrix.clone()).factorize().unwrap();
        let solution = solver.solve(&rhs);

        let reproduced = &matrix * &solution;
        let approx_eq = CwiseMat(ApproxEq::eps() * 128.0 * (points.nrows() as f64));
        assert!(&reproduced ~ &rhs);
    }
}
