/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the RBF surrogate, its fit and update pipeline, and model persistence.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    common,
    config::SurrogateSettings,
    domain::DomainBounds,
    error::{EvalError, FitError},
    kernels::RadialKernel,
    linalg::{assemble_entries, assemble_rhs, SystemMatrix},
    polynomials::PolynomialTail,
    progress::{ProgressMsg, ProgressSink},
};

use faer::{concat, Mat, MatRef};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};
use thiserror::Error;

/// Coefficients of a solved surrogate system.
///
/// After fitting, the surrogate holds one coefficient row per sample point
/// and one per polynomial tail column, with one column per output dimension.
/// These are the unique solution of the augmented system and are replaced
/// wholesale on every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coefficients {
    /// Coefficients associated with the RBF centers (sample points).
    pub point_coefficients: Mat<f64>,

    /// Coefficients associated with the polynomial tail columns.
    pub poly_coefficients: Mat<f64>,
}

/// A prediction shaped to match the training outputs.
///
/// Surrogates trained on scalar outputs predict [`Prediction::Scalar`];
/// surrogates trained on k-dimensional outputs predict
/// [`Prediction::Vector`]. The shape is keyed off the stored outputs, never
/// off the query.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Prediction {
    /// Returns the scalar value, if this is a scalar prediction.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Prediction::Scalar(value) => Some(*value),
            Prediction::Vector(_) => None,
        }
    }

    /// Returns the predicted components regardless of shape.
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Prediction::Scalar(value) => std::slice::from_ref(value),
            Prediction::Vector(values) => values,
        }
    }
}

/// Convenience builder for constructing an [`RbfSurrogate`].
///
/// This builder provides an ergonomic way to configure and create a surrogate
/// from sample data, domain bounds, and optional settings. Supplies sensible
/// defaults and allows incremental configuration.
///
/// The builder should be called via the [`RbfSurrogate::builder`] method.
pub struct RbfSurrogateBuilder {
    points: Mat<f64>,
    point_values: Mat<f64>,
    bounds: DomainBounds,
    settings: SurrogateSettings,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl RbfSurrogateBuilder {
    /// Creates a new builder with the required inputs:
    /// - `points`: coordinates of the sample points, one row per sample.
    /// - `point_values`: outputs at each sample, one column per output
    ///   dimension.
    /// - `bounds`: domain bounds used to center the polynomial tail.
    ///
    /// Default [`SurrogateSettings`] (linear kernel, unit scale factor,
    /// dense storage) are used unless overridden.
    fn new(points: Mat<f64>, point_values: Mat<f64>, bounds: DomainBounds) -> Self {
        Self {
            points,
            point_values,
            bounds,
            settings: SurrogateSettings::default(),
            progress_callback: None,
        }
    }

    /// Sets custom fit settings.
    pub fn settings(mut self, settings: SurrogateSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Optional callback for reporting fit progress.
    ///
    /// Skipped during serialization.
    pub fn progress_callback(mut self, progress_callback: Arc<dyn ProgressSink>) -> Self {
        self.progress_callback = Some(progress_callback);
        self
    }

    /// Builds, fits, and returns the configured [`RbfSurrogate`].
    pub fn build(self) -> Result<RbfSurrogate, FitError> {
        RbfSurrogate::new(
            self.points,
            self.point_values,
            self.bounds,
            self.settings,
            self.progress_callback,
        )
    }
}

/// An exact-interpolation radial basis function surrogate.
///
/// The surrogate stores its sample set, the solved coefficients, and the
/// configuration needed to evaluate predictions. It is always fully fitted:
/// construction and every update run the complete assemble/factorise/solve
/// pipeline, and a failed update leaves the previous model untouched.
///
/// A surrogate instance is not designed for concurrent mutation; callers
/// must serialise updates against evaluations. Read-only evaluations may run
/// concurrently with each other.
#[derive(Debug, Serialize, Deserialize)]
pub struct RbfSurrogate {
    /// Coordinates of the sample points, one row per sample.
    points: Mat<f64>,

    /// Outputs at each sample point, one column per output dimension.
    point_values: Mat<f64>,

    /// Domain bounds used to center and scale the polynomial tail.
    bounds: DomainBounds,

    /// Fit settings.
    settings: SurrogateSettings,

    /// Polynomial tail attached to the kernel system.
    tail: PolynomialTail,

    /// Solved coefficients for the kernel and tail terms.
    coefficients: Coefficients,

    /// Optional callback for reporting fit progress.
    /// Skipped during serialization.
    #[serde(skip, default)]
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl RbfSurrogate {
    /// Creates a new [`RbfSurrogateBuilder`] for the given samples and
    /// domain bounds.
    ///
    /// This is the way to construct a surrogate.
    pub fn builder(
        points: Mat<f64>,
        point_values: Mat<f64>,
        bounds: DomainBounds,
    ) -> RbfSurrogateBuilder {
        RbfSurrogateBuilder::new(points, point_values, bounds)
    }

    fn new(
        points: Mat<f64>,
        point_values: Mat<f64>,
        bounds: DomainBounds,
        settings: SurrogateSettings,
        progress_callback: Option<Arc<dyn ProgressSink>>,
    ) -> Result<Self, FitError> {
        let fit_start = Instant::now();

        if points.nrows() == 0 {
            return Err(FitError::EmptySampleSet);
        }
        if points.nrows() != point_values.nrows() {
            return Err(FitError::SampleCountMismatch {
                num_points: points.nrows(),
                num_values: point_values.nrows(),
            });
        }
        if points.ncols() != bounds.dimensions() {
            return Err(FitError::InputDimensionMismatch {
                expected: points.ncols(),
                found: bounds.dimensions(),
            });
        }
        if point_values.ncols() == 0 {
            return Err(FitError::OutputDimensionMismatch {
                expected: 1,
                found: 0,
            });
        }
        if !(settings.scale_factor > 0.0 && settings.scale_factor.is_finite()) {
            return Err(FitError::InvalidScaleFactor {
                scale_factor: settings.scale_factor,
            });
        }

        let tail = PolynomialTail::new(points.ncols(), settings.kernel.min_degree());

        let coefficients = fit_coefficients(&points, &point_values, &bounds, &settings, &tail)?;

        let surrogate = Self {
            points,
            point_values,
            bounds,
            settings,
            tail,
            coefficients,
            progress_callback,
        };

        if let Some(sink) = &surrogate.progress_callback {
            sink.emit(ProgressMsg::FitCompleted {
                num_points: surrogate.num_points(),
                basis_size: surrogate.basis_size(),
                num_outputs: surrogate.num_outputs(),
            });
            sink.emit(ProgressMsg::Message {
                message: format!(
                    "Took {:?} to fit surrogate for {} points with kernel {:?}",
                    fit_start.elapsed(),
                    surrogate.num_points(),
                    surrogate.settings.kernel,
                ),
            });
        }

        Ok(surrogate)
    }

    /// Number of stored sample points.
    pub fn num_points(&self) -> usize {
        self.points.nrows()
    }

    /// Input dimensionality the surrogate was trained on.
    pub fn dimensions(&self) -> usize {
        self.points.ncols()
    }

    /// Output dimensionality of the stored values.
    pub fn num_outputs(&self) -> usize {
        self.point_values.ncols()
    }

    /// Number of polynomial tail columns in the augmented system.
    pub fn basis_size(&self) -> usize {
        self.tail.size()
    }

    /// Coordinates of the stored sample points.
    pub fn points(&self) -> &Mat<f64> {
        &self.points
    }

    /// Outputs at the stored sample points.
    pub fn point_values(&self) -> &Mat<f64> {
        &self.point_values
    }

    /// Domain bounds used by the polynomial tail.
    pub fn bounds(&self) -> &DomainBounds {
        &self.bounds
    }

    /// Settings the surrogate was fitted with.
    pub fn settings(&self) -> &SurrogateSettings {
        &self.settings
    }

    /// Solved coefficients of the most recent fit.
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Evaluate the surrogate at a batch of target points.
    ///
    /// ### Returns
    /// An `(n_targets x n_outputs)` matrix of predicted values.
    ///
    /// ### Errors
    /// Fails only if the targets' width disagrees with the trained
    /// dimensionality; no solve happens at evaluation time.
    pub fn evaluate(&self, target_points: &Mat<f64>) -> Result<Mat<f64>, EvalError> {
        if target_points.ncols() != self.dimensions() {
            return Err(EvalError::DimensionMismatch {
                expected: self.dimensions(),
                found: target_points.ncols(),
            });
        }

        Ok(evaluate_targets(
            &self.points,
            &self.coefficients,
            &self.tail,
            &self.bounds,
            &self.settings,
            target_points,
        ))
    }

    /// Evaluate the surrogate **at the stored sample points**.
    ///
    /// Useful for diagnostics: an exact-interpolation model reproduces its
    /// own samples to within the fitting tolerance, and the fit pipeline
    /// enforces exactly that.
    pub fn evaluate_at_source(&self) -> Mat<f64> {
        evaluate_targets(
            &self.points,
            &self.coefficients,
            &self.tail,
            &self.bounds,
            &self.settings,
            &self.points,
        )
    }

    /// Evaluate the surrogate at a single query point, shaped to match the
    /// training outputs.
    ///
    /// Surrogates trained on scalar outputs return [`Prediction::Scalar`];
    /// surrogates trained on vector outputs return [`Prediction::Vector`].
    pub fn predict(&self, query: &[f64]) -> Result<Prediction, EvalError> {
        if query.len() != self.dimensions() {
            return Err(EvalError::DimensionMismatch {
                expected: self.dimensions(),
                found: query.len(),
            });
        }

        let target = MatRef::from_row_major_slice(query, 1, query.len()).to_owned();
        let values = evaluate_targets(
            &self.points,
            &self.coefficients,
            &self.tail,
            &self.bounds,
            &self.settings,
            &target,
        );

        match self.num_outputs() {
            1 => Ok(Prediction::Scalar(values[(0, 0)])),
            k => Ok(Prediction::Vector((0..k).map(|j| values[(0, j)]).collect())),
        }
    }

    /// Append a single sample pair and rebuild the surrogate.
    ///
    /// The rebuild re-runs the full assemble/factorise/solve pipeline on the
    /// enlarged sample set; there is no incremental factorisation reuse. On
    /// error the surrogate keeps its previous samples and coefficients.
    pub fn add_sample(&mut self, new_x: &[f64], new_y: &[f64]) -> Result<(), FitError> {
        let xs = MatRef::from_row_major_slice(new_x, 1, new_x.len());
        let ys = MatRef::from_row_major_slice(new_y, 1, new_y.len());
        self.add_samples(xs, ys)
    }

    /// Append a batch of sample pairs (one row each) and rebuild the
    /// surrogate.
    ///
    /// Batch and single-pair updates are separate entry points; multiplicity
    /// is always explicit in the signature, never inferred from input shapes.
    pub fn add_samples(
        &mut self,
        new_x: MatRef<'_, f64>,
        new_y: MatRef<'_, f64>,
    ) -> Result<(), FitError> {
        if new_x.nrows() != new_y.nrows() {
            return Err(FitError::SampleCountMismatch {
                num_points: new_x.nrows(),
                num_values: new_y.nrows(),
            });
        }
        if new_x.ncols() != self.dimensions() {
            return Err(FitError::InputDimensionMismatch {
                expected: self.dimensions(),
                found: new_x.ncols(),
            });
        }
        if new_y.ncols() != self.num_outputs() {
            return Err(FitError::OutputDimensionMismatch {
                expected: self.num_outputs(),
                found: new_y.ncols(),
            });
        }
        if new_x.nrows() == 0 {
            return Ok(());
        }

        let merged_points = concat![[&self.points], [new_x]];
        let merged_values = concat![[&self.point_values], [new_y]];

        // Fit the candidate system first; commit only on success so a failed
        // update leaves the surrogate usable.
        let coefficients = fit_coefficients(
            &merged_points,
            &merged_values,
            &self.bounds,
            &self.settings,
            &self.tail,
        )?;

        if let Some(sink) = &self.progress_callback {
            sink.emit(ProgressMsg::SamplesAppended {
                num_added: new_x.nrows(),
            });
        }

        self.points = merged_points;
        self.point_values = merged_values;
        self.coefficients = coefficients;

        Ok(())
    }

    /// Save this surrogate to a **JSON envelope** `{ format, version, model }`.
    ///
    /// The on-disk format is versioned via `JSON_FORMAT_NAME` and
    /// `JSON_VERSION`. Files produced here are intended to be read back with
    /// [`RbfSurrogate::load_model`]. Models built on custom kernels cannot be
    /// serialized and fail with [`ModelIOError::Serialize`].
    ///
    /// ### Errors
    /// Returns `ModelIOError::{Create, Serialize, Flush}` on I/O or
    /// serialization failures.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> ModelIOResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|e| ModelIOError::Create {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let mut w = BufWriter::new(file);

        let env = JsonEnvelopeRef {
            format: JSON_FORMAT_NAME,
            version: JSON_VERSION,
            model: self,
        };

        serde_json::to_writer_pretty(&mut w, &env).map_err(|e| ModelIOError::Serialize {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        w.flush().map_err(|e| ModelIOError::Flush {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Load a surrogate from a versioned **JSON envelope**, validating format
    /// and version.
    ///
    /// If `progress` is `Some`, installs the sink on the returned model so
    /// subsequent updates report progress.
    ///
    /// ### Errors
    /// Returns `ModelIOError::{Open, Parse, FormatMismatch, VersionMismatch}`
    /// as appropriate.
    pub fn load_model<P: AsRef<Path>>(
        path: P,
        progress: Option<Arc<dyn ProgressSink>>,
    ) -> ModelIOResult<Self> {
        let path_ref = path.as_ref();

        let file = File::open(path_ref).map_err(|e| ModelIOError::Open {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let env: JsonEnvelopeOwned<Self> =
            serde_json::from_reader(reader).map_err(|e| ModelIOError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            })?;

        if env.format != JSON_FORMAT_NAME {
            return Err(ModelIOError::FormatMismatch {
                path: path_ref.to_path_buf(),
                found: env.format,
                expected: JSON_FORMAT_NAME,
            });
        }

        if env.version != JSON_VERSION {
            return Err(ModelIOError::VersionMismatch {
                path: path_ref.to_path_buf(),
                found: env.version,
                expected: JSON_VERSION,
            });
        }

        let mut model = env.model;
        if let Some(sink) = progress {
            model.progress_callback = Some(sink);
        }
        Ok(model)
    }
}

/// Runs the full fit pipeline: pre-checks, duplicate screening, assembly,
/// factorisation, the shared multi-RHS solve, and the post-solve
/// interpolation check.
fn fit_coefficients(
    points: &Mat<f64>,
    point_values: &Mat<f64>,
    bounds: &DomainBounds,
    settings: &SurrogateSettings,
    tail: &PolynomialTail,
) -> Result<Coefficients, FitError> {
    let n = points.nrows();
    let p = tail.size();

    if n < p {
        return Err(FitError::InsufficientSamples {
            num_points: n,
            basis_size: p,
        });
    }

    reject_duplicates(points, settings)?;

    let entries = assemble_entries(points, settings.kernel, settings.scale_factor, tail, bounds);
    let matrix = SystemMatrix::from_entries(n + p, &entries, settings.storage_mode);
    let rhs = assemble_rhs(point_values, p);

    let all_coefficients = matrix.factorize()?.solve(&rhs);

    if all_coefficients
        .col_iter()
        .any(|col| col.iter().any(|value| !value.is_finite()))
    {
        return Err(FitError::SingularSystem {
            detail: "solve produced non-finite coefficients".into(),
        });
    }

    let (point_part, poly_part) = all_coefficients.split_at_row(n);
    let coefficients = Coefficients {
        point_coefficients: point_part.to_owned(),
        poly_coefficients: poly_part.to_owned(),
    };

    // The model must reproduce its own samples; anything else means the
    // factorisation silently lost rank.
    let fitted = evaluate_targets(points, &coefficients, tail, bounds, settings, points);

    let value_scale = point_values
        .col_iter()
        .flat_map(|col| col.iter())
        .fold(1.0_f64, |acc, value| acc.max(value.abs()));

    let mut max_diff = 0.0_f64;
    for j in 0..point_values.ncols() {
        for i in 0..n {
            max_diff = max_diff.max((fitted[(i, j)] - point_values[(i, j)]).abs());
        }
    }

    let residual = max_diff / value_scale;
    if !(residual <= settings.fitting_tolerance) {
        return Err(FitError::SingularSystem {
            detail: format!(
                "interpolation residual {:.3e} exceeds tolerance {:.3e}",
                residual, settings.fitting_tolerance
            ),
        });
    }

    Ok(coefficients)
}

/// Reconstructs predictions at `target_points` from stored coefficients:
/// the kernel block applied to the point coefficients plus the tail basis
/// applied to the tail coefficients.
fn evaluate_targets(
    source_points: &Mat<f64>,
    coefficients: &Coefficients,
    tail: &PolynomialTail,
    bounds: &DomainBounds,
    settings: &SurrogateSettings,
    target_points: &Mat<f64>,
) -> Mat<f64> {
    let m = target_points.nrows();
    let n = source_points.nrows();

    let kernel_matrix = Mat::<f64>::from_fn(m, n, |i, j| {
        settings
            .kernel
            .evaluate(target_points.row(i), source_points.row(j), settings.scale_factor)
    });

    let mut interpolated_values = kernel_matrix * &coefficients.point_coefficients;

    interpolated_values += tail.evaluate(target_points, bounds) * &coefficients.poly_coefficients;

    interpolated_values
}

/// Rejects sample sets containing points the kernel cannot tell apart.
///
/// Distances are measured in scaled displacement space, so widening the
/// kernel via `scale_factor` tightens the admissible spacing accordingly.
fn reject_duplicates(points: &Mat<f64>, settings: &SurrogateSettings) -> Result<(), FitError> {
    let n = points.nrows();

    let mut max_length = 0.0_f64;
    for j in 0..points.ncols() {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for value in points.col(j).iter() {
            lo = lo.min(*value);
            hi = hi.max(*value);
        }
        max_length = max_length.max(hi - lo);
    }

    let h_ref = match max_length > 0.0 {
        true => max_length / settings.scale_factor,
        false => 1.0,
    };
    let cutoff = duplicate_cutoff_distance(h_ref, settings.kernel);

    for j in 1..n {
        for i in 0..j {
            let distance =
                common::get_distance(points.row(i), points.row(j)) / settings.scale_factor;
            if distance < cutoff {
                return Err(FitError::DuplicatePoints {
                    first: i,
                    second: j,
                    distance,
                    cutoff,
                });
            }
        }
    }

    Ok(())
}

/// Estimate a duplicate cutoff distance for this kernel to keep the
/// interpolation system nonsingular.
///
/// Some kernels have near-zero behaviour that can introduce numerical noise
/// and break the factorisation if the cutoff tolerance is too small. This
/// function probes the kernel response near r = 0 and scales the cutoff so
/// that |phi(r) - phi(0)| rises above machine epsilon relative to
/// phi(h_ref).
///
/// Returns: cutoff distance in [0, h_ref], below which two points are
/// indistinguishable to the kernel.
fn duplicate_cutoff_distance(h_ref: f64, kernel: RadialKernel) -> f64 {
    let eps = f64::EPSILON;
    let mut rtol = 1E-12;

    let phi0 = kernel.phi(0.0);
    let phih = kernel.phi(h_ref);
    let target = eps * (phih - phi0).abs();

    let resid = |r| (kernel.phi(r) - phi0).abs() - target;

    // A kernel flat across the whole bracket cannot distinguish any pair of
    // points at this extent.
    if resid(h_ref) <= 0.0 {
        return h_ref;
    }

    match roots::find_root_inverse_quadratic(0.0, h_ref, resid, &mut rtol) {
        Ok(r) => r,
        _ => h_ref * eps,
    }
}

const JSON_FORMAT_NAME: &str = "rbf_surrogate.json";
const JSON_VERSION: u32 = 1;

/// Borrowing envelope for SAVE (no clone of the model).
#[derive(Serialize)]
struct JsonEnvelopeRef<'a, T: ?Sized> {
    format: &'static str,
    version: u32,
    #[serde(flatten)]
    model: &'a T,
}

/// Owning envelope for LOAD (generic over the concrete model).
#[derive(Serialize, Deserialize)]
struct JsonEnvelopeOwned<T> {
    format: String,
    version: u32,
    #[serde(flatten)]
    model: T,
}

type ModelIOResult<T> = std::result::Result<T, ModelIOError>;

/// Errors that can occur when saving or loading an [`RbfSurrogate`] model.
///
/// This is the error type returned by [`RbfSurrogate::save_model`] and
/// [`RbfSurrogate::load_model`], wrapping lower-level I/O and JSON
/// serialization issues as well as format/version validation failures.
#[derive(Debug, Error)]
pub enum ModelIOError {
    /// Failed to create the target file before writing a model.
    #[error("creating {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    /// Failed to open an existing model file for reading.
    #[error("opening {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    /// Failed to flush buffered output when finishing a write.
    #[error("flushing {}: {source}", .path.display())]
    Flush { path: PathBuf, source: io::Error },

    /// Error serializing the in-memory model to JSON.
    #[error("serializing JSON to {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Error parsing JSON when reading a model from disk.
    #[error("parsing JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The JSON `format` field does not match the expected model format.
    #[error("unsupported format {found:?} (expected {expected:?}) in {}", .path.display())]
    FormatMismatch {
        path: PathBuf,
        found: String,
        expected: &'static str,
    },

    /// The JSON `version` field does not match the supported version.
    #[error("unsupported version {found} (expected {expected}) in {}", .path.display())]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::generate_random_points,
        config::{StorageMode, SurrogateSettings},
        rbf_test_functions::RbfTestFunctions,
    };
    use equator::assert;
    use faer::{mat, utils::approx::*, Mat};

    fn fit_1d_line() -> RbfSurrogate {
        let points = mat![[1.0], [2.0], [3.0], [4.0]];
        let values = mat![[2.0], [4.0], [6.0], [8.0]];
        let bounds = DomainBounds::scalar(1.0, 4.0).unwrap();

        RbfSurrogate::builder(points, values, bounds)
            .build()
            .unwrap()
    }

    fn franke_samples(num_points: usize) -> (Mat<f64>, Mat<f64>, DomainBounds) {
        let bounds = DomainBounds::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        let points = generate_random_points(num_points, &bounds, Some(42));
        let values = RbfTestFunctions::franke_2d(&points);
        (points, values, bounds)
    }

    fn assert_interpolates(surrogate: &RbfSurrogate) {
        let fitted = surrogate.evaluate_at_source();
        let approx_eq = CwiseMat(ApproxEq::eps() * 1E8 * (surrogate.num_points() as f64));
        assert!(&fitted ~ surrogate.point_values());
    }

    #[test]
    fn linear_kernel_1d_matches_the_line() {
        let surrogate = fit_1d_line();

        assert!(surrogate.basis_size() == 1);
        assert_interpolates(&surrogate);

        let prediction = surrogate.predict(&[2.5]).unwrap();
        assert!((prediction.scalar().unwrap() - 5.0).abs() < 1E-6);
    }

    #[test]
    fn add_sample_keeps_interpolating() {
        let mut surrogate = fit_1d_line();

        surrogate.add_sample(&[5.0], &[10.0]).unwrap();

        assert!(surrogate.num_points() == 5);
        assert!((surrogate.predict(&[2.5]).unwrap().scalar().unwrap() - 5.0).abs() < 1E-6);
        assert!((surrogate.predict(&[5.0]).unwrap().scalar().unwrap() - 10.0).abs() < 1E-6);
    }

    #[test]
    fn thin_plate_interpolates_franke_exactly() {
        let (points, values, bounds) = franke_samples(40);

        let settings = SurrogateSettings::builder(RadialKernel::ThinPlate).build();
        let surrogate = RbfSurrogate::builder(points, values, bounds)
            .settings(settings)
            .build()
            .unwrap();

        assert!(surrogate.basis_size() == 6);
        assert_interpolates(&surrogate);
    }

    #[test]
    fn multiquadric_interpolates_franke_exactly() {
        let (points, values, bounds) = franke_samples(30);

        let settings = SurrogateSettings::builder(RadialKernel::Multiquadric)
            .scale_factor(0.5)
            .build();
        let surrogate = RbfSurrogate::builder(points, values, bounds)
            .settings(settings)
            .build()
            .unwrap();

        assert!(surrogate.basis_size() == 3);
        assert_interpolates(&surrogate);
    }

    #[test]
    fn cubic_interpolates_franke_exactly() {
        let (points, values, bounds) = franke_samples(30);

        let settings = SurrogateSettings::builder(RadialKernel::Cubic).build();
        let surrogate = RbfSurrogate::builder(points, values, bounds)
            .settings(settings)
            .build()
            .unwrap();

        assert_interpolates(&surrogate);
    }

    #[test]
    fn degree_zero_keeps_a_single_constant_column() {
        let (points, values, bounds) = franke_samples(25);

        // Linear kernel: minimal degree 0, so the tail degenerates to the
        // constant column and interpolation must still be exact.
        let surrogate = RbfSurrogate::builder(points, values, bounds)
            .build()
            .unwrap();

        assert!(surrogate.basis_size() == 1);
        assert_interpolates(&surrogate);
    }

    #[test]
    fn vector_outputs_predict_vectors() {
        let (points, franke, bounds) = franke_samples(25);
        let bowl = RbfTestFunctions::bowl_nd(&points);

        // Two output columns sharing one assembly and factorisation.
        let values = Mat::<f64>::from_fn(points.nrows(), 2, |i, j| match j {
            0 => franke[(i, 0)],
            _ => bowl[(i, 0)],
        });

        let surrogate = RbfSurrogate::builder(points, values, bounds)
            .build()
            .unwrap();

        assert!(surrogate.num_outputs() == 2);
        assert_interpolates(&surrogate);

        match surrogate.predict(&[0.5, 0.5]).unwrap() {
            Prediction::Vector(components) => assert!(components.len() == 2),
            Prediction::Scalar(_) => panic!("two-output surrogate must predict vectors"),
        }
    }

    #[test]
    fn scalar_outputs_predict_scalars() {
        let surrogate = fit_1d_line();

        match surrogate.predict(&[1.5]).unwrap() {
            Prediction::Scalar(_) => {}
            Prediction::Vector(_) => panic!("single-output surrogate must predict scalars"),
        }
    }

    #[test]
    fn dense_and_sparse_storage_agree() {
        let (points, values, bounds) = franke_samples(30);

        let dense = RbfSurrogate::builder(points.clone(), values.clone(), bounds.clone())
            .settings(SurrogateSettings::builder(RadialKernel::ThinPlate).build())
            .build()
            .unwrap();

        let sparse = RbfSurrogate::builder(points, values, bounds)
            .settings(
                SurrogateSettings::builder(RadialKernel::ThinPlate)
                    .storage_mode(StorageMode::Sparse)
                    .build(),
            )
            .build()
            .unwrap();

        // Sparse LU pivots differently, so agreement is bounded by the
        // system's conditioning rather than by machine epsilon.
        let approx_eq = CwiseMat(ApproxEq::eps() * 1E10 * (dense.num_points() as f64));
        assert!(
            &dense.coefficients().point_coefficients ~ &sparse.coefficients().point_coefficients
        );
        assert!(
            &dense.coefficients().poly_coefficients ~ &sparse.coefficients().poly_coefficients
        );
    }

    #[test]
    fn append_order_does_not_change_the_fit() {
        let (points, values, bounds) = franke_samples(24);

        let direct = RbfSurrogate::builder(points.clone(), values.clone(), bounds.clone())
            .build()
            .unwrap();

        let head = 16;
        let mut incremental = RbfSurrogate::builder(
            points.subrows(0, head).to_owned(),
            values.subrows(0, head).to_owned(),
            bounds,
        )
        .build()
        .unwrap();

        incremental
            .add_samples(
                points.subrows(head, points.nrows() - head),
                values.subrows(head, values.nrows() - head),
            )
            .unwrap();

        let approx_eq = CwiseMat(ApproxEq::eps() * 1E8 * (direct.num_points() as f64));
        assert!(
            &direct.coefficients().point_coefficients
                ~ &incremental.coefficients().point_coefficients
        );
        assert!(
            &direct.coefficients().poly_coefficients
                ~ &incremental.coefficients().poly_coefficients
        );
    }

    #[test]
    fn rejects_mismatched_sample_counts() {
        let points = mat![[0.0], [1.0]];
        let values = mat![[0.0]];
        let bounds = DomainBounds::scalar(0.0, 1.0).unwrap();

        let err = RbfSurrogate::builder(points, values, bounds)
            .build()
            .unwrap_err();
        assert!(matches!(err, FitError::SampleCountMismatch { .. }));
    }

    #[test]
    fn rejects_duplicate_sample_points() {
        let points = mat![[0.0], [0.5], [0.5], [1.0]];
        let values = mat![[1.0], [2.0], [2.0], [3.0]];
        let bounds = DomainBounds::scalar(0.0, 1.0).unwrap();

        let err = RbfSurrogate::builder(points, values, bounds)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            FitError::DuplicatePoints {
                first: 1,
                second: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_undersized_sample_sets() {
        // Thin plate in 2-D needs a 6-column tail; 3 samples cannot carry it.
        let points = mat![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let values = mat![[1.0], [2.0], [3.0]];
        let bounds = DomainBounds::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();

        let err = RbfSurrogate::builder(points, values, bounds)
            .settings(SurrogateSettings::builder(RadialKernel::ThinPlate).build())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            FitError::InsufficientSamples {
                num_points: 3,
                basis_size: 6,
            }
        ));
    }

    #[test]
    fn rejects_bad_scale_factors() {
        let points = mat![[0.0], [1.0]];
        let values = mat![[0.0], [1.0]];
        let bounds = DomainBounds::scalar(0.0, 1.0).unwrap();

        let err = RbfSurrogate::builder(points, values, bounds)
            .settings(
                SurrogateSettings::builder(RadialKernel::Linear)
                    .scale_factor(0.0)
                    .build(),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, FitError::InvalidScaleFactor { .. }));
    }

    #[test]
    fn rejects_updates_with_the_wrong_shapes() {
        let mut surrogate = fit_1d_line();

        let err = surrogate.add_sample(&[1.0, 2.0], &[3.0]).unwrap_err();
        assert!(matches!(err, FitError::InputDimensionMismatch { .. }));

        let err = surrogate.add_sample(&[6.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FitError::OutputDimensionMismatch { .. }));

        // Shape errors must not have touched the stored samples.
        assert!(surrogate.num_points() == 4);
    }

    #[test]
    fn failed_update_leaves_the_model_usable() {
        let mut surrogate = fit_1d_line();

        // Appending a duplicate of an existing point must fail the rebuild.
        let err = surrogate.add_sample(&[2.0], &[4.0]).unwrap_err();
        assert!(matches!(err, FitError::DuplicatePoints { .. }));

        assert!(surrogate.num_points() == 4);
        assert!((surrogate.predict(&[2.5]).unwrap().scalar().unwrap() - 5.0).abs() < 1E-6);
    }

    #[test]
    fn rejects_queries_of_the_wrong_dimension() {
        let surrogate = fit_1d_line();

        let err = surrogate.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            EvalError::DimensionMismatch {
                expected: 1,
                found: 2,
            }
        ));
    }

    #[test]
    fn custom_kernels_fit_and_evaluate() {
        fn pseudo_gaussian(r: f64) -> f64 {
            (-r * r).exp()
        }

        let (points, values, bounds) = franke_samples(15);

        // A narrow width keeps the Gaussian-like system well conditioned.
        let kernel = RadialKernel::Custom(crate::kernels::CustomKernel {
            phi: pseudo_gaussian,
            min_degree: 0,
        });
        let surrogate = RbfSurrogate::builder(points, values, bounds)
            .settings(SurrogateSettings::builder(kernel).scale_factor(0.1).build())
            .build()
            .unwrap();

        assert!(surrogate.basis_size() == 1);
        assert_interpolates(&surrogate);
    }

    #[test]
    fn custom_kernel_models_refuse_to_serialize() {
        fn pseudo_gaussian(r: f64) -> f64 {
            (-r * r).exp()
        }

        let points = mat![[0.0], [0.5], [1.0]];
        let values = mat![[1.0], [2.0], [3.0]];
        let bounds = DomainBounds::scalar(0.0, 1.0).unwrap();

        let kernel = RadialKernel::Custom(crate::kernels::CustomKernel {
            phi: pseudo_gaussian,
            min_degree: 0,
        });
        let surrogate = RbfSurrogate::builder(points, values, bounds)
            .settings(SurrogateSettings::builder(kernel).scale_factor(0.2).build())
            .build()
            .unwrap();

        let path = std::env::temp_dir().join("rbf_surrogate_custom_kernel_test.json");
        let err = surrogate.save_model(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, ModelIOError::Serialize { .. }));
    }

    #[test]
    fn models_round_trip_through_json() {
        let surrogate = fit_1d_line();

        let path = std::env::temp_dir().join("rbf_surrogate_roundtrip_test.json");
        surrogate.save_model(&path).unwrap();

        let restored = RbfSurrogate::load_model(&path, None).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(restored.num_points() == surrogate.num_points());
        assert!((restored.predict(&[2.5]).unwrap().scalar().unwrap() - 5.0).abs() < 1E-6);
    }
}
