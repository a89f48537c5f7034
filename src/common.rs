/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines shared helpers for distances, random sampling, evaluation grids, and CSV I/O.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use csv::{ReaderBuilder, Writer};
use faer::{Mat, MatRef, RowRef};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fs::File;

use crate::domain::DomainBounds;

/// Calculates the euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use rbf_surrogate::get_distance;
///
/// let points = mat![
///     [1.0, 2.0],
///     [4.0, 6.0],
/// ];
///
/// assert_eq!(get_distance(points.row(0), points.row(1)), 5.0);
/// ```
#[inline(always)]
pub fn get_distance(target: RowRef<f64>, source: RowRef<f64>) -> f64 {
    let mut dist = 0.0;
    for (t, s) in target.iter().zip(source.iter()) {
        let diff = t - s;
        dist += diff * diff;
    }
    dist.sqrt()
}

/// Generate a matrix of random points inside the given bounds.
///
/// # Parameters
/// - `n`: Number of points to generate (rows in the output matrix).
/// - `bounds`: Domain to sample; each coordinate is drawn uniformly from
///   `[lower, upper)` along its axis.
/// - `seed`: Optional random seed.
///   - If `Some(seed)` is provided, the same sequence of points will be
///     generated deterministically across runs (useful for reproducible
///     tests).
///   - If `None`, the generator is seeded from the operating system's
///     randomness source.
///
/// # Returns
/// A `Mat<f64>` of shape `(n, bounds.dimensions())`.
pub fn generate_random_points(n: usize, bounds: &DomainBounds, seed: Option<u64>) -> Mat<f64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let lower = bounds.lower();
    let upper = bounds.upper();

    Mat::from_fn(n, bounds.dimensions(), |_, j| {
        rng.random_range(lower[j]..upper[j])
    })
}

/// Create a regular evaluation grid from per-dimension ranges and sample counts.
///
/// # Arguments
/// * `ranges` - Inclusive `(min, max)` range for each dimension.
/// * `counts` - Number of grid samples per range; must match `ranges.len()`.
///
/// # Returns
/// A `Mat<f64>` with one row per grid point and one column per dimension.
pub fn create_evaluation_grid(ranges: &[(f64, f64)], counts: &[usize]) -> Mat<f64> {
    assert_eq!(ranges.len(), counts.len());

    let total_points: usize = counts.iter().product();
    let num_dimensions = ranges.len();

    Mat::from_fn(total_points, num_dimensions, |row_idx, col_idx| {
        let dim_points = counts[col_idx];
        let (start, end) = ranges[col_idx];
        let step = (end - start) / (dim_points as f64 - 1.0);

        let stride = match col_idx == 0 {
            true => 1,
            false => counts[..col_idx].iter().product::<usize>(),
        };

        let index_in_dim = (row_idx / stride) % dim_points;
        start + step * index_in_dim as f64
    })
}

/// Load a CSV file into separate point and value matrices.
///
/// The trailing `num_value_columns` columns hold the sample outputs; all
/// preceding columns form the point coordinates.
///
/// # Arguments
/// * `file_path` - Path to the CSV file.
/// * `has_headers` - Whether the file has a single header row to skip.
/// * `num_value_columns` - Output dimensionality of the stored samples.
///
/// # Returns
/// On success, returns `(points, values)` where `points` has shape
/// `(n_rows, n_cols - num_value_columns)` and `values` has shape
/// `(n_rows, num_value_columns)`.
pub fn csv_to_point_arrays(
    file_path: &str,
    has_headers: bool,
    num_value_columns: usize,
) -> Result<(Mat<f64>, Mat<f64>), Box<dyn Error>> {
    let file = File::open(file_path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .from_reader(file);

    let mut coordinates = Vec::new();
    let mut outputs = Vec::new();
    let mut num_rows = 0;
    let mut num_cols = 0;

    for result in reader.records() {
        let record = result?;
        if num_cols == 0 {
            num_cols = record.len();
            if num_cols <= num_value_columns {
                return Err("CSV has no coordinate columns left for the points".into());
            }
        } else if record.len() != num_cols {
            return Err("Inconsistent number of columns in CSV".into());
        }

        for (i, value) in record.iter().enumerate() {
            let parsed_value: f64 = value.parse()?;
            if i < num_cols - num_value_columns {
                coordinates.push(parsed_value);
            } else {
                outputs.push(parsed_value);
            }
        }

        num_rows += 1;
    }

    let points = MatRef::from_row_major_slice(
        coordinates.as_slice(),
        num_rows,
        num_cols - num_value_columns,
    )
    .to_owned();
    let values =
        MatRef::from_row_major_slice(outputs.as_slice(), num_rows, num_value_columns).to_owned();

    Ok((points, values))
}

/// Write point coordinates and associated values to a CSV file.
///
/// Each row of `points` is written followed by the corresponding row of
/// `values`, with headers `x0..` for coordinates and `y0..` for outputs.
///
/// # Errors
/// Returns an error if the row counts disagree or writing to disk fails.
pub fn point_arrays_to_csv(
    points: &Mat<f64>,
    values: &Mat<f64>,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let num_points = points.nrows();
    if num_points != values.nrows() {
        return Err("Points and values must have the same number of rows".into());
    }

    let mut wtr = Writer::from_path(filename)?;

    let mut headers: Vec<String> = (0..points.ncols()).map(|j| format!("x{}", j)).collect();
    headers.extend((0..values.ncols()).map(|j| format!("y{}", j)));
    wtr.write_record(&headers)?;

    for i in 0..num_points {
        let mut record: Vec<String> = points.row(i).iter().map(|c| c.to_string()).collect();
        record.extend(values.row(i).iter().map(|c| c.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_points_respect_the_bounds() {
        let bounds = DomainBounds::new(vec![-2.0, 10.0], vec![-1.0, 20.0]).unwrap();
        let points = generate_random_points(64, &bounds, Some(7));

        assert_eq!(points.shape(), (64, 2));
        for i in 0..points.nrows() {
            assert!(points[(i, 0)] >= -2.0 && points[(i, 0)] < -1.0);
            assert!(points[(i, 1)] >= 10.0 && points[(i, 1)] < 20.0);
        }
    }

    #[test]
    fn random_points_are_reproducible_with_a_seed() {
        let bounds = DomainBounds::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        let a = generate_random_points(16, &bounds, Some(42));
        let b = generate_random_points(16, &bounds, Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn evaluation_grid_spans_the_ranges() {
        let grid = create_evaluation_grid(&[(0.0, 1.0), (2.0, 4.0)], &[2, 3]);

        assert_eq!(grid.shape(), (6, 2));
        assert_eq!(grid[(0, 0)], 0.0);
        assert_eq!(grid[(1, 0)], 1.0);
        assert_eq!(grid[(5, 1)], 4.0);
    }

    #[test]
    fn sample_sets_round_trip_through_csv() {
        use faer::mat;

        let points = mat![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]];
        let values = mat![[10.0, -1.0], [20.0, -2.0], [30.0, -3.0]];

        let path = std::env::temp_dir().join("rbf_surrogate_csv_roundtrip_test.csv");
        let path_str = path.to_str().unwrap();

        point_arrays_to_csv(&points, &values, path_str).unwrap();
        let (restored_points, restored_values) = csv_to_point_arrays(path_str, true, 2).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(restored_points, points);
        assert_eq!(restored_values, values);
    }
}
