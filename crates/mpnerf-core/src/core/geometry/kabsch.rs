use crate::core::batch::map_batch;
use crate::core::error::GeometryError;
use nalgebra::{DMatrix, DVector, Point3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Convergence settings for the singular value decomposition used by [`superpose_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SvdOptions {
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for SvdOptions {
    fn default() -> Self {
        Self {
            epsilon: f64::EPSILON,
            max_iterations: 10_000,
        }
    }
}

/// Result of a Kabsch superposition of `x` onto `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    /// `x` centered on its centroid and rotated onto `target`.
    pub aligned: DMatrix<f64>,
    /// `y` centered on its centroid.
    pub target: DMatrix<f64>,
    /// Proper rotation taking the centered `x` onto the centered `y`.
    pub rotation: DMatrix<f64>,
    /// Singular values of the cross-covariance, the last one negated when a reflection
    /// had to be removed.
    pub singular_values: DVector<f64>,
}

/// Stacks points as the columns of a `3 x N` matrix.
pub fn points_to_matrix(points: &[Point3<f64>]) -> DMatrix<f64> {
    DMatrix::from_fn(3, points.len(), |row, col| points[col][row])
}

fn shape_of(matrix: &DMatrix<f64>) -> Vec<usize> {
    vec![matrix.nrows(), matrix.ncols()]
}

fn check_same_shape(x: &DMatrix<f64>, y: &DMatrix<f64>) -> Result<(), GeometryError> {
    if x.shape() != y.shape() {
        return Err(GeometryError::ShapeMismatch {
            left: shape_of(x),
            right: shape_of(y),
        });
    }
    Ok(())
}

fn centered(points: &DMatrix<f64>) -> DMatrix<f64> {
    let centroid = points.column_mean();
    let mut centered = points.clone();
    for mut column in centered.column_iter_mut() {
        column -= &centroid;
    }
    centered
}

/// [`superpose_with`] using the default [`SvdOptions`].
pub fn superpose(x: &DMatrix<f64>, y: &DMatrix<f64>) -> Result<Superposition, GeometryError> {
    superpose_with(x, y, &SvdOptions::default())
}

/// Optimal proper rotation of the point set `x` onto `y` (Kabsch).
///
/// Both inputs are `D x N` with one point per column and columns in correspondence.
/// Each set is centered on its own centroid, the cross-covariance `C = X Y^T` is
/// decomposed as `V S W^T`, and the rotation applied to `X` is `(V W^T)^T`.
///
/// When fewer than three non-collinear points are given the covariance is rank
/// deficient; a proper rotation is still returned but it is not unique.
///
/// # Errors
///
/// - [`GeometryError::ShapeMismatch`] if `x` and `y` differ in shape.
/// - [`GeometryError::Decomposition`] if the covariance is not finite or the SVD does
///   not converge within `options.max_iterations`.
pub fn superpose_with(
    x: &DMatrix<f64>,
    y: &DMatrix<f64>,
    options: &SvdOptions,
) -> Result<Superposition, GeometryError> {
    check_same_shape(x, y)?;

    let x_centered = centered(x);
    let y_centered = centered(y);
    let covariance = &x_centered * y_centered.transpose();

    let decomposition_failed = || GeometryError::Decomposition {
        max_iterations: options.max_iterations,
    };
    if !covariance.iter().all(|value| value.is_finite()) {
        return Err(decomposition_failed());
    }
    let svd = covariance
        .try_svd(true, true, options.epsilon, options.max_iterations)
        .ok_or_else(decomposition_failed)?;
    let (Some(mut v), Some(w_t)) = (svd.u, svd.v_t) else {
        return Err(decomposition_failed());
    };
    let mut singular_values = svd.singular_values;

    // V W^T would be a reflection; flip the axis of the smallest singular value.
    if let Some(last) = x.nrows().checked_sub(1) {
        if v.determinant() * w_t.determinant() < 0.0 {
            singular_values[last] = -singular_values[last];
            v.column_mut(last).neg_mut();
        }
    }

    let rotation = (v * w_t).transpose();
    let aligned = &rotation * &x_centered;

    Ok(Superposition {
        aligned,
        target: y_centered,
        rotation,
        singular_values,
    })
}

/// Root-mean-square deviation over every entry of two equally shaped matrices.
///
/// The mean runs over all `D * N` entries, so for `3 x N` point sets the result is the
/// per-point RMSD divided by `sqrt(3)`.
pub fn rmsd(x: &DMatrix<f64>, y: &DMatrix<f64>) -> Result<f64, GeometryError> {
    check_same_shape(x, y)?;
    Ok(((x - y).norm_squared() / x.len() as f64).sqrt())
}

fn check_paired_batches(
    xs: &[DMatrix<f64>],
    ys: &[DMatrix<f64>],
) -> Result<(), GeometryError> {
    if xs.len() != ys.len() {
        return Err(GeometryError::batch_mismatch(xs.len(), ys.len()));
    }
    xs.iter()
        .zip(ys)
        .try_for_each(|(x, y)| check_same_shape(x, y))
}

/// One [`superpose_with`] per pair, evaluated in parallel.
pub fn superpose_batch(
    xs: &[DMatrix<f64>],
    ys: &[DMatrix<f64>],
    options: &SvdOptions,
) -> Result<Vec<Superposition>, GeometryError> {
    check_paired_batches(xs, ys)?;
    debug!(batch = xs.len(), "Superposing point-set pairs.");
    map_batch(xs.len(), |i| superpose_with(&xs[i], &ys[i], options))
        .into_iter()
        .collect()
}

/// One [`rmsd`] per pair.
pub fn rmsd_batch(
    xs: &[DMatrix<f64>],
    ys: &[DMatrix<f64>],
) -> Result<Vec<f64>, GeometryError> {
    check_paired_batches(xs, ys)?;
    Ok(map_batch(xs.len(), |i| {
        ((&xs[i] - &ys[i]).norm_squared() / xs[i].len() as f64).sqrt()
    }))
}
