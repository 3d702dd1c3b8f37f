//! Leading-dimension broadcasting for the geometry kernels.
//!
//! Every batched kernel accepts its arguments through [`Broadcast`]: a single value is
//! reused for each batch element, a slice supplies one value per element. All slices
//! passed to one call must share a length.

use super::error::GeometryError;
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub trait Broadcast<T>: Sync {
    /// Number of batch elements carried, or `None` for a single shared value.
    fn batch_len(&self) -> Option<usize>;

    /// Value for batch element `index`.
    fn at(&self, index: usize) -> T;
}

impl Broadcast<f64> for f64 {
    fn batch_len(&self) -> Option<usize> {
        None
    }

    fn at(&self, _index: usize) -> f64 {
        *self
    }
}

impl Broadcast<Point3<f64>> for Point3<f64> {
    fn batch_len(&self) -> Option<usize> {
        None
    }

    fn at(&self, _index: usize) -> Point3<f64> {
        *self
    }
}

impl<T: Copy + Sync> Broadcast<T> for &[T] {
    fn batch_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn at(&self, index: usize) -> T {
        self[index]
    }
}

impl<T: Copy + Sync> Broadcast<T> for &Vec<T> {
    fn batch_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn at(&self, index: usize) -> T {
        self[index]
    }
}

/// Resolves the common batch length of a set of arguments.
///
/// Shared values never conflict. When no argument carries a batch, the call is treated
/// as a batch of one.
pub fn resolve_batch_len(lengths: &[Option<usize>]) -> Result<usize, GeometryError> {
    let mut resolved: Option<usize> = None;
    for &len in lengths.iter().flatten() {
        match resolved {
            None => resolved = Some(len),
            Some(expected) if expected != len => {
                return Err(GeometryError::batch_mismatch(expected, len));
            }
            Some(_) => {}
        }
    }
    Ok(resolved.unwrap_or(1))
}

/// Evaluates `kernel` for every batch index, in parallel when the `parallel` feature is on.
pub(crate) fn map_batch<T, F>(len: usize, kernel: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(not(feature = "parallel"))]
    let indices = 0..len;

    #[cfg(feature = "parallel")]
    let indices = (0..len).into_par_iter();

    indices.map(kernel).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_values_resolve_to_single_element_batch() {
        assert_eq!(resolve_batch_len(&[None, None, None]).unwrap(), 1);
    }

    #[test]
    fn slices_of_equal_length_resolve_to_their_length() {
        assert_eq!(resolve_batch_len(&[Some(4), None, Some(4)]).unwrap(), 4);
    }

    #[test]
    fn empty_slice_resolves_to_empty_batch() {
        assert_eq!(resolve_batch_len(&[Some(0), None]).unwrap(), 0);
    }

    #[test]
    fn slices_of_different_length_are_rejected() {
        let result = resolve_batch_len(&[Some(4), None, Some(3)]);
        assert_eq!(
            result,
            Err(GeometryError::ShapeMismatch {
                left: vec![4],
                right: vec![3],
            })
        );
    }

    #[test]
    fn scalar_broadcast_returns_same_value_for_every_index() {
        let value = 2.5_f64;
        assert_eq!(value.batch_len(), None);
        assert_eq!(value.at(0), 2.5);
        assert_eq!(value.at(17), 2.5);
    }

    #[test]
    fn slice_broadcast_indexes_elements() {
        let values = vec![1.0, 2.0, 3.0];
        let slice: &[f64] = &values;
        assert_eq!(slice.batch_len(), Some(3));
        assert_eq!(slice.at(2), 3.0);
        assert_eq!((&values).at(1), 2.0);
    }

    #[test]
    fn map_batch_preserves_index_order() {
        let squares = map_batch(6, |i| i * i);
        assert_eq!(squares, vec![0, 1, 4, 9, 16, 25]);
    }
}
