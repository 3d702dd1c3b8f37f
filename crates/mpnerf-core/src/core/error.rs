use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Bond angle(s) must be in radians within [-pi, pi); got {values:?}")]
    InvalidAngleDomain { values: Vec<f64> },

    #[error("Shape mismatch between paired inputs: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("Singular value decomposition did not converge within {max_iterations} iterations")]
    Decomposition { max_iterations: usize },
}

impl GeometryError {
    pub(crate) fn batch_mismatch(left: usize, right: usize) -> Self {
        Self::ShapeMismatch {
            left: vec![left],
            right: vec![right],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_angle_message_lists_offending_values() {
        let err = GeometryError::InvalidAngleDomain {
            values: vec![4.0, -7.5],
        };
        let message = err.to_string();
        assert!(message.contains("4.0"));
        assert!(message.contains("-7.5"));
    }

    #[test]
    fn shape_mismatch_message_shows_both_shapes() {
        let err = GeometryError::ShapeMismatch {
            left: vec![3, 4],
            right: vec![3, 5],
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch between paired inputs: [3, 4] vs [3, 5]"
        );
    }
}
