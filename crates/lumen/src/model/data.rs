//! Two-dimensional pixel buffers.

use crate::error::{Error, Result};

/// A row-major 2-D array of `f64` pixel values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageData {
    shape: (usize, usize),
    values: Vec<f64>,
}

impl ImageData {
    /// Wrap `values` as an image of `shape` (rows, columns).
    ///
    /// Fails with [`Error::ShapeMismatch`] when the value count does not
    /// match the shape.
    pub fn new(shape: (usize, usize), values: Vec<f64>) -> Result<Self> {
        let (rows, columns) = shape;
        if rows * columns != values.len() {
            return Err(Error::ShapeMismatch {
                rows,
                columns,
                len: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    /// An image of `shape` with every pixel set to `value`.
    pub fn filled(shape: (usize, usize), value: f64) -> Self {
        Self {
            shape,
            values: vec![value; shape.0 * shape.1],
        }
    }

    /// An image of `shape` filled with zeros.
    pub fn zeros(shape: (usize, usize)) -> Self {
        Self::filled(shape, 0.0)
    }

    /// (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// All pixel values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn offset(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.shape.0 && column < self.shape.1).then(|| row * self.shape.1 + column)
    }

    /// The pixel at (`row`, `column`), if in bounds.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.offset(row, column).map(|offset| self.values[offset])
    }

    /// Mutable access to the pixel at (`row`, `column`), if in bounds.
    pub fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut f64> {
        self.offset(row, column).map(|offset| &mut self.values[offset])
    }

    /// Smallest and largest finite values, or `None` if there are none.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch() {
        let err = ImageData::new((2, 2), vec![1.0; 3]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { len: 3, .. }));
    }

    #[test]
    fn test_indexing() {
        let mut data = ImageData::zeros((3, 4));
        *data.get_mut(1, 2).unwrap() = 5.0;
        assert_eq!(data.get(1, 2), Some(5.0));
        assert_eq!(data.values()[6], 5.0);
        assert_eq!(data.get(3, 0), None);
        assert!(data.get_mut(0, 4).is_none());
    }

    #[test]
    fn test_min_max() {
        let mut data = ImageData::filled((10, 10), 200.0);
        *data.get_mut(5, 5).unwrap() = 650.0;
        assert_eq!(data.min_max(), Some((200.0, 650.0)));
        assert_eq!(ImageData::default().min_max(), None);
    }
}
