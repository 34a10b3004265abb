//! Column-oriented tabular containers.
//!
//! The trainer only needs three things from its input: a row count, a
//! column count, and random access to one cell. [`TabularData`] captures
//! exactly that, so any container satisfying it can be fitted or predicted
//! on. [`ColumnFrame`] is the crate's own pure column store; `ndarray`
//! arrays and plain vectors implement the trait as well.

use crate::core::error::{GbrtError, Result};
use ndarray::{Array1, Array2, ArrayView2};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

/// Read access to a rectangular table of numeric cells.
pub trait TabularData {
    /// Number of rows (samples).
    fn num_rows(&self) -> usize;

    /// Number of columns.
    fn num_columns(&self) -> usize;

    /// Value at `(row, col)`. Callers stay within `num_rows × num_columns`.
    fn value(&self, row: usize, col: usize) -> f64;

    /// Copy of one column.
    fn column(&self, col: usize) -> Vec<f64> {
        (0..self.num_rows()).map(|row| self.value(row, col)).collect()
    }

    /// Copy of one row.
    fn row(&self, row: usize) -> Vec<f64> {
        (0..self.num_columns()).map(|col| self.value(row, col)).collect()
    }
}

impl<T: TabularData + ?Sized> TabularData for &T {
    fn num_rows(&self) -> usize {
        (**self).num_rows()
    }

    fn num_columns(&self) -> usize {
        (**self).num_columns()
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        (**self).value(row, col)
    }

    fn column(&self, col: usize) -> Vec<f64> {
        (**self).column(col)
    }
}

/// An ordered sequence of equal-length numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFrame {
    columns: Vec<Vec<f64>>,
    names: Option<Vec<String>>,
    num_rows: usize,
}

impl ColumnFrame {
    /// Builds a frame from columns, rejecting ragged input.
    pub fn new(columns: Vec<Vec<f64>>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, Vec::len);
        if let Some((index, column)) = columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.len() != num_rows)
        {
            return Err(GbrtError::dimension_mismatch(
                format!("{} rows in every column", num_rows),
                format!("{} rows in column {}", column.len(), index),
            ));
        }

        Ok(ColumnFrame {
            columns,
            names: None,
            num_rows,
        })
    }

    /// Builds a frame from row-major records.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let num_columns = rows.first().map_or(0, Vec::len);
        let mut columns = vec![Vec::with_capacity(rows.len()); num_columns];
        for (index, row) in rows.iter().enumerate() {
            if row.len() != num_columns {
                return Err(GbrtError::dimension_mismatch(
                    format!("{} values per row", num_columns),
                    format!("{} values in row {}", row.len(), index),
                ));
            }
            for (column, &value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        Self::new(columns)
    }

    /// Attaches column names; the count must match the column count.
    pub fn with_names<S: Into<String>>(mut self, names: Vec<S>) -> Result<Self> {
        if names.len() != self.columns.len() {
            return Err(GbrtError::dimension_mismatch(
                format!("{} column names", self.columns.len()),
                format!("{} column names", names.len()),
            ));
        }
        self.names = Some(names.into_iter().map(Into::into).collect());
        Ok(self)
    }

    /// Column names, if attached.
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Borrowed view of one column.
    pub fn column_slice(&self, col: usize) -> Option<&[f64]> {
        self.columns.get(col).map(Vec::as_slice)
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Splits off the last column as a one-column response frame.
    pub fn split_last_column(mut self) -> Result<(ColumnFrame, ColumnFrame)> {
        let last = self
            .columns
            .pop()
            .ok_or_else(|| GbrtError::dataset("cannot split a frame with no columns"))?;
        let last_name = self.names.as_mut().and_then(Vec::pop);

        let predictors = ColumnFrame {
            num_rows: if self.columns.is_empty() { 0 } else { self.num_rows },
            columns: self.columns,
            names: self.names,
        };
        let response = ColumnFrame {
            num_rows: last.len(),
            columns: vec![last],
            names: last_name.map(|name| vec![name]),
        };
        Ok((predictors, response))
    }
}

impl TabularData for ColumnFrame {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_columns(&self) -> usize {
        self.columns.len()
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        self.columns[col][row]
    }

    fn column(&self, col: usize) -> Vec<f64> {
        self.columns[col].clone()
    }
}

impl<T> TabularData for Array2<T>
where
    T: AsPrimitive<f64>,
{
    fn num_rows(&self) -> usize {
        self.nrows()
    }

    fn num_columns(&self) -> usize {
        self.ncols()
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        self[[row, col]].as_()
    }
}

impl<'a, T> TabularData for ArrayView2<'a, T>
where
    T: AsPrimitive<f64>,
{
    fn num_rows(&self) -> usize {
        self.nrows()
    }

    fn num_columns(&self) -> usize {
        self.ncols()
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        self[[row, col]].as_()
    }
}

impl<T> TabularData for Array1<T>
where
    T: AsPrimitive<f64>,
{
    fn num_rows(&self) -> usize {
        self.len()
    }

    fn num_columns(&self) -> usize {
        1
    }

    fn value(&self, row: usize, _col: usize) -> f64 {
        self[row].as_()
    }
}

impl<T> TabularData for Vec<T>
where
    T: AsPrimitive<f64>,
{
    fn num_rows(&self) -> usize {
        self.len()
    }

    fn num_columns(&self) -> usize {
        1
    }

    fn value(&self, row: usize, _col: usize) -> f64 {
        self[row].as_()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_column_frame_access() {
        let frame = ColumnFrame::new(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(frame.num_rows(), 3);
        assert_eq!(frame.num_columns(), 2);
        assert_eq!(frame.value(2, 1), 6.0);
        assert_eq!(frame.row(1), vec![2.0, 5.0]);
        assert_eq!(frame.column(0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = ColumnFrame::new(vec![vec![1.0, 2.0], vec![1.0]]);
        assert!(matches!(result, Err(GbrtError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_from_rows_matches_columns() {
        let frame = ColumnFrame::from_rows(&[vec![1.0, 4.0], vec![2.0, 5.0]]).unwrap();
        assert_eq!(frame.columns(), &[vec![1.0, 2.0], vec![4.0, 5.0]]);
        assert!(ColumnFrame::from_rows(&[vec![1.0], vec![2.0, 3.0]]).is_err());
    }

    #[test]
    fn test_split_last_column() {
        let frame = ColumnFrame::new(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
            .unwrap()
            .with_names(vec!["a", "b", "y"])
            .unwrap();
        let (x, y) = frame.split_last_column().unwrap();
        assert_eq!(x.num_columns(), 2);
        assert_eq!(y.num_columns(), 1);
        assert_eq!(y.column(0), vec![5.0, 6.0]);
        assert_eq!(y.names().unwrap(), &["y".to_string()]);
        assert_eq!(x.names().unwrap().len(), 2);
    }

    #[test]
    fn test_ndarray_and_vec_access() {
        let matrix = array![[1.0f32, 2.0], [3.0, 4.0]];
        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.value(1, 0), 3.0);

        let response = vec![7.0, 8.0];
        assert_eq!(response.num_columns(), 1);
        assert_eq!(response.value(1, 0), 8.0);

        let view = matrix.view();
        assert_eq!(TabularData::row(&view, 0), vec![1.0, 2.0]);
    }
}
