use crate::common::defs::*;
use ndarray::Array2;
use std::ops::{Index, IndexMut};

/// State values, one per cell of the maze.
#[derive(Debug, Clone, PartialEq)]
pub struct VTable {
    table: Array2<Continous>,
}

impl VTable {
    pub fn new(row_count: usize, col_count: usize) -> Self {
        Self::from_elem(row_count, col_count, 0.)
    }

    pub fn from_elem(row_count: usize, col_count: usize, value: Continous) -> Self {
        Self {
            table: Array2::from_elem((row_count, col_count), value),
        }
    }

    pub fn from_rows(rows: Vec<Vec<Continous>>) -> Self {
        assert!(!rows.is_empty(), "VTable must have at least 1 row");
        let col_count = rows[0].len();
        assert!(
            rows.iter().all(|r| r.len() == col_count),
            "All rows of the VTable must be of size {col_count}"
        );

        let row_count = rows.len();
        let table = Array2::from_shape_vec((row_count, col_count), rows.concat())
            .unwrap_or_else(|e| panic!("Cannot shape VTable as {row_count}x{col_count}: {e}"));
        Self { table }
    }

    pub fn row_count(&self) -> usize {
        self.table.nrows()
    }

    pub fn col_count(&self) -> usize {
        self.table.ncols()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.table.dim()
    }

    /// Values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = &Continous> + '_ {
        self.table.iter()
    }

    /// Largest `|prev - curr| / |prev|` over all cells, `self` being `prev`.
    ///
    /// A cell that stays at 0 counts as unchanged, a cell that leaves 0 counts
    /// as an infinite change.
    pub fn max_relative_delta(&self, curr: &VTable) -> Continous {
        assert_eq!(
            self.dim(),
            curr.dim(),
            "Cannot compare VTables of different dimensions"
        );

        self.values()
            .zip(curr.values())
            .map(|(&prev, &curr)| {
                let diff = (prev - curr).abs();
                if prev == 0. {
                    if diff == 0. {
                        0.
                    } else {
                        Continous::INFINITY
                    }
                } else {
                    diff / prev.abs()
                }
            })
            .fold(0., Continous::max)
    }
}

impl Index<(usize, usize)> for VTable {
    type Output = Continous;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.table[[row, col]]
    }
}

impl IndexMut<(usize, usize)> for VTable {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.table[[row, col]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;

    #[test]
    fn new_table_is_zero() {
        let v = VTable::new(2, 3);

        assert_eq!(v.dim(), (2, 3));
        assert!(v.values().all(|&x| x == 0.));
    }

    #[test]
    fn from_rows_is_row_major() {
        let mut v = VTable::from_rows(vec![vec![1., 2.], vec![3., 4.]]);
        v[(1, 0)] = 30.;

        assert_eq!(v.values().copied().collect::<Vec<_>>(), vec![1., 2., 30., 4.]);
        assert_eq!(v[(0, 1)], 2.);
    }

    #[test]
    #[should_panic(expected = "All rows of the VTable")]
    fn ragged_rows_are_rejected() {
        VTable::from_rows(vec![vec![1., 2.], vec![3.]]);
    }

    #[test]
    fn max_relative_delta_is_relative_to_previous() {
        let prev = VTable::from_rows(vec![vec![-10., 4.]]);
        let curr = VTable::from_rows(vec![vec![-11., 4.2]]);

        assert_float_eq!(prev.max_relative_delta(&curr), 0.1, abs <= 1e-12);
    }

    #[test]
    fn max_relative_delta_from_zero() {
        let prev = VTable::from_rows(vec![vec![0., -2.]]);

        assert_float_eq!(
            prev.max_relative_delta(&VTable::from_rows(vec![vec![0., -2.]])),
            0.,
            abs <= 1e-12
        );
        assert!(prev
            .max_relative_delta(&VTable::from_rows(vec![vec![-1., -2.]]))
            .is_infinite());
    }
}
