//! The result grid.  The coordinator owns exactly one of these,
//! writes each finished row into it as results arrive, and hands it
//! out whole once every row is in.

/// A height-by-width grid of iteration counts, stored row-major in a
/// single allocation.  Rows are written whole; cells are never
/// touched individually by the computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvergenceMatrix {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl ConvergenceMatrix {
    /// Allocates a zeroed matrix.
    pub fn new(width: usize, height: usize) -> ConvergenceMatrix {
        ConvergenceMatrix {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Stores one complete row of counts.  Panics if the row index is
    /// out of range or the slice is not exactly one row wide; either
    /// would mean the row protocol itself has gone wrong.
    pub fn write_row(&mut self, row: usize, counts: &[u32]) {
        assert_eq!(counts.len(), self.width, "row {} has the wrong width", row);
        self.cells[row * self.width..(row + 1) * self.width].copy_from_slice(counts);
    }

    /// One row of counts.
    pub fn row(&self, row: usize) -> &[u32] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    /// The count at grid coordinate (x, y).
    pub fn cell(&self, x: usize, y: usize) -> u32 {
        self.cells[y * self.width + x]
    }

    /// Iterates over the rows in index order, top row last.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_matrix_is_zeroed() {
        let matrix = ConvergenceMatrix::new(3, 2);
        assert_eq!(matrix.width(), 3);
        assert_eq!(matrix.height(), 2);
        for row in matrix.rows() {
            assert_eq!(row, &[0, 0, 0]);
        }
    }

    #[test]
    fn rows_come_back_in_index_order() {
        let mut matrix = ConvergenceMatrix::new(2, 3);
        matrix.write_row(2, &[20, 21]);
        matrix.write_row(0, &[0, 1]);
        matrix.write_row(1, &[10, 11]);
        let rows: Vec<&[u32]> = matrix.rows().collect();
        assert_eq!(rows, vec![&[0, 1][..], &[10, 11][..], &[20, 21][..]]);
        assert_eq!(matrix.cell(1, 2), 21);
    }

    #[test]
    fn equality_ignores_construction_order() {
        let mut a = ConvergenceMatrix::new(2, 2);
        a.write_row(0, &[1, 2]);
        a.write_row(1, &[3, 4]);
        let mut b = ConvergenceMatrix::new(2, 2);
        b.write_row(1, &[3, 4]);
        b.write_row(0, &[1, 2]);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic]
    fn short_rows_are_rejected() {
        let mut matrix = ConvergenceMatrix::new(3, 1);
        matrix.write_row(0, &[1, 2]);
    }
}
