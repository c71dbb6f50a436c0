//! Grid evaluator: the frozen network over a regular R1 × R2 grid.
//!
//! Row k (arena size) and column j (cooling rate) sit at normalized
//! coordinates 0.1 + 0.9 k / R1 and 0.1 + 0.9 j / R2. Cells are stored
//! row-major. Evaluation only reads the network, so rows are independent.

use crate::mechanics::axis;
use crate::systems::trainer::FrozenNetwork;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    /// R1, arena size axis.
    pub rows: usize,
    /// R2, cooling rate axis.
    pub cols: usize,
}

impl GridSpec {
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn row_coord(&self, row: usize) -> f64 {
        axis::coord(row, self.rows)
    }

    #[inline]
    pub fn col_coord(&self, col: usize) -> f64 {
        axis::coord(col, self.cols)
    }

    /// Normalized inputs for every cell, row-major.
    pub fn coords(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        (0..self.rows)
            .flat_map(move |r| (0..self.cols).map(move |c| [self.row_coord(r), self.col_coord(c)]))
    }

    /// Flat index `col + row * cols` from the rounded row and column of a
    /// normalized (arena, cooling) pair. `None` when the flat index falls
    /// outside [0, R1 * R2); an out-of-range column alone is not rejected and
    /// wraps into the adjacent row.
    pub fn cell_index(&self, normalized: [f64; 2]) -> Option<usize> {
        let row = axis::cell_of(normalized[0], self.rows);
        let col = axis::cell_of(normalized[1], self.cols);
        let flat = col + row * self.cols as i64;
        (flat >= 0 && flat < self.cells() as i64).then_some(flat as usize)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PredictionGrid {
    spec: GridSpec,
    values: Vec<f64>,
}

impl PredictionGrid {
    /// `None` if `values` does not hold exactly one value per cell.
    pub fn from_values(spec: GridSpec, values: Vec<f64>) -> Option<Self> {
        (values.len() == spec.cells()).then_some(Self { spec, values })
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.spec.rows && col < self.spec.cols {
            Some(self.values[row * self.spec.cols + col])
        } else {
            None
        }
    }

    /// Overwrite one cell by flat index. Returns false (and changes nothing)
    /// when the index is out of range.
    pub fn set_flat(&mut self, index: usize, value: f64) -> bool {
        match self.values.get_mut(index) {
            Some(v) => {
                *v = value;
                true
            }
            None => false,
        }
    }
}

fn fill_row(net: &FrozenNetwork, spec: GridSpec, row: usize, out: &mut [f64]) {
    let x1 = spec.row_coord(row);
    for (col, v) in out.iter_mut().enumerate() {
        *v = net.compute(&[x1, spec.col_coord(col)]);
    }
}

#[cfg(feature = "parallel")]
fn fill_rows(net: &FrozenNetwork, spec: GridSpec, values: &mut [f64]) {
    use rayon::prelude::*;
    values
        .par_chunks_mut(spec.cols)
        .enumerate()
        .for_each(|(row, out)| fill_row(net, spec, row, out));
}

#[cfg(not(feature = "parallel"))]
fn fill_rows(net: &FrozenNetwork, spec: GridSpec, values: &mut [f64]) {
    for (row, out) in values.chunks_mut(spec.cols).enumerate() {
        fill_row(net, spec, row, out);
    }
}

/// Evaluate `net` on every cell of `spec`.
pub fn evaluate(net: &FrozenNetwork, spec: GridSpec) -> PredictionGrid {
    let mut values = vec![0.0; spec.cells()];
    if spec.cols > 0 {
        fill_rows(net, spec, &mut values);
    }
    PredictionGrid { spec, values }
}
