//! Test utilities and mock types for Droplet development.
//!
//! Provides [`MockCells`], a flat list of synthetic cells implementing
//! [`FieldAccess`], and parameter fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use droplet_core::{Cell, CellId, FieldAccess, FieldId};

/// Mock implementation of [`FieldAccess`] over a plain cell list.
///
/// Values live in one `Vec<f64>` per field. There is no mesh and no
/// neighbourhood, which is exactly what pure initialization and diagnostic
/// code is allowed to see.
#[derive(Clone, Debug)]
pub struct MockCells {
    cells: Vec<Cell>,
    values: Vec<Vec<f64>>,
}

impl MockCells {
    /// Cells as given, with `field_count` zeroed fields. Cell IDs are
    /// renumbered to match their position.
    pub fn from_cells(cells: Vec<Cell>, field_count: usize) -> Self {
        let cells: Vec<Cell> = cells
            .into_iter()
            .enumerate()
            .map(|(n, c)| Cell { id: CellId(n), ..c })
            .collect();
        let values = vec![vec![0.0; cells.len()]; field_count];
        Self { cells, values }
    }

    /// A uniform `2^level x 2^level` patch of side `size` at the origin.
    pub fn uniform(size: f64, level: u8, field_count: usize) -> Self {
        let n = 1usize << level;
        let delta = size / n as f64;
        let cells = (0..n * n)
            .map(|k| Cell {
                id: CellId(k),
                level,
                x: ((k % n) as f64 + 0.5) * delta,
                y: ((k / n) as f64 + 0.5) * delta,
                delta,
            })
            .collect();
        Self::from_cells(cells, field_count)
    }

    /// Overwrite a whole field.
    pub fn set_field(&mut self, field: FieldId, data: Vec<f64>) {
        assert_eq!(data.len(), self.cells.len(), "one value per cell");
        self.values[field.0 as usize] = data;
    }

    /// Read back a whole field for assertions.
    pub fn field(&self, field: FieldId) -> &[f64] {
        &self.values[field.0 as usize]
    }

    /// The same cells and values in a different visiting order:
    /// `order[n]` is the old position of the new `n`-th cell.
    pub fn permuted(&self, order: &[usize]) -> Self {
        let cells = order.iter().map(|&o| self.cells[o]).collect();
        let mut out = Self::from_cells(cells, self.values.len());
        for (column, source) in out.values.iter_mut().zip(&self.values) {
            *column = order.iter().map(|&o| source[o]).collect();
        }
        out
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FieldAccess for MockCells {
    fn active_cells(&self) -> Vec<Cell> {
        self.cells.clone()
    }

    fn get(&self, field: FieldId, cell: CellId) -> f64 {
        self.values[field.0 as usize][cell.0]
    }

    fn set(&mut self, field: FieldId, cell: CellId, value: f64) {
        self.values[field.0 as usize][cell.0] = value;
    }
}
