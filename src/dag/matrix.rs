// src/dag/matrix.rs

//! Dense boolean adjacency matrix.
//!
//! Cells are packed row-major into `u64` words. The dimensions are fixed at
//! construction; every accessor is bounds checked and returns
//! [`DagpipeError::IndexOutOfBounds`] instead of panicking.

use std::iter::FusedIterator;

use crate::errors::{DagpipeError, Result};

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-size `rows x columns` bit matrix.
///
/// Equality and hashing cover the dimensions and the bit content. Bits past
/// the last cell in the final word are always zero, so the derived impls are
/// exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryMatrix {
    rows: usize,
    columns: usize,
    words: Vec<u64>,
}

/// One cell visited by a row or column iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub row: usize,
    pub column: usize,
    pub value: bool,
}

impl BinaryMatrix {
    /// Create an all-zero matrix. Both dimensions must be at least 1.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(DagpipeError::InvalidDimensions { rows, columns });
        }

        let cells = rows
            .checked_mul(columns)
            .ok_or(DagpipeError::InvalidDimensions { rows, columns })?;

        Ok(Self {
            rows,
            columns,
            words: vec![0; cells.div_ceil(WORD_BITS)],
        })
    }

    /// Create an all-zero `size x size` matrix.
    pub fn square(size: usize) -> Result<Self> {
        Self::new(size, size)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// `true` if no cell is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn is_set(&self, row: usize, column: usize) -> Result<bool> {
        let bit = self.bit_index(row, column)?;
        Ok(self.bit(bit))
    }

    pub fn set(&mut self, row: usize, column: usize) -> Result<()> {
        self.set_value(row, column, true)
    }

    pub fn unset(&mut self, row: usize, column: usize) -> Result<()> {
        self.set_value(row, column, false)
    }

    pub fn set_value(&mut self, row: usize, column: usize, value: bool) -> Result<()> {
        let bit = self.bit_index(row, column)?;
        let mask = 1u64 << (bit % WORD_BITS);
        let word = &mut self.words[bit / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        Ok(())
    }

    /// Iterate every cell of `row` in increasing column order.
    ///
    /// Fails immediately if `row` is out of range.
    pub fn row_iter(&self, row: usize) -> Result<RowCells<'_>> {
        self.check_row(row)?;
        Ok(RowCells {
            matrix: self,
            row,
            next: 0,
        })
    }

    /// Iterate every cell of `column` in increasing row order.
    ///
    /// Fails immediately if `column` is out of range.
    pub fn column_iter(&self, column: usize) -> Result<ColumnCells<'_>> {
        self.check_column(column)?;
        Ok(ColumnCells {
            matrix: self,
            column,
            next: 0,
        })
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(DagpipeError::out_of_bounds("row", row, self.rows));
        }
        Ok(())
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column >= self.columns {
            return Err(DagpipeError::out_of_bounds("column", column, self.columns));
        }
        Ok(())
    }

    fn bit_index(&self, row: usize, column: usize) -> Result<usize> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(row * self.columns + column)
    }

    fn bit(&self, bit: usize) -> bool {
        (self.words[bit / WORD_BITS] >> (bit % WORD_BITS)) & 1 == 1
    }

    fn cursor(&self, row: usize, column: usize) -> Cursor {
        Cursor {
            row,
            column,
            value: self.bit(row * self.columns + column),
        }
    }
}

/// Cells of one matrix row, left to right.
#[derive(Debug, Clone)]
pub struct RowCells<'a> {
    matrix: &'a BinaryMatrix,
    row: usize,
    next: usize,
}

impl Iterator for RowCells<'_> {
    type Item = Cursor;

    fn next(&mut self) -> Option<Cursor> {
        if self.next >= self.matrix.columns {
            return None;
        }
        let cursor = self.matrix.cursor(self.row, self.next);
        self.next += 1;
        Some(cursor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.matrix.columns - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for RowCells<'_> {}
impl FusedIterator for RowCells<'_> {}

/// Cells of one matrix column, top to bottom.
#[derive(Debug, Clone)]
pub struct ColumnCells<'a> {
    matrix: &'a BinaryMatrix,
    column: usize,
    next: usize,
}

impl Iterator for ColumnCells<'_> {
    type Item = Cursor;

    fn next(&mut self) -> Option<Cursor> {
        if self.next >= self.matrix.rows {
            return None;
        }
        let cursor = self.matrix.cursor(self.next, self.column);
        self.next += 1;
        Some(cursor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.matrix.rows - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ColumnCells<'_> {}
impl FusedIterator for ColumnCells<'_> {}
