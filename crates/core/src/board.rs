//! board representation - one row bitmask per well row
//! rows of settled cells only, the falling piece never lives here

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Row, WellConfig};

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum BoardError {
    #[error("expected {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[error("row {row} value {value:#b} is wider than the well")]
    RowTooWide { row: usize, value: Row },
}

/// Settled cells of the well, row 0 at the top of the hidden spawn area.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Board {
    rows: Vec<Row>,
    width: usize,
}

impl Board {
    pub fn empty(config: &WellConfig) -> Self {
        Self {
            rows: vec![0; config.full_height()],
            width: config.width(),
        }
    }

    /// Build from explicit rows, top row first.
    pub fn from_rows(config: &WellConfig, rows: &[Row]) -> Result<Self, BoardError> {
        if rows.len() != config.full_height() {
            return Err(BoardError::RowCount {
                expected: config.full_height(),
                actual: rows.len(),
            });
        }
        let full = config.full_row();
        if let Some((row, &value)) = rows.iter().enumerate().find(|(_, v)| **v & !full != 0) {
            return Err(BoardError::RowTooWide { row, value });
        }
        Ok(Self {
            rows: rows.to_vec(),
            width: config.width(),
        })
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[inline(always)]
    pub fn row(&self, y: usize) -> Row {
        self.rows[y]
    }

    #[inline(always)]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Raw mutable rows for the in-place merge/remove of the search.
    #[inline(always)]
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        (self.rows[y] >> x) & 1 == 1
    }

    pub fn set(&mut self, x: usize, y: usize, filled: bool) {
        debug_assert!(x < self.width, "column {x} outside well");
        if filled {
            self.rows[y] |= 1 << x;
        } else {
            self.rows[y] &= !(1 << x);
        }
    }

    /// Row value with every column filled.
    #[inline(always)]
    pub fn full_row(&self) -> Row {
        Row::MAX >> (Row::BITS as usize - self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }

    pub fn filled_cells(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &row in &self.rows {
            for x in (0..self.width).rev() {
                write!(f, "{}", if (row >> x) & 1 == 1 { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
