//! Well dimensions and the constants derived from them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::piece::BOX_SIZE;

/// One settled row of the well, bit `x` = column `x` counted from the right wall.
pub type Row = u16;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum ConfigError {
    #[error("well width {0} is outside {min}..={max}", min = WellConfig::MIN_WIDTH, max = WellConfig::MAX_WIDTH)]
    Width(usize),
    #[error("well height {0} is outside {min}..={max}", min = WellConfig::MIN_HEIGHT, max = WellConfig::MAX_HEIGHT)]
    Height(usize),
    #[error("{0} spare rows cannot hold the spawn positions (need at least {min})", min = WellConfig::MIN_SPARE_ROWS)]
    SpareRows(usize),
}

/// Fixed geometry of the well.
///
/// Rows are numbered from the top of the hidden spawn area downwards, so the
/// visible region is `spare_rows..full_height()`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct WellConfig {
    width: usize,
    height: usize,
    spare_rows: usize,
}

impl WellConfig {
    /// The horizontal I piece needs the full bounding box.
    pub const MIN_WIDTH: usize = BOX_SIZE;
    pub const MAX_WIDTH: usize = Row::BITS as usize;
    pub const MIN_HEIGHT: usize = 1;
    pub const MAX_HEIGHT: usize = 64;
    /// Raised I/O/S/Z spawn boxes start three rows above the visible region.
    pub const MIN_SPARE_ROWS: usize = 2;
    pub const DEFAULT_SPARE_ROWS: usize = 2;

    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        Self::with_spare_rows(width, height, Self::DEFAULT_SPARE_ROWS)
    }

    pub fn with_spare_rows(
        width: usize,
        height: usize,
        spare_rows: usize,
    ) -> Result<Self, ConfigError> {
        if !(Self::MIN_WIDTH..=Self::MAX_WIDTH).contains(&width) {
            return Err(ConfigError::Width(width));
        }
        if !(Self::MIN_HEIGHT..=Self::MAX_HEIGHT).contains(&height) {
            return Err(ConfigError::Height(height));
        }
        if spare_rows < Self::MIN_SPARE_ROWS || spare_rows > Self::MAX_HEIGHT {
            return Err(ConfigError::SpareRows(spare_rows));
        }
        Ok(Self {
            width,
            height,
            spare_rows,
        })
    }

    /// Standard 10x20 playfield.
    pub fn standard() -> Self {
        Self {
            width: 10,
            height: 20,
            spare_rows: Self::DEFAULT_SPARE_ROWS,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Visible rows only.
    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn spare_rows(&self) -> usize {
        self.spare_rows
    }

    #[inline(always)]
    pub fn full_height(&self) -> usize {
        self.height + self.spare_rows
    }

    /// Row value with every column filled.
    #[inline(always)]
    pub fn full_row(&self) -> Row {
        Row::MAX >> (Row::BITS as usize - self.width)
    }

    /// Column shift that centres the bounding box in the well.
    pub fn margin(&self) -> i32 {
        (self.width as i32 - BOX_SIZE as i32).div_euclid(2)
    }

    /// Most pieces that fit in the well without completing a row.
    pub fn max_depth(&self) -> usize {
        self.full_height() * (self.width - 1) / 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_constants() {
        let config = WellConfig::standard();
        assert_eq!(config.full_height(), 22);
        assert_eq!(config.full_row(), 0x3FF);
        assert_eq!(config.margin(), 3);
        assert_eq!(config.max_depth(), 49);
    }

    #[test]
    fn test_odd_width_margin() {
        let config = WellConfig::new(5, 4).unwrap();
        assert_eq!(config.margin(), 0);
        assert_eq!(config.full_row(), 0b11111);
    }

    #[test]
    fn test_full_width_row() {
        let config = WellConfig::new(16, 4).unwrap();
        assert_eq!(config.full_row(), Row::MAX);
    }

    #[test]
    fn test_rejects_narrow_well() {
        assert_eq!(WellConfig::new(3, 20), Err(ConfigError::Width(3)));
        assert_eq!(WellConfig::new(17, 20), Err(ConfigError::Width(17)));
    }

    #[test]
    fn test_rejects_degenerate_height() {
        assert_eq!(WellConfig::new(4, 0), Err(ConfigError::Height(0)));
        assert_eq!(WellConfig::new(4, 65), Err(ConfigError::Height(65)));
    }

    #[test]
    fn test_rejects_missing_spawn_rows() {
        assert_eq!(
            WellConfig::with_spare_rows(4, 4, 1),
            Err(ConfigError::SpareRows(1))
        );
        assert!(WellConfig::with_spare_rows(4, 4, 3).is_ok());
    }
}
