//! Piece kinds and their orientation masks.
//!
//! Original rotation system with a raised horizontal I piece and no kicks.
//! Each orientation is four rows of a 4x4 bounding box, top row first, bit 0
//! being the rightmost box column.

use serde::{Deserialize, Serialize};

/// Side of the square bounding box every orientation fits in.
pub const BOX_SIZE: usize = 4;

pub type Mask = [u8; BOX_SIZE];

const O_MASKS: &[Mask] = &[[0, 6, 6, 0]];
const I_MASKS: &[Mask] = &[[0, 15, 0, 0], [2, 2, 2, 2]];
const J_MASKS: &[Mask] = &[[8, 14, 0, 0], [6, 4, 4, 0], [0, 14, 2, 0], [4, 4, 12, 0]];
const L_MASKS: &[Mask] = &[[1, 7, 0, 0], [2, 2, 3, 0], [0, 7, 4, 0], [6, 2, 2, 0]];
const S_MASKS: &[Mask] = &[[0, 3, 6, 0], [2, 3, 1, 0]];
const T_MASKS: &[Mask] = &[[2, 7, 0, 0], [2, 3, 2, 0], [0, 7, 2, 0], [2, 6, 2, 0]];
const Z_MASKS: &[Mask] = &[[0, 6, 3, 0], [1, 3, 2, 0]];

/// The discriminant order is the fixed evaluation order of the solver: the
/// pieces that hurt the placer most come first, O leading because it has the
/// fewest placements and fails fastest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub enum Piece {
    O,
    I,
    J,
    L,
    S,
    T,
    Z,
}

impl Piece {
    pub const COUNT: usize = 7;

    pub const ALL: [Piece; Piece::COUNT] = [
        Piece::O,
        Piece::I,
        Piece::J,
        Piece::L,
        Piece::S,
        Piece::T,
        Piece::Z,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Piece::O => 'o',
            Piece::I => 'i',
            Piece::J => 'j',
            Piece::L => 'l',
            Piece::S => 's',
            Piece::T => 't',
            Piece::Z => 'z',
        }
    }

    pub fn masks(self) -> &'static [Mask] {
        match self {
            Piece::O => O_MASKS,
            Piece::I => I_MASKS,
            Piece::J => J_MASKS,
            Piece::L => L_MASKS,
            Piece::S => S_MASKS,
            Piece::T => T_MASKS,
            Piece::Z => Z_MASKS,
        }
    }

    #[inline]
    pub fn orientation_count(self) -> usize {
        self.masks().len()
    }

    /// Spawn column of the bounding box before centring, which depends on
    /// the parity of the well width.
    pub fn spawn_x(self, width: usize) -> i32 {
        let odd = width % 2 == 1;
        match self {
            Piece::O | Piece::I => i32::from(odd),
            Piece::J => 0,
            Piece::L | Piece::S | Piece::T | Piece::Z => 1,
        }
    }

    /// Spawn row of the bounding box, relative to the top of the hidden area.
    pub fn spawn_y(self, spare_rows: usize) -> i32 {
        let spare = spare_rows as i32;
        match self {
            Piece::O | Piece::I | Piece::S | Piece::Z => spare - 3,
            Piece::J | Piece::L | Piece::T => spare - 2,
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter().to_ascii_uppercase())
    }
}
