//! Search results - who wins a well and how.

use hatetris_core::Piece;
use hatetris_engine::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Places the pieces and wants a completed row.
    Placer,
    /// Chooses the pieces and wants the well to overflow first.
    Adversary,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Placer => write!(f, "PLACER"),
            Role::Adversary => write!(f, "ADVERSARY"),
        }
    }
}

/// The landing that answers one piece kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Forcing {
    /// Completes a row immediately.
    Line(NodeId),
    /// Leaves a well the placer still wins.
    Survive(NodeId),
}

impl Forcing {
    #[inline]
    pub fn node(self) -> NodeId {
        match self {
            Forcing::Line(id) | Forcing::Survive(id) => id,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Verdict {
    /// One forcing landing per piece kind, indexed by `Piece::index`.
    Placer([Forcing; Piece::COUNT]),
    /// Handing over this piece kind beats every landing.
    Adversary(Piece),
}

impl Verdict {
    #[inline]
    pub fn winner(&self) -> Role {
        match self {
            Verdict::Placer(_) => Role::Placer,
            Verdict::Adversary(_) => Role::Adversary,
        }
    }

    pub fn forcing(&self, piece: Piece) -> Option<Forcing> {
        match self {
            Verdict::Placer(strategy) => Some(strategy[piece.index()]),
            Verdict::Adversary(_) => None,
        }
    }

    pub fn forcing_piece(&self) -> Option<Piece> {
        match self {
            Verdict::Placer(_) => None,
            Verdict::Adversary(piece) => Some(*piece),
        }
    }
}
