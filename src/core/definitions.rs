use std::error::Error;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::core::engine::{Color, Piece};
use crate::core::utils::Square;

/** Tag attached by the rules layer and carried through commit and undo
 * unchanged, so nobody has to re-derive what a move was from its shape. */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Normal,
    EnPassant,
    Promotion,
}

/** One legal destination for a piece. */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub to: Square,
    pub kind: MoveKind,
}

impl Candidate {
    #[inline]
    pub fn normal(to: Square) -> Candidate {
        Candidate {
            to,
            kind: MoveKind::Normal,
        }
    }
}

/** The most recently committed (origin, destination) pair. Owned by the
 * controller and handed by reference into en passant eligibility checks. */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub from: Square,
    pub to: Square,
}

/** History entry, reversed square for square by undo. */
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub number: u32,
    pub from: Square,
    pub to: Square,
    pub player: Color,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
}

/** A pawn sits on its promotion rank and waits for `Game::promote`. */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PromotionPrompt {
    pub square: Square,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    /** No piece on the origin square. */
    NoPiece,
    /** The piece belongs to the other player. */
    WrongColor,
    /** Destination is not in the piece's legal set. */
    Destination,
}

impl Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            IllegalMove::NoPiece => "there is no piece on that square",
            IllegalMove::WrongColor => "that piece belongs to the opponent",
            IllegalMove::Destination => "the piece cannot reach that square",
        })
    }
}

impl Error for IllegalMove {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NothingToUndo;

impl Display for NothingToUndo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("move history is empty")
    }
}

impl Error for NothingToUndo {}
