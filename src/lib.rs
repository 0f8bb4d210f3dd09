pub mod core;

// module re-exports
pub use crate::core::definitions::{
    Candidate, IllegalMove, LastMove, MoveKind, MoveRecord, NothingToUndo, PromotionPrompt,
};
pub use crate::core::engine::{Board, Color, Piece, PieceType};
pub use crate::core::game::Game;
pub use crate::core::utils::Square;
