use std::collections::BTreeSet;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::core::definitions::{Candidate, LastMove, MoveKind};
use crate::core::utils::{ray, Square};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        if self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    /** Rank delta of one forward pawn step. White pawns walk toward rank 0. */
    #[inline]
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /** Rank a pawn double-steps from. */
    #[inline]
    pub fn pawn_home_rank(self) -> i8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /** Rank a pawn promotes on. */
    #[inline]
    pub fn promotion_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(if self == &Self::White {
            "White"
        } else {
            "Black"
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
    Mimic,
    Pegasus,
    Ninja,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceType, color: Color) -> Piece {
        Piece { kind, color }
    }

    /** Board glyph, uppercase for white and lowercase for black. */
    pub fn glyph(&self) -> char {
        let glyph = match self.kind {
            PieceType::Pawn => 'P',
            PieceType::Rook => 'R',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
            PieceType::Mimic => 'M',
            PieceType::Pegasus => 'G',
            PieceType::Ninja => 'J',
        };
        match self.color {
            Color::White => glyph,
            Color::Black => glyph.to_ascii_lowercase(),
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/** Tables of directions for pieces */
const ROOK_DIR: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIR: [(i8, i8); 4] = [(-1, -1), (1, 1), (-1, 1), (1, -1)];
const QUEEN_DIR: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];
const KNIGHT_STEPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/** Reused vectors: the king steps where the queen slides, the pegasus slides
 * where the knight leaps. */
const KING_STEPS: [(i8, i8); 8] = QUEEN_DIR;
const PEGASUS_DIR: [(i8, i8); 8] = KNIGHT_STEPS;
/** King steps doubled in magnitude. The skipped square is never examined. */
const NINJA_STEPS: [(i8, i8); 8] = [
    (2, 0),
    (-2, 0),
    (0, 2),
    (0, -2),
    (2, 2),
    (2, -2),
    (-2, 2),
    (-2, -2),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /** Empty board, mostly useful for building test positions. */
    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /** Starting position: the standard army plus pegasi, mimics and ninjas.
     * The ninjas take the flank pawns' squares. */
    pub fn new() -> Board {
        use PieceType::*;
        let mut board = Board::empty();
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        for (rank, color) in [(0, Color::Black), (7, Color::White)] {
            for (file, kind) in back_rank.into_iter().enumerate() {
                board.place(Square::new(rank, file as i8), Some(Piece::new(kind, color)));
            }
        }
        for color in [Color::Black, Color::White] {
            let pawn_rank = color.pawn_home_rank();
            let custom_rank = pawn_rank + color.pawn_direction();
            for file in 1..7 {
                board.place(
                    Square::new(pawn_rank, file),
                    Some(Piece::new(Pawn, color)),
                );
            }
            for file in [0, 7] {
                board.place(
                    Square::new(pawn_rank, file),
                    Some(Piece::new(Ninja, color)),
                );
                board.place(
                    Square::new(custom_rank, file),
                    Some(Piece::new(Pegasus, color)),
                );
            }
            for file in [2, 5] {
                board.place(
                    Square::new(custom_rank, file),
                    Some(Piece::new(Mimic, color)),
                );
            }
        }
        board
    }

    /** Occupant lookup. Out-of-range squares read as empty, never a fault. */
    pub fn get(&self, square: Square) -> Option<Piece> {
        if square.is_valid() {
            self.squares[square.rank as usize][square.file as usize]
        } else {
            None
        }
    }

    /** Unconditional overwrite. Out-of-range squares are silently ignored. */
    pub fn place(&mut self, square: Square, piece: Option<Piece>) {
        if square.is_valid() {
            self.squares[square.rank as usize][square.file as usize] = piece;
        }
    }

    /** Relocate the occupant of `from` to `to`, clearing `from`. Plain
     * relocation: special moves are described by their `MoveKind` and
     * resolved by the controller. */
    pub fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.get(from);
        self.place(to, piece);
        self.place(from, None);
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.iter_pieces()
            .find(|(_, piece)| piece.kind == PieceType::King && piece.color == color)
            .map(|(square, _)| square)
    }

    /** Occupied squares in scan order. */
    pub fn iter_pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..8).flat_map(move |rank| {
            (0..8).filter_map(move |file| {
                let square = Square::new(rank, file);
                self.get(square).map(|piece| (square, piece))
            })
        })
    }

    /** Legal destinations for the piece on `origin`; empty when the square
     * is empty or off the board. Two phases: raw candidates first, then the
     * same-color filter. The split lets the mimic borrow raw patterns. */
    pub fn possible_moves(&self, origin: Square, last_move: Option<LastMove>) -> Vec<Candidate> {
        let Some(piece) = self.get(origin) else {
            return Vec::new();
        };
        let mut moves = self.raw_moves(piece, origin, last_move);
        moves.retain(|candidate| {
            self.get(candidate.to)
                .map_or(true, |occupant| occupant.color != piece.color)
        });
        moves
    }

    fn raw_moves(&self, piece: Piece, origin: Square, last_move: Option<LastMove>) -> Vec<Candidate> {
        match piece.kind {
            PieceType::Pawn => self.pawn_moves(piece.color, origin, last_move),
            PieceType::Rook => self.sliding_moves(origin, &ROOK_DIR),
            PieceType::Bishop => self.sliding_moves(origin, &BISHOP_DIR),
            PieceType::Queen => self.sliding_moves(origin, &QUEEN_DIR),
            PieceType::Pegasus => self.sliding_moves(origin, &PEGASUS_DIR),
            PieceType::Knight => self.stepping_moves(origin, &KNIGHT_STEPS),
            PieceType::King => self.stepping_moves(origin, &KING_STEPS),
            PieceType::Ninja => self.stepping_moves(origin, &NINJA_STEPS),
            PieceType::Mimic => self.mimic_moves(origin),
        }
    }

    /** Walk each direction until the edge. The first occupied square is
     * included and ends the walk. */
    fn sliding_moves(&self, origin: Square, directions: &[(i8, i8)]) -> Vec<Candidate> {
        let mut moves = Vec::new();
        for &step in directions {
            for square in ray(origin, step) {
                moves.push(Candidate::normal(square));
                if self.get(square).is_some() {
                    break;
                }
            }
        }
        moves
    }

    /** One square per direction, occupants don't block. */
    fn stepping_moves(&self, origin: Square, directions: &[(i8, i8)]) -> Vec<Candidate> {
        directions
            .iter()
            .map(|&(d_rank, d_file)| origin.offset(d_rank, d_file))
            .filter(|square| square.is_valid())
            .map(Candidate::normal)
            .collect()
    }

    fn pawn_moves(&self, color: Color, origin: Square, last_move: Option<LastMove>) -> Vec<Candidate> {
        let direction = color.pawn_direction();
        let mut moves = Vec::new();
        // push
        let front = origin.offset(direction, 0);
        if front.is_valid() && self.get(front).is_none() {
            moves.push(Candidate {
                to: front,
                kind: pawn_move_kind(front, color),
            });
        }
        // double push
        if origin.rank == color.pawn_home_rank() {
            let jump = origin.offset(direction * 2, 0);
            if self.get(front).is_none() && self.get(jump).is_none() {
                moves.push(Candidate::normal(jump));
            }
        }
        // en passant
        if let Some(candidate) = self.en_passant_move(color, origin, last_move) {
            moves.push(candidate);
        }
        // captures: diagonals are raw candidates only when occupied
        for side in [-1, 1] {
            let target = origin.offset(direction, side);
            if self.get(target).is_some() {
                moves.push(Candidate {
                    to: target,
                    kind: pawn_move_kind(target, color),
                });
            }
        }
        moves
    }

    /** Eligible only right after an opposing pawn double-steps past `origin`.
     * Recomputed from the marker on every query, never cached. */
    fn en_passant_move(
        &self,
        color: Color,
        origin: Square,
        last_move: Option<LastMove>,
    ) -> Option<Candidate> {
        let last = last_move?;
        let moved = self.get(last.to)?;
        if moved.kind != PieceType::Pawn || moved.color == color {
            return None;
        }
        if (last.to.rank - last.from.rank).abs() != 2 {
            return None;
        }
        if (last.to.file - origin.file).abs() != 1 || last.to.rank != origin.rank {
            return None;
        }
        Some(Candidate {
            to: Square::new(origin.rank + color.pawn_direction(), last.to.file),
            kind: MoveKind::EnPassant,
        })
    }

    /** The mimic has no movement of its own: it gets the union of every
     * adjacent occupant's raw pattern, re-originated on the mimic's square.
     * A pawn neighbor lends its own forward direction, an adjacent mimic
     * lends nothing. Borrowed moves are plain moves: a mimic swaps instead
     * of capturing and never promotes. */
    fn mimic_moves(&self, origin: Square) -> Vec<Candidate> {
        let mut moves: Vec<Candidate> = Vec::new();
        for &(d_rank, d_file) in &KING_STEPS {
            let Some(neighbor) = self.get(origin.offset(d_rank, d_file)) else {
                continue;
            };
            let borrowed = match neighbor.kind {
                PieceType::Rook => self.sliding_moves(origin, &ROOK_DIR),
                PieceType::Bishop => self.sliding_moves(origin, &BISHOP_DIR),
                PieceType::Queen => self.sliding_moves(origin, &QUEEN_DIR),
                PieceType::Pegasus => self.sliding_moves(origin, &PEGASUS_DIR),
                PieceType::Knight => self.stepping_moves(origin, &KNIGHT_STEPS),
                PieceType::King => self.stepping_moves(origin, &KING_STEPS),
                PieceType::Ninja => self.stepping_moves(origin, &NINJA_STEPS),
                PieceType::Pawn => self.pawn_moves(neighbor.color, origin, None),
                PieceType::Mimic => continue,
            };
            for candidate in borrowed {
                if !moves.iter().any(|known| known.to == candidate.to) {
                    moves.push(Candidate::normal(candidate.to));
                }
            }
        }
        moves
    }

    /** Every destination reachable by the pieces NOT of `excluded_color`.
     * Duplicates are kept: a square is listed once per attacker. */
    pub fn all_moves(&self, excluded_color: Color, last_move: Option<LastMove>) -> Vec<Square> {
        self.iter_pieces()
            .filter(|(_, piece)| piece.color != excluded_color)
            .flat_map(|(square, _)| self.possible_moves(square, last_move))
            .map(|candidate| candidate.to)
            .collect()
    }

    /** Squares where pieces of `color` currently stand in the opponent's
     * reach. Display and check notification only; moving into danger is
     * not forbidden. */
    pub fn under_attack(&self, color: Color, last_move: Option<LastMove>) -> BTreeSet<Square> {
        self.all_moves(color, last_move)
            .into_iter()
            .filter(|&square| {
                self.get(square)
                    .map_or(false, |piece| piece.color == color)
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

fn pawn_move_kind(to: Square, color: Color) -> MoveKind {
    if to.rank == color.promotion_rank() {
        MoveKind::Promotion
    } else {
        MoveKind::Normal
    }
}
