use std::collections::BTreeSet;

use log::{debug, trace};
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use crate::core::definitions::{
    Candidate, IllegalMove, LastMove, MoveKind, MoveRecord, NothingToUndo, PromotionPrompt,
};
use crate::core::engine::{Board, Color, Piece, PieceType};
use crate::core::utils::Square;

/** Turn and history controller. Owns the board for the whole match. */
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    current_player: Color,
    move_count: u32,
    history: Vec<MoveRecord>,
    last_move: Option<LastMove>,
    pending_promotion: Option<Square>,
}

impl Game {
    pub fn new() -> Game {
        Game::with_board(Board::new(), Color::White)
    }

    /** Custom position, mostly for tests and resumed matches. */
    pub fn with_board(board: Board, player: Color) -> Game {
        Game {
            board,
            current_player: player,
            move_count: 0,
            history: Vec::new(),
            last_move: None,
            pending_promotion: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /** Destinations for the piece on `origin` under the current marker. */
    pub fn possible_moves(&self, origin: Square) -> Vec<Candidate> {
        self.board.possible_moves(origin, self.last_move)
    }

    /** Squares of `color` pieces the opponent can reach right now. */
    pub fn threatened_squares(&self, color: Color) -> BTreeSet<Square> {
        self.board.under_attack(color, self.last_move)
    }

    /** The king of `color` stands on a threatened square. */
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board
            .find_king(color)
            .map_or(false, |square| self.threatened_squares(color).contains(&square))
    }

    /** Commit a move for the side to move. On success the turn passes; a
     * returned prompt means a pawn waits on its promotion rank for
     * `promote`. The board is untouched on rejection. */
    pub fn commit_move(
        &mut self,
        from: Square,
        to: Square,
    ) -> Result<Option<PromotionPrompt>, IllegalMove> {
        let piece = self.board.get(from).ok_or(IllegalMove::NoPiece)?;
        if piece.color != self.current_player {
            return Err(IllegalMove::WrongColor);
        }
        let candidate = self
            .possible_moves(from)
            .into_iter()
            .find(|candidate| candidate.to == to)
            .ok_or(IllegalMove::Destination)?;
        trace!(
            "{} {:?} {:?} -> {:?} ({:?})",
            piece.color,
            piece.kind,
            from,
            to,
            candidate.kind
        );
        self.pending_promotion = None;
        let captured = match candidate.kind {
            MoveKind::EnPassant => self.board.get(behind(to, piece.color)),
            MoveKind::Normal | MoveKind::Promotion => self.board.get(to),
        };
        if piece.kind == PieceType::Mimic {
            // swap, nothing leaves the board
            let partner = self.board.get(to);
            self.board.place(from, partner);
            self.board.place(to, Some(piece));
        } else {
            self.board.move_piece(from, to);
            if candidate.kind == MoveKind::EnPassant {
                self.board.place(behind(to, piece.color), None);
            }
        }
        let prompt = if candidate.kind == MoveKind::Promotion {
            self.pending_promotion = Some(to);
            Some(PromotionPrompt {
                square: to,
                color: piece.color,
            })
        } else {
            None
        };
        self.move_count += 1;
        self.history.push(MoveRecord {
            number: self.move_count,
            from,
            to,
            player: piece.color,
            captured,
            kind: candidate.kind,
        });
        self.last_move = Some(LastMove { from, to });
        self.current_player = self.current_player.opposite();
        Ok(prompt)
    }

    /** Replace the pawn waiting on its promotion rank. Anything but a rook,
     * knight, bishop or queen leaves the pawn where it stands; the pending
     * choice is consumed either way. */
    pub fn promote(&mut self, choice: PieceType) {
        let Some(square) = self.pending_promotion.take() else {
            return;
        };
        if !matches!(
            choice,
            PieceType::Rook | PieceType::Knight | PieceType::Bishop | PieceType::Queen
        ) {
            debug!("promotion declined, {:?} is not a valid replacement", choice);
            return;
        }
        if let Some(pawn) = self.board.get(square) {
            debug!("promoting {} pawn on {:?} to {:?}", pawn.color, square, choice);
            self.board.place(square, Some(Piece::new(choice, pawn.color)));
        }
    }

    /** Reverse the most recent move: the mover returns to its origin, the
     * captured snapshot (or the mimic's swap partner) returns to its square
     * and the marker is recomputed from the remaining history. A promoted
     * piece is NOT demoted back to a pawn. */
    pub fn undo(&mut self) -> Result<(), NothingToUndo> {
        let record = self.history.pop().ok_or(NothingToUndo)?;
        trace!(
            "undoing move #{}: {:?} -> {:?}",
            record.number,
            record.from,
            record.to
        );
        self.pending_promotion = None;
        self.board.move_piece(record.to, record.from);
        match record.kind {
            MoveKind::EnPassant => self
                .board
                .place(behind(record.to, record.player), record.captured),
            MoveKind::Normal | MoveKind::Promotion => self.board.place(record.to, record.captured),
        }
        self.move_count -= 1;
        self.current_player = self.current_player.opposite();
        self.last_move = self.history.last().map(|record| LastMove {
            from: record.from,
            to: record.to,
        });
        Ok(())
    }

    /** Uniformly random legal move for the side to move, promoting to a
     * queen when a pawn comes through. `None` when no piece can move. */
    pub fn make_random_move(&mut self) -> Option<MoveRecord> {
        let options: Vec<(Square, Candidate)> = self
            .board
            .iter_pieces()
            .filter(|(_, piece)| piece.color == self.current_player)
            .flat_map(|(square, _)| {
                self.board
                    .possible_moves(square, self.last_move)
                    .into_iter()
                    .map(move |candidate| (square, candidate))
            })
            .collect();
        let (from, candidate) = options.into_iter().choose(&mut rand::thread_rng())?;
        let prompt = self
            .commit_move(from, candidate.to)
            .expect("generated move must be legal");
        if prompt.is_some() {
            self.promote(PieceType::Queen);
        }
        self.history.last().copied()
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

/** The square a just-captured pawn sat on: one rank behind `to` from the
 * mover's perspective. */
#[inline]
fn behind(to: Square, mover: Color) -> Square {
    to.offset(-mover.pawn_direction(), 0)
}
