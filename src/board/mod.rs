//! Value-typed Othello position: the `Board` struct, the `Side` and `Action`
//! types it is built from, and the 65-character textual interchange format.

pub mod bitboard;

use crate::error::{IllegalMoveError, ParseError};

/// Which color is currently on move. `Board` only ever reasons in terms of
/// "own" (the side to move) and "opp"; `Side` exists for parsing, printing,
/// and telling the two colors apart across a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

/// A single move: a placement at 1-based `(row, col)`, or a pass. Carries no
/// score — search hands back a separate `ScoredAction { action, score }`
/// pair rather than aliasing a mutable field on a shared `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Place { row: u8, col: u8 },
    Pass,
}

impl Action {
    /// The 0-based `r*8+c` bit index for a placement, or `None` for `Pass`
    /// or coordinates outside `1..=8`.
    pub fn bit_index(self) -> Option<u8> {
        match self {
            Action::Pass => None,
            Action::Place { row, col } => {
                if (1..=8).contains(&row) && (1..=8).contains(&col) {
                    Some((row - 1) * 8 + (col - 1))
                } else {
                    None
                }
            }
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Place { row, col } => write!(f, "({row},{col})"),
            Action::Pass => write!(f, "pass"),
        }
    }
}

/// Which stage of the game a position is in, derived from the total disc
/// count. Not stored on `Board`; always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Early,
    Mid,
    Late,
}

/// An immutable Othello position: three 64-bit masks (`own`, `opp`, `empty`)
/// plus the `Side` that `own` currently represents. Every mutation returns a
/// new `Board`; there is no in-place update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    own: u64,
    opp: u64,
    empty: u64,
    side_to_move: Side,
}

impl Board {
    fn from_own_opp(own: u64, opp: u64, side_to_move: Side) -> Board {
        debug_assert_eq!(own & opp, 0, "own and opp must not overlap");
        Board { own, opp, empty: !(own | opp), side_to_move }
    }

    pub fn own_mask(&self) -> u64 {
        self.own
    }

    pub fn opp_mask(&self) -> u64 {
        self.opp
    }

    pub fn empty_mask(&self) -> u64 {
        self.empty
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn total_discs(&self) -> u32 {
        (self.own | self.opp).count_ones()
    }

    pub fn phase(&self) -> Phase {
        match self.total_discs() {
            n if n < 20 => Phase::Early,
            n if n < 45 => Phase::Mid,
            _ => Phase::Late,
        }
    }

    /// The board with `own`/`opp` swapped and `side_to_move` flipped,
    /// representing the same physical position from the other player's
    /// perspective. Used to test the evaluator's side symmetry.
    pub fn color_swapped(&self) -> Board {
        Board { own: self.opp, opp: self.own, empty: self.empty, side_to_move: self.side_to_move.other() }
    }

    /// The legal actions available to the side to move: every placement
    /// reachable by a capture, or `[Pass]` if none exist.
    pub fn legal_actions(&self) -> Vec<Action> {
        let mask = bitboard::legal_moves_mask(self.own, self.opp, self.empty);
        if mask == 0 {
            return vec![Action::Pass];
        }
        let mut actions = Vec::with_capacity(mask.count_ones() as usize);
        let mut remaining = mask;
        while remaining != 0 {
            let bit = remaining.trailing_zeros() as u8;
            actions.push(Action::Place { row: bit / 8 + 1, col: bit % 8 + 1 });
            remaining &= remaining - 1;
        }
        actions
    }

    /// Applies `action`, returning the resulting board and the number of
    /// discs flipped (`0` for a pass). Fails with `IllegalMoveError` if the
    /// action is not legal in this position — callers that only ever apply
    /// actions drawn from `legal_actions` should treat this as unreachable.
    pub fn apply(&self, action: Action) -> Result<(Board, u32), IllegalMoveError> {
        match action {
            Action::Pass => {
                let next = Board::from_own_opp(self.opp, self.own, self.side_to_move.other());
                Ok((next, 0))
            }
            Action::Place { row, col } => {
                let bit = action
                    .bit_index()
                    .ok_or(IllegalMoveError::OutOfRange { row, col })?;
                let placed = 1u64 << bit;
                if self.empty & placed == 0 {
                    return Err(IllegalMoveError::OccupiedSquare { row, col });
                }
                let captured = bitboard::captured_mask(self.own, self.opp, placed);
                if captured == 0 {
                    return Err(IllegalMoveError::NoCapture { row, col });
                }
                let own = self.own | placed | captured;
                let opp = self.opp & !captured;
                let next = Board::from_own_opp(opp, own, self.side_to_move.other());
                Ok((next, captured.count_ones()))
            }
        }
    }

    /// Parses the external 65-character form: byte 0 is the side to move
    /// (`W`/`B`); bytes 1..=64, row-major from `(1,1)` to `(8,8)`, are one of
    /// `O` (white), `X` (black), `E` (empty).
    pub fn from_position_string(s: &str) -> Result<Board, ParseError> {
        let bytes: Vec<char> = s.chars().collect();
        if bytes.len() != 65 {
            return Err(ParseError::WrongLength(bytes.len()));
        }
        let side_to_move = match bytes[0] {
            'W' => Side::White,
            'B' => Side::Black,
            other => return Err(ParseError::InvalidSide(other)),
        };
        let mut white = 0u64;
        let mut black = 0u64;
        for (i, &c) in bytes[1..].iter().enumerate() {
            match c {
                'O' => white |= 1u64 << i,
                'X' => black |= 1u64 << i,
                'E' => {}
                other => return Err(ParseError::InvalidSquare(other, i)),
            }
        }
        let (own, opp) = match side_to_move {
            Side::White => (white, black),
            Side::Black => (black, white),
        };
        Ok(Board::from_own_opp(own, opp, side_to_move))
    }

    /// The inverse of `from_position_string`.
    pub fn to_position_string(&self) -> String {
        let (white, black) = match self.side_to_move {
            Side::White => (self.own, self.opp),
            Side::Black => (self.opp, self.own),
        };
        let mut out = String::with_capacity(65);
        out.push(match self.side_to_move {
            Side::White => 'W',
            Side::Black => 'B',
        });
        for i in 0..64u64 {
            let bit = 1u64 << i;
            out.push(if white & bit != 0 {
                'O'
            } else if black & bit != 0 {
                'X'
            } else {
                'E'
            });
        }
        out
    }

    /// Standard Othello starting position, white to move.
    pub fn initial() -> Board {
        // White (to move) at bits 27/36; black (opponent) at bits 28/35,
        // matching the canonical 65-character position string.
        let own = (1u64 << 27) | (1u64 << 36);
        let opp = (1u64 << 28) | (1u64 << 35);
        Board::from_own_opp(own, opp, Side::White)
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_position_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const INITIAL_STRING: &str =
        "WEEEEEEEEEEEEEEEEEEEEEEEEEEEOXEEEEEEXOEEEEEEEEEEEEEEEEEEEEEEEEEEE";

    #[test]
    fn initial_matches_the_canonical_position_string() {
        assert_eq!(Board::initial(), Board::from_position_string(INITIAL_STRING).unwrap());
    }

    #[test]
    fn initial_board_has_four_legal_moves() {
        let board = Board::initial();
        let actions = board.legal_actions();
        assert_eq!(actions.len(), 4);
        for expected in [(3, 5), (4, 6), (5, 3), (6, 4)] {
            assert!(actions.contains(&Action::Place { row: expected.0, col: expected.1 }));
        }
    }

    #[test]
    fn playing_three_five_flips_exactly_one_disc() {
        let board = Board::initial();
        let (_, flips) = board.apply(Action::Place { row: 3, col: 5 }).unwrap();
        assert_eq!(flips, 1);
    }

    #[test]
    fn apply_flips_side_to_move() {
        let board = Board::initial();
        let (next, _) = board.apply(Action::Place { row: 3, col: 5 }).unwrap();
        assert_eq!(next.side_to_move(), Side::White.other());
    }

    #[test]
    fn occupied_square_is_illegal() {
        let board = Board::initial();
        let err = board.apply(Action::Place { row: 4, col: 4 }).unwrap_err();
        assert_eq!(err, IllegalMoveError::OccupiedSquare { row: 4, col: 4 });
    }

    #[test]
    fn empty_square_with_no_capture_is_illegal() {
        let board = Board::initial();
        let err = board.apply(Action::Place { row: 1, col: 1 }).unwrap_err();
        assert_eq!(err, IllegalMoveError::NoCapture { row: 1, col: 1 });
    }

    #[test]
    fn round_trip_through_position_string_is_lossless() {
        let board = Board::initial();
        let (next, _) = board.apply(Action::Place { row: 3, col: 5 }).unwrap();
        let round_tripped = Board::from_position_string(&next.to_position_string()).unwrap();
        assert_eq!(next, round_tripped);
    }

    #[test]
    fn wrong_length_is_reported() {
        assert_eq!(Board::from_position_string("W"), Err(ParseError::WrongLength(1)));
    }

    #[test]
    fn bad_alphabet_is_reported() {
        let mut s = INITIAL_STRING.to_string();
        s.replace_range(5..6, "Q");
        assert_eq!(Board::from_position_string(&s), Err(ParseError::InvalidSquare('Q', 4)));
    }

    fn pick_action(board: &Board, pick: usize) -> Action {
        let actions = board.legal_actions();
        actions[pick % actions.len()]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn masks_stay_disjoint_and_exhaustive(picks in proptest::collection::vec(0usize..12, 0..40)) {
            let mut board = Board::initial();
            let mut consecutive_passes = 0;
            for pick in picks {
                if consecutive_passes >= 2 {
                    break;
                }
                let action = pick_action(&board, pick);
                consecutive_passes = if action == Action::Pass { consecutive_passes + 1 } else { 0 };
                let (next, _) = board.apply(action).unwrap();
                prop_assert_eq!(next.own_mask() & next.opp_mask(), 0);
                prop_assert_eq!(next.own_mask() | next.opp_mask() | next.empty_mask(), u64::MAX);
                board = next;
            }
        }

        #[test]
        fn disc_count_and_turn_alternate_correctly(picks in proptest::collection::vec(0usize..12, 0..40)) {
            let mut board = Board::initial();
            let mut consecutive_passes = 0;
            for pick in picks {
                if consecutive_passes >= 2 {
                    break;
                }
                let action = pick_action(&board, pick);
                let before_total = board.total_discs();
                let before_side = board.side_to_move();
                consecutive_passes = if action == Action::Pass { consecutive_passes + 1 } else { 0 };
                let (next, flips) = board.apply(action).unwrap();
                prop_assert_eq!(next.side_to_move(), before_side.other());
                match action {
                    Action::Pass => {
                        prop_assert_eq!(flips, 0);
                        prop_assert_eq!(next.total_discs(), before_total);
                    }
                    Action::Place { .. } => {
                        prop_assert!(flips >= 1);
                        prop_assert_eq!(next.total_discs(), before_total + 1);
                    }
                }
                board = next;
            }
        }
    }
}
