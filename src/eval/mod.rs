//! Phased heuristic evaluation and the static move-ordering priority used by
//! search before it ever calls the evaluator.

use crate::board::{bitboard, Action, Board, Phase};

const fn mask_from_bits(bits: &[u8]) -> u64 {
    let mut m = 0u64;
    let mut i = 0;
    while i < bits.len() {
        m |= 1u64 << bits[i];
        i += 1;
    }
    m
}

const CORNERS: u64 = mask_from_bits(&[0, 7, 56, 63]);
const X_SQUARES: u64 = mask_from_bits(&[9, 14, 49, 54]);
const C_SQUARES: u64 = mask_from_bits(&[1, 8, 6, 15, 48, 57, 55, 62]);
const EDGES: u64 = mask_from_bits(&[
    1, 2, 3, 4, 5, 6, // top, excluding corners
    57, 58, 59, 60, 61, 62, // bottom, excluding corners
    8, 16, 24, 32, 40, 48, // left, excluding corners
    15, 23, 31, 39, 47, 55, // right, excluding corners
]);

/// Each X-square paired with the corner it sits diagonally adjacent to; the
/// penalty for owning the X-square is waived once that corner is owned.
const X_SQUARE_CORNERS: [(u8, u8); 4] = [(9, 0), (14, 7), (49, 56), (54, 63)];

/// Each board edge as an ordered run of eight squares from one corner to the
/// other, used to approximate edge stability.
const EDGE_RUNS: [[u8; 8]; 4] = [
    [0, 1, 2, 3, 4, 5, 6, 7],
    [56, 57, 58, 59, 60, 61, 62, 63],
    [0, 8, 16, 24, 32, 40, 48, 56],
    [7, 15, 23, 31, 39, 47, 55, 63],
];

/// A stateless phased evaluator: `evaluate` scores a position from the
/// perspective of its side to move, and `move_priority` orders candidate
/// moves before the evaluator is ever invoked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Higher is better for `board`'s side to move. Side-symmetric: negating
    /// every own/opp-relative term means `evaluate(b) == -evaluate(b.color_swapped())`.
    pub fn evaluate(board: &Board) -> i64 {
        let own = board.own_mask();
        let opp = board.opp_mask();
        let empty = board.empty_mask();

        let corner_diff = popcount_diff(own & CORNERS, opp & CORNERS);
        let stability_diff = popcount_diff(stable_mask(own), stable_mask(opp));

        match board.phase() {
            Phase::Early => {
                let own_mobility = bitboard::legal_moves_mask(own, opp, empty).count_ones() as i64;
                let opp_mobility = bitboard::legal_moves_mask(opp, own, empty).count_ones() as i64;
                let mobility_diff = own_mobility - opp_mobility;

                let frontier_diff = popcount_diff(
                    bitboard::frontier_mask(own, empty),
                    bitboard::frontier_mask(opp, empty),
                );

                let x_square_diff = x_square_penalty_diff(own, opp, false);
                let c_square_diff = popcount_diff(own & C_SQUARES, opp & C_SQUARES);

                mobility_diff * 8
                    + frontier_diff * -2
                    + corner_diff * 30
                    + x_square_diff * -12
                    + c_square_diff * -6
            }
            Phase::Mid => {
                let own_mobility = bitboard::legal_moves_mask(own, opp, empty).count_ones() as i64;
                let opp_mobility = bitboard::legal_moves_mask(opp, own, empty).count_ones() as i64;
                let mobility_diff = own_mobility - opp_mobility;

                let edge_diff = popcount_diff(own & EDGES, opp & EDGES);
                let x_square_diff = x_square_penalty_diff(own, opp, true);
                let c_square_diff = popcount_diff(own & C_SQUARES, opp & C_SQUARES);

                mobility_diff * 5
                    + corner_diff * 30
                    + stability_diff * 10
                    + edge_diff * 3
                    + x_square_diff * -6
                    + c_square_diff * -4
            }
            Phase::Late => {
                let piece_diff = popcount_diff(own, opp);
                let empties = 64 - board.total_discs() as i64;
                let parity_term = if empties % 2 != 0 {
                    (own.count_ones() as i64 - opp.count_ones() as i64).signum() * -4
                } else {
                    0
                };
                piece_diff * 4 + stability_diff * 16 + parity_term
            }
        }
    }

    /// Static ordering heuristic consulted before the evaluator runs.
    /// `Pass` sorts last; corners first; X-squares worst among placements.
    pub fn move_priority(action: Action) -> i64 {
        match action {
            Action::Pass => i64::MIN,
            Action::Place { .. } => {
                let bit = action.bit_index().expect("move_priority requires in-range coordinates");
                let square = 1u64 << bit;
                if CORNERS & square != 0 {
                    10_000
                } else if X_SQUARES & square != 0 {
                    -10_000
                } else if C_SQUARES & square != 0 {
                    -5_000
                } else if EDGES & square != 0 {
                    1_000
                } else {
                    0
                }
            }
        }
    }
}

fn popcount_diff(own: u64, opp: u64) -> i64 {
    own.count_ones() as i64 - opp.count_ones() as i64
}

/// Count of X-squares owned by `own` minus by `opp`, each only counted if
/// not waived by `waive_if_corner_owned` and ownership of the paired corner.
fn x_square_penalty_diff(own: u64, opp: u64, waive_if_corner_owned: bool) -> i64 {
    let mut diff = 0i64;
    for &(x, corner) in &X_SQUARE_CORNERS {
        let x_bit = 1u64 << x;
        let corner_bit = 1u64 << corner;
        if own & x_bit != 0 && !(waive_if_corner_owned && own & corner_bit != 0) {
            diff += 1;
        }
        if opp & x_bit != 0 && !(waive_if_corner_owned && opp & corner_bit != 0) {
            diff -= 1;
        }
    }
    diff
}

/// Corners owned by `player`, plus any edge run unbroken from an owned
/// corner along that edge. An approximation: interior stability is not
/// computed.
fn stable_mask(player: u64) -> u64 {
    let mut stable = player & CORNERS;
    for run in &EDGE_RUNS {
        if player & (1u64 << run[0]) != 0 {
            for &sq in run.iter() {
                if player & (1u64 << sq) != 0 {
                    stable |= 1u64 << sq;
                } else {
                    break;
                }
            }
        }
        if player & (1u64 << run[7]) != 0 {
            for &sq in run.iter().rev() {
                if player & (1u64 << sq) != 0 {
                    stable |= 1u64 << sq;
                } else {
                    break;
                }
            }
        }
    }
    stable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use proptest::prelude::*;

    #[test]
    fn initial_position_is_exactly_balanced() {
        assert_eq!(Evaluator::evaluate(&Board::initial()), 0);
    }

    #[test]
    fn corner_dominates_move_priority_over_x_square() {
        let corner = Evaluator::move_priority(Action::Place { row: 1, col: 1 });
        let x_square = Evaluator::move_priority(Action::Place { row: 2, col: 2 });
        let c_square = Evaluator::move_priority(Action::Place { row: 1, col: 2 });
        let edge = Evaluator::move_priority(Action::Place { row: 1, col: 4 });
        let center = Evaluator::move_priority(Action::Place { row: 4, col: 4 });
        let pass = Evaluator::move_priority(Action::Pass);
        assert!(corner > edge);
        assert!(edge > center);
        assert!(center > c_square);
        assert!(c_square > x_square);
        assert!(x_square > pass);
    }

    #[test]
    fn owning_a_corner_makes_its_edge_stable() {
        // Own has the top-left corner and the rest of the top edge.
        let own = mask_from_bits(&[0, 1, 2, 3, 4, 5, 6, 7]);
        let mask = stable_mask(own);
        assert_eq!(mask, own);
    }

    #[test]
    fn edge_without_owned_corner_is_not_stable() {
        let own = mask_from_bits(&[1, 2, 3]);
        assert_eq!(stable_mask(own), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn evaluator_is_side_symmetric(picks in proptest::collection::vec(0usize..12, 0..30)) {
            let mut board = Board::initial();
            let mut consecutive_passes = 0;
            for pick in picks {
                if consecutive_passes >= 2 {
                    break;
                }
                let actions = board.legal_actions();
                let action = actions[pick % actions.len()];
                consecutive_passes = if action == Action::Pass { consecutive_passes + 1 } else { 0 };
                let (next, _) = board.apply(action).unwrap();
                board = next;
            }
            prop_assert_eq!(Evaluator::evaluate(&board), -Evaluator::evaluate(&board.color_swapped()));
        }
    }
}
