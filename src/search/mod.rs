// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Iterative-deepening alpha-beta search: a `Search` instance owns a
//! transposition table and, given a board and a wall-clock budget, returns
//! a single move. No global state, no threads; deadline expiry is modeled
//! as a typed error unwound through `?`.

pub mod tt;

use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::board::{Action, Board};
use crate::error::{IllegalMoveError, SearchError};
use crate::eval::Evaluator;
use tt::{Bound, TranspositionTable};

/// An action paired with its backed-up score, returned instead of
/// attaching a mutable score field to a shared `Action` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredAction {
    pub action: Action,
    pub score: i64,
}

/// How often (in visited nodes) the search re-samples the clock. Checking
/// on every node would dominate runtime at shallow depths; this throttles
/// the deadline check while bounding worst-case overrun to O(node cost).
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// The safety factor applied to the caller's budget: iterative deepening
/// targets `0.9 * budget` so that the in-flight ply at expiry has margin
/// to unwind before the true deadline.
const SAFETY_FACTOR: f64 = 0.90;

/// Owns the transposition table and drives iterative deepening. Not
/// `Clone`; callers that want a fresh table construct a new `Search`.
#[derive(Debug, Default)]
pub struct Search {
    tt: TranspositionTable,
    nodes: u64,
}

impl Search {
    pub fn new() -> Search {
        Search { tt: TranspositionTable::new(), nodes: 0 }
    }

    /// Runs iterative deepening from depth 1 until `budget` (scaled by
    /// [`SAFETY_FACTOR`]) elapses, returning the move backed by the last
    /// *completed* depth. A deadline expiry at depth 1 falls back to the
    /// first legal action (or `Pass`). An `IllegalMoveError` is an internal
    /// invariant violation rather than a routine deadline abort, and is
    /// logged and propagated rather than swallowed.
    pub fn iterative_deepen(&mut self, board: &Board, budget: Duration) -> Result<Action, IllegalMoveError> {
        let start = Instant::now();
        let t_end = start + budget.mul_f64(SAFETY_FACTOR);

        let mut best: Option<Action> = None;
        for depth in 1u32.. {
            self.nodes = 0;
            self.tt.take_counts();
            let outcome = self.search_root(board, depth, t_end);
            let (tt_hits, tt_misses) = self.tt.take_counts();
            debug!(
                "depth {depth}: {} nodes, tt hits={tt_hits} misses={tt_misses}",
                self.nodes
            );
            match outcome {
                Ok(scored) => {
                    info!(
                        "depth {depth} complete: move {} score {} ({} nodes, {:?} elapsed)",
                        scored.action,
                        scored.score,
                        self.nodes,
                        start.elapsed()
                    );
                    best = Some(scored.action);
                }
                Err(SearchError::TimeExpired) => {
                    debug!("depth {depth} aborted: time expired after {} nodes", self.nodes);
                    break;
                }
                Err(SearchError::IllegalMove(err)) => {
                    error!("illegal move during search at depth {depth}: {err}");
                    return Err(err);
                }
            }
            if Instant::now() >= t_end {
                break;
            }
        }

        Ok(best.unwrap_or_else(|| {
            board.legal_actions().into_iter().next().unwrap_or(Action::Pass)
        }))
    }

    /// One complete alpha-beta pass to `depth` plies, returning the best
    /// root move. Distinct from `negamax` because the root always needs
    /// the move itself, not just its score.
    fn search_root(
        &mut self,
        board: &Board,
        depth: u32,
        t_end: Instant,
    ) -> Result<ScoredAction, SearchError> {
        let mut actions = board.legal_actions();
        let tt_hint = self.tt.best_move(board);
        sort_by_priority(&mut actions, tt_hint);

        let alpha_0 = i64::MIN + 1;
        let beta_0 = i64::MAX;
        let mut alpha = alpha_0;
        let mut best = ScoredAction { action: actions[0], score: i64::MIN };

        for action in actions {
            let (child, _) = board.apply(action)?;
            let score = -self.negamax(&child, depth - 1, -beta_0, -alpha, t_end, action == Action::Pass)?;
            if score > best.score {
                best = ScoredAction { action, score };
            }
            alpha = alpha.max(best.score);
        }

        self.tt.store(board, depth, best.score, Some(best.action), classify(best.score, alpha_0, beta_0));
        Ok(best)
    }

    /// Classic negamax with alpha-beta pruning. `prev_was_pass` tracks
    /// whether the move that produced `board` was itself a pass, so two
    /// consecutive passes can be recognized as a terminal position rather
    /// than searched further.
    fn negamax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i64,
        beta: i64,
        t_end: Instant,
        prev_was_pass: bool,
    ) -> Result<i64, SearchError> {
        self.nodes += 1;
        if self.nodes % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= t_end {
            return Err(SearchError::TimeExpired);
        }

        if depth == 0 {
            return Ok(Evaluator::evaluate(board));
        }

        let alpha_0 = alpha;
        if let Some(score) = self.tt.probe(board, depth, alpha, beta) {
            return Ok(score);
        }

        let mut actions = board.legal_actions();
        if actions == [Action::Pass] {
            if prev_was_pass {
                return Ok(Evaluator::evaluate(board));
            }
            let (child, _) = board.apply(Action::Pass)?;
            return Ok(-self.negamax(&child, depth - 1, -beta, -alpha, t_end, true)?);
        }
        sort_by_priority(&mut actions, self.tt.best_move(board));

        let mut best_score = i64::MIN + 1;
        let mut best_move = actions[0];
        for action in actions {
            let (child, _) = board.apply(action)?;
            let score = -self.negamax(&child, depth - 1, -beta, -alpha, t_end, false)?;
            if score > best_score {
                best_score = score;
                best_move = action;
            }
            alpha = alpha.max(best_score);
            if alpha >= beta {
                break;
            }
        }

        self.tt.store(board, depth, best_score, Some(best_move), classify(best_score, alpha_0, beta));
        Ok(best_score)
    }
}

/// Sorts `actions` by [`Evaluator::move_priority`], descending, breaking
/// ties in favor of a transposition-table move hint when present.
fn sort_by_priority(actions: &mut [Action], tt_hint: Option<Action>) {
    actions.sort_by_key(|&a| {
        let hint_bonus = if Some(a) == tt_hint { 1 } else { 0 };
        std::cmp::Reverse((hint_bonus, Evaluator::move_priority(a)))
    });
}

/// Classifies a backed-up score relative to the window it was searched
/// under, per the transposition-table storage rule in `tt`.
fn classify(score: i64, alpha_0: i64, beta_0: i64) -> Bound {
    if score <= alpha_0 {
        Bound::Upper
    } else if score >= beta_0 {
        Bound::Lower
    } else {
        Bound::Exact
    }
}
