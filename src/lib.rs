// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A time-budgeted alpha-beta Othello engine: a bitboard position
//! (`board`), a phased heuristic evaluator (`eval`), and an
//! iterative-deepening search (`search`) that combine into a single
//! façade, [`search::Search`], driven by `main`.

pub mod board;
pub mod error;
pub mod eval;
pub mod search;
