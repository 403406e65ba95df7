//! Game business logic: score accumulation, round ledger, roster, winner detection, transitions.

mod ledger;
mod roster;
mod scoring;
mod transitions;
mod winner;

pub use ledger::{append_round, undo_last_round};
pub use roster::{add_player, validate_new_name, validate_starting_names};
pub use scoring::{calculate_ignored_scores, calculate_totals, player_total};
pub use transitions::{apply_action, start_new_game, GameAction, Transition};
pub use winner::{detect_winner, leading_player};
