//! Greedy maximin selection of perceptually distinguishable colors.

mod candidates;
mod maximin;

pub use candidates::{CandidateSpace, DEFAULT_GRID_SIZE, MAX_GRID_SIZE};
pub use maximin::MaximinSelector;
