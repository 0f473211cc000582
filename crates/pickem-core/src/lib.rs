// Core pick'em engine: spread adjustments, win probabilities, and the slate
// optimizer. No I/O; every randomized routine takes a caller-supplied RNG.

pub mod adjustment;
pub mod game;
pub mod optimizer;
pub mod probability;
pub mod record;
pub mod teams;
pub mod tiebreak;

pub use game::{Game, Side};
pub use optimizer::{generate_slates, OptimizerParams, SearchMethod, SlateResult, SlateRun};
pub use probability::{win_probability, GameProbability};
