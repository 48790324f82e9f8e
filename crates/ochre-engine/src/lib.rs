//! Search and evaluation for ochre.

pub mod eval;
pub mod search;
pub mod time;

pub use eval::Evaluator;
pub use search::control::SearchControl;
pub use search::rep::RepTable;
pub use search::{MATE_BOUND, MATE_VALUE, SearchResult, Searcher, mate_in};
pub use time::SearchLimits;
