//! UCI protocol handling for ochre.

pub mod book;
pub mod command;
pub mod engine;
pub mod error;

pub use book::Book;
pub use command::{Command, GoParams, PositionCommand, UciOption, parse_command};
pub use engine::{EngineConfig, UciEngine};
pub use error::UciError;
