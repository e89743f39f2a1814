//! Best XI team selection.

pub mod composition;
pub mod selector;

pub use composition::{CompositionTable, BALANCED};
pub use selector::TeamSelector;
