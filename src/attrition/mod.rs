//! Discrete-time attrition laws and the simulator that iterates them.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
