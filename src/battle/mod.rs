//! Historical battle records and their loader.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;
