//! Lanchester ABC - which attrition law best explains historical casualties?
//!
//! Approximate Bayesian Computation over four discrete-time attrition laws.
//! Battles go in, a ranked table of best-fitting parameter draws comes out.

pub mod abc;
pub mod attrition;
pub mod battle;
pub mod build_info;
pub mod error;
pub mod report;

pub use abc::{run_abc, AbcConfig, ParallelRejectionSampler, PriorConfig, SimulationResult};
pub use attrition::AttritionLaw;
pub use battle::{load_battles, Battle, BattleSet};
pub use error::{AbcError, AbcResult};
