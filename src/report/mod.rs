//! Output of the ranked parameter table and its posterior summary.

mod summary;
mod table;

pub use summary::{LawShare, PosteriorSummary};
pub use table::{write_ranked_table, write_ranked_table_to, TABLE_HEADER};
