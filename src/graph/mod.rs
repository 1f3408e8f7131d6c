//! Pure derivation of graph elements, language statistics and colors from a
//! fetched repository list.

mod colors;
mod derive;

pub use colors::assign_colors;
pub use derive::{FilterState, GraphElement, derive_elements, language_usage, node_size};
