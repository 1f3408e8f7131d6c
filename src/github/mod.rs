//! Read-only GitHub REST client: repository listing, language sets and
//! commit-count estimation.

mod client;
mod types;

pub use client::{FetchError, fetch_user_repositories};
pub use types::Repository;
