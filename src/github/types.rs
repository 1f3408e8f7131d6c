use serde::Deserialize;

/// One repository after merging the listing, language and commit-count
/// responses. Immutable once fetched; a new search replaces the whole list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
	pub name: String,
	pub languages: Vec<String>,
	pub commits: u64,
	pub url: String,
	pub fork: bool,
}

/// The subset of a `GET /users/{username}/repos` entry we consume.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRepo {
	pub name: String,
	pub html_url: String,
	#[serde(default)]
	pub fork: bool,
}
