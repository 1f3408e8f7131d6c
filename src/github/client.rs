use std::collections::HashMap;

use futures::future::join_all;
use log::warn;
use thiserror::Error;

use super::types::{RawRepo, Repository};

const API_BASE: &str = "https://api.github.com";

/// Optional bearer token baked in at build time. Unauthenticated requests
/// work against the public API but hit a much lower rate limit.
const TOKEN: Option<&str> = option_env!("GITHUB_TOKEN");

/// Why a search failed. `UserNotFound` and `Network` abort the listing call
/// itself; `Languages` is a per-repository failure that still aborts the
/// whole batch because the language set is mandatory for graph derivation.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("user `{0}` was not found")]
	UserNotFound(String),

	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("malformed repository listing: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("could not read languages for `{repo}`: {source}")]
	Languages {
		repo: String,
		source: reqwest::Error,
	},
}

fn get(client: &reqwest::Client, url: &str) -> reqwest::RequestBuilder {
	let request = client
		.get(url)
		.header("Accept", "application/vnd.github+json");
	match TOKEN {
		Some(token) => request.header("Authorization", format!("Bearer {token}")),
		None => request,
	}
}

/// List a user's repositories and resolve each one's language set and commit
/// count. Repositories are fetched concurrently; the returned order matches
/// the listing order, not completion order.
pub async fn fetch_user_repositories(username: &str) -> Result<Vec<Repository>, FetchError> {
	let client = reqwest::Client::new();

	let listing = get(&client, &format!("{API_BASE}/users/{username}/repos"))
		.send()
		.await?;
	if listing.status() == reqwest::StatusCode::NOT_FOUND {
		return Err(FetchError::UserNotFound(username.to_owned()));
	}
	let body = listing.error_for_status()?.text().await?;
	let raw: Vec<RawRepo> = serde_json::from_str(&body)?;

	let tasks = raw
		.into_iter()
		.map(|repo| resolve_repository(&client, username, repo));
	join_all(tasks).await.into_iter().collect()
}

async fn resolve_repository(
	client: &reqwest::Client,
	username: &str,
	raw: RawRepo,
) -> Result<Repository, FetchError> {
	let (languages, commits) = futures::join!(
		fetch_languages(client, username, &raw.name),
		fetch_commit_count(client, username, &raw.name),
	);
	Ok(Repository {
		languages: languages?,
		commits,
		name: raw.name,
		url: raw.html_url,
		fork: raw.fork,
	})
}

/// The languages endpoint maps language name to byte count; only membership
/// matters here, so the counts are discarded.
async fn fetch_languages(
	client: &reqwest::Client,
	username: &str,
	repo: &str,
) -> Result<Vec<String>, FetchError> {
	let url = format!("{API_BASE}/repos/{username}/{repo}/languages");
	let response = get(client, &url)
		.send()
		.await
		.and_then(|r| r.error_for_status())
		.map_err(|source| FetchError::Languages {
			repo: repo.to_owned(),
			source,
		})?;
	let by_bytes: HashMap<String, u64> =
		response
			.json()
			.await
			.map_err(|source| FetchError::Languages {
				repo: repo.to_owned(),
				source,
			})?;
	Ok(by_bytes.into_keys().collect())
}

/// Estimate the commit count from the pagination `Link` header of a one-item
/// page: the `last` page number equals the total. No `Link` header means the
/// repository has exactly one commit. A failed probe degrades to zero so one
/// broken repository cannot sink the whole search.
async fn fetch_commit_count(client: &reqwest::Client, username: &str, repo: &str) -> u64 {
	let url = format!("{API_BASE}/repos/{username}/{repo}/commits?per_page=1&page=1");
	let probe = get(client, &url)
		.send()
		.await
		.and_then(|r| r.error_for_status());
	if let Err(ref err) = probe {
		warn!("commit count probe failed for {username}/{repo}: {err}");
	}
	let link = probe.map(|response| {
		response
			.headers()
			.get("link")
			.and_then(|v| v.to_str().ok())
			.map(str::to_owned)
	});
	commit_count(link.as_ref().map(Option::as_deref))
}

fn commit_count<E>(probe: Result<Option<&str>, E>) -> u64 {
	match probe {
		Ok(Some(link)) => last_page_from_link(link).unwrap_or(1),
		Ok(None) => 1,
		Err(_) => 0,
	}
}

/// Extract the `page` number of the `rel="last"` entry from a GitHub `Link`
/// header, e.g. `<https://api.github.com/...?per_page=1&page=7>; rel="last"`.
pub fn last_page_from_link(header: &str) -> Option<u64> {
	header.split(',').find_map(|entry| {
		let (target, params) = entry.split_once(';')?;
		if !params.contains("rel=\"last\"") {
			return None;
		}
		let url = target.trim().trim_start_matches('<').trim_end_matches('>');
		let query = url.split_once('?')?.1;
		query.split('&').find_map(|pair| {
			let (key, value) = pair.split_once('=')?;
			(key == "page").then(|| value.parse().ok()).flatten()
		})
	})
}
