use std::collections::{HashMap, HashSet};

use crate::github::Repository;

/// User-owned visibility toggles. These survive re-fetches within a session;
/// nothing resets them automatically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
	pub hidden_languages: HashSet<String>,
	pub hide_forks: bool,
}

/// One element of the rendered graph. The whole list is rebuilt on every
/// change to repositories or filters, never patched incrementally.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphElement {
	Node {
		id: String,
		label: String,
		size: f64,
		url: String,
	},
	Edge {
		id: String,
		source: String,
		target: String,
		label: String,
		style_class: String,
	},
}

/// Node diameter: logarithmic in commits so busy repositories do not drown
/// everything else, linear in language count, floored at 20 so an empty
/// repository still shows up.
pub fn node_size(commits: u64, language_count: usize) -> f64 {
	(commits as f64).ln_1p() * 10.0 + language_count as f64 * 10.0 + 20.0
}

/// Count how many repositories use each language.
pub fn language_usage(repos: &[Repository]) -> HashMap<String, usize> {
	let mut usage = HashMap::new();
	for repo in repos {
		for language in &repo.languages {
			*usage.entry(language.clone()).or_insert(0) += 1;
		}
	}
	usage
}

/// Derive the node/edge list for the current filters.
///
/// Every non-hidden repository becomes one node. For every unordered pair of
/// visible repositories sharing a non-hidden language there is exactly one
/// edge per shared language: parallel edges between the same two nodes are
/// intentional and carry their language as both label and style class. A
/// language used by a single visible repository contributes no edges.
pub fn derive_elements(repos: &[Repository], filters: &FilterState) -> Vec<GraphElement> {
	let visible: Vec<&Repository> = repos
		.iter()
		.filter(|repo| !(filters.hide_forks && repo.fork))
		.collect();

	let mut elements = Vec::new();
	// Language groups in first-seen order so the emitted edge order is stable.
	let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();

	for repo in &visible {
		elements.push(GraphElement::Node {
			id: repo.name.clone(),
			label: format!(
				"{}\n\nCommits: {}\nNr. of languages: {}",
				repo.name,
				repo.commits,
				repo.languages.len()
			),
			size: node_size(repo.commits, repo.languages.len()),
			url: repo.url.clone(),
		});
		for language in &repo.languages {
			match groups.iter_mut().find(|(name, _)| *name == language.as_str()) {
				Some((_, members)) => members.push(repo.name.as_str()),
				None => groups.push((language.as_str(), vec![repo.name.as_str()])),
			}
		}
	}

	for (language, members) in &groups {
		if members.len() < 2 || filters.hidden_languages.contains(*language) {
			continue;
		}
		for i in 0..members.len() {
			for j in (i + 1)..members.len() {
				elements.push(GraphElement::Edge {
					// `|` cannot appear in a repository name, so ids stay
					// unique even for hyphenated repos.
					id: format!("{}|{}|{}", members[i], members[j], language),
					source: members[i].to_owned(),
					target: members[j].to_owned(),
					label: (*language).to_owned(),
					style_class: (*language).to_owned(),
				});
			}
		}
	}
	elements
}

#[cfg(test)]
mod tests {
	use super::*;

	fn repo(name: &str, languages: &[&str], commits: u64, fork: bool) -> Repository {
		Repository {
			name: name.to_owned(),
			languages: languages.iter().map(|s| (*s).to_owned()).collect(),
			commits,
			url: format!("https://github.com/alice/{name}"),
			fork,
		}
	}

	fn alice() -> Vec<Repository> {
		vec![
			repo("A", &["Go", "Rust"], 5, false),
			repo("B", &["Rust"], 2, true),
			repo("C", &["Go"], 10, false),
		]
	}

	fn nodes(elements: &[GraphElement]) -> Vec<&str> {
		elements
			.iter()
			.filter_map(|e| match e {
				GraphElement::Node { id, .. } => Some(id.as_str()),
				GraphElement::Edge { .. } => None,
			})
			.collect()
	}

	fn edge_labels(elements: &[GraphElement]) -> Vec<&str> {
		elements
			.iter()
			.filter_map(|e| match e {
				GraphElement::Edge { label, .. } => Some(label.as_str()),
				GraphElement::Node { .. } => None,
			})
			.collect()
	}

	#[test]
	fn one_node_per_repository_and_pairwise_edges_per_language() {
		let elements = derive_elements(&alice(), &FilterState::default());
		assert_eq!(nodes(&elements), vec!["A", "B", "C"]);
		// Rust: {A, B} -> 1 edge. Go: {A, C} -> 1 edge.
		let mut labels = edge_labels(&elements);
		labels.sort_unstable();
		assert_eq!(labels, vec!["Go", "Rust"]);
	}

	#[test]
	fn complete_graph_per_language_group() {
		let repos = vec![
			repo("a", &["Rust"], 1, false),
			repo("b", &["Rust"], 1, false),
			repo("c", &["Rust"], 1, false),
			repo("d", &["Rust"], 1, false),
		];
		let elements = derive_elements(&repos, &FilterState::default());
		// C(4, 2) = 6 edges for a language shared by four repositories.
		assert_eq!(edge_labels(&elements).len(), 6);
	}

	#[test]
	fn single_user_language_contributes_no_edges() {
		let repos = vec![repo("a", &["Zig"], 3, false), repo("b", &["Rust"], 3, false)];
		let elements = derive_elements(&repos, &FilterState::default());
		assert!(edge_labels(&elements).is_empty());
	}

	#[test]
	fn parallel_edges_survive_for_multiple_shared_languages() {
		let repos = vec![
			repo("a", &["Go", "Rust"], 1, false),
			repo("b", &["Go", "Rust"], 1, false),
		];
		let elements = derive_elements(&repos, &FilterState::default());
		let mut labels = edge_labels(&elements);
		labels.sort_unstable();
		assert_eq!(labels, vec!["Go", "Rust"]);
	}

	#[test]
	fn hiding_a_language_removes_exactly_its_edges_and_is_reversible() {
		let mut filters = FilterState::default();
		let before = derive_elements(&alice(), &filters);

		filters.hidden_languages.insert("Rust".to_owned());
		let hidden = derive_elements(&alice(), &filters);
		assert_eq!(nodes(&hidden), nodes(&before), "nodes are unaffected");
		assert_eq!(edge_labels(&hidden), vec!["Go"]);

		filters.hidden_languages.remove("Rust");
		assert_eq!(derive_elements(&alice(), &filters), before);
	}

	#[test]
	fn hiding_forks_removes_fork_nodes_and_their_edges() {
		let filters = FilterState {
			hide_forks: true,
			..FilterState::default()
		};
		let elements = derive_elements(&alice(), &filters);
		assert_eq!(nodes(&elements), vec!["A", "C"]);
		// B carried the only other Rust usage, so only the Go edge remains.
		assert_eq!(edge_labels(&elements), vec!["Go"]);
	}

	#[test]
	fn edge_ids_stay_distinct_for_hyphenated_repository_names() {
		// "a-b" + "c" and "a" + "b-c" would both collapse to "a-b-c" under
		// a hyphen delimiter.
		let repos = vec![
			repo("a-b", &["Rust"], 1, false),
			repo("c", &["Rust"], 1, false),
			repo("a", &["Rust"], 1, false),
			repo("b-c", &["Rust"], 1, false),
		];
		let elements = derive_elements(&repos, &FilterState::default());
		let ids: Vec<&str> = elements
			.iter()
			.filter_map(|e| match e {
				GraphElement::Edge { id, .. } => Some(id.as_str()),
				GraphElement::Node { .. } => None,
			})
			.collect();
		let unique: std::collections::HashSet<&str> = ids.iter().copied().collect();
		assert_eq!(unique.len(), ids.len());
	}

	#[test]
	fn node_size_follows_the_log_commit_formula() {
		// log1p(10) * 10 + 1 * 10 + 20
		assert!((node_size(10, 1) - 53.978_952_727_983_7).abs() < 1e-9);
		// Floor of 20 for an empty repository.
		assert!((node_size(0, 0) - 20.0).abs() < f64::EPSILON);
	}

	#[test]
	fn language_usage_counts_repositories_not_bytes() {
		let usage = language_usage(&alice());
		assert_eq!(usage.get("Go"), Some(&2));
		assert_eq!(usage.get("Rust"), Some(&2));
		assert_eq!(usage.len(), 2);
	}
}
