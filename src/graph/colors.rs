use std::collections::{HashMap, HashSet};

use crate::github::Repository;

/// Assign each language a random `#RRGGBB` color, unique within this call.
///
/// Languages are visited in fetch order and a draw is retried until it has
/// not been handed out yet. `sample` supplies entropy in `[0, 1)`; the app
/// passes `js_sys::Math::random`, tests script the sequence. Colors are
/// ephemeral: every fetch starts from an empty used set, so repeating a
/// search recolors the same languages.
pub fn assign_colors(
	repos: &[Repository],
	mut sample: impl FnMut() -> f64,
) -> HashMap<String, String> {
	let mut colors = HashMap::new();
	let mut used = HashSet::new();
	for repo in repos {
		for language in &repo.languages {
			if colors.contains_key(language) {
				continue;
			}
			let color = loop {
				let candidate = random_color(&mut sample);
				if used.insert(candidate.clone()) {
					break candidate;
				}
			};
			colors.insert(language.clone(), color);
		}
	}
	colors
}

fn random_color(sample: &mut impl FnMut() -> f64) -> String {
	let value = (sample() * 16_777_216.0) as u32 & 0x00FF_FFFF;
	format!("#{value:06X}")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn repo(name: &str, languages: &[&str]) -> Repository {
		Repository {
			name: name.to_owned(),
			languages: languages.iter().map(|s| (*s).to_owned()).collect(),
			commits: 0,
			url: String::new(),
			fork: false,
		}
	}

	/// Sampler that replays a fixed sequence, then falls back to a counter.
	fn scripted(values: Vec<f64>) -> impl FnMut() -> f64 {
		let mut next = 0usize;
		move || {
			let value = values
				.get(next)
				.copied()
				.unwrap_or((next as f64 * 97.0 % 1000.0) / 1000.0);
			next += 1;
			value
		}
	}

	#[test]
	fn colors_are_six_digit_hex() {
		let colors = assign_colors(&[repo("a", &["Rust"])], scripted(vec![0.0]));
		assert_eq!(colors.get("Rust").map(String::as_str), Some("#000000"));

		let colors = assign_colors(&[repo("a", &["Rust"])], scripted(vec![0.482]));
		let color = colors.get("Rust").unwrap();
		assert_eq!(color.len(), 7);
		assert!(color.starts_with('#'));
		assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn collisions_are_resampled_until_unique() {
		// First two draws collide; the loop must keep drawing.
		let sampler = scripted(vec![0.5, 0.5, 0.25]);
		let colors = assign_colors(&[repo("a", &["Go", "Rust"])], sampler);
		assert_eq!(colors.len(), 2);
		assert_ne!(colors.get("Go"), colors.get("Rust"));
	}

	#[test]
	fn no_two_languages_share_a_color() {
		let repos = vec![
			repo("a", &["Go", "Rust", "C"]),
			repo("b", &["Rust", "Python", "Zig"]),
			repo("c", &["Haskell"]),
		];
		let colors = assign_colors(&repos, scripted(Vec::new()));
		assert_eq!(colors.len(), 6);
		let distinct: HashSet<&String> = colors.values().collect();
		assert_eq!(distinct.len(), 6);
	}

	#[test]
	fn a_language_is_colored_once_across_repositories() {
		let mut draws = 0usize;
		let colors = assign_colors(
			&[repo("a", &["Rust"]), repo("b", &["Rust"])],
			move || {
				draws += 1;
				draws as f64 / 100.0
			},
		);
		assert_eq!(colors.len(), 1);
	}
}
