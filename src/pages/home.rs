use std::collections::{HashMap, HashSet};

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};
use log::error;

use crate::components::graph_canvas::{GraphCanvas, LayoutKind};
use crate::components::language_panel::LanguagePanel;
use crate::components::search_bar::SearchBar;
use crate::components::skeleton::SkeletonLoader;
use crate::github::{self, Repository};
use crate::graph::{self, FilterState, derive_elements};

/// Query lifecycle: `Idle -> Loading -> {Ready, Failed}`, re-entering
/// `Loading` on the next search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum QueryPhase {
	#[default]
	Idle,
	Loading,
	Ready,
	Failed(String),
}

/// Search page: owns the query lifecycle, the URL-synchronized
/// `(username, layout)` pair and the filter toggles, and feeds read-only
/// snapshots to the derivation and rendering layers.
#[component]
pub fn Home() -> impl IntoView {
	let params = use_params_map();
	let navigate = use_navigate();

	let username = RwSignal::new(String::new());
	let repositories = RwSignal::new(Vec::<Repository>::new());
	let language_usage = RwSignal::new(HashMap::<String, usize>::new());
	let tech_colors = RwSignal::new(HashMap::<String, String>::new());
	let hidden_languages = RwSignal::new(HashSet::<String>::new());
	let hide_forks = RwSignal::new(false);
	let layout = RwSignal::new(LayoutKind::default());
	let phase = RwSignal::new(QueryPhase::Idle);

	// Last committed search plus a generation counter; a response arriving
	// for a stale generation is discarded. The nonce re-arms the fetch effect
	// when the search button is pressed without a URL change (retry after a
	// failure).
	let committed = StoredValue::new(String::new());
	let generation = StoredValue::new(0u64);
	let search_nonce = RwSignal::new(0u64);

	// Keep the layout signal in step with the URL segment.
	Effect::new(move |_| {
		if let Some(kind) = params.get().get("layout").and_then(|s| s.parse().ok()) {
			if layout.get_untracked() != kind {
				layout.set(kind);
			}
		}
	});

	// The URL carries the committed search: submitting navigates, this
	// effect fetches, so entering on `/{username}` fetches automatically.
	// Re-running with an empty or unchanged username is a no-op.
	Effect::new(move |_| {
		search_nonce.track();
		let Some(target) = params.get().get("username") else {
			return;
		};
		if target.is_empty() || committed.get_value() == target {
			return;
		}
		committed.set_value(target.clone());
		username.set(target.clone());
		let current = generation.get_value() + 1;
		generation.set_value(current);

		phase.set(QueryPhase::Loading);
		repositories.set(Vec::new());
		language_usage.set(HashMap::new());
		tech_colors.set(HashMap::new());

		spawn_local(async move {
			let result = github::fetch_user_repositories(&target).await;
			if generation.get_value() != current {
				// A newer search superseded this one.
				return;
			}
			match result {
				Ok(repos) => {
					language_usage.set(graph::language_usage(&repos));
					tech_colors.set(graph::assign_colors(&repos, js_sys::Math::random));
					repositories.set(repos);
					phase.set(QueryPhase::Ready);
				}
				Err(err) => {
					error!("search for `{target}` failed: {err}");
					// Allow an explicit retry of the same name.
					committed.set_value(String::new());
					phase.set(QueryPhase::Failed(err.to_string()));
				}
			}
		});
	});

	let navigate_search = navigate.clone();
	let on_search = Callback::new(move |()| {
		let name = username.get_untracked().trim().to_owned();
		if name.is_empty() {
			return;
		}
		navigate_search(
			&format!("/{name}/{}", layout.get_untracked().as_str()),
			Default::default(),
		);
		search_nonce.update(|nonce| *nonce += 1);
	});

	let on_layout = Callback::new(move |kind: LayoutKind| {
		layout.set(kind);
		let name = committed.get_value();
		if !name.is_empty() {
			navigate(&format!("/{name}/{}", kind.as_str()), Default::default());
		}
	});

	let elements = Memo::new(move |_| {
		let filters = FilterState {
			hidden_languages: hidden_languages.get(),
			hide_forks: hide_forks.get(),
		};
		derive_elements(&repositories.get(), &filters)
	});

	view! {
		<div class="app-shell">
			<SearchBar username=username layout=layout on_search=on_search on_layout=on_layout />

			{move || match phase.get() {
				QueryPhase::Failed(message) => {
					Some(view! { <p class="error-banner">{message}</p> })
				}
				_ => None,
			}}

			{move || {
				if phase.get() == QueryPhase::Loading {
					view! { <SkeletonLoader /> }.into_any()
				} else {
					view! {
						<div class="workspace">
							<div class="graph-area">
								<GraphCanvas elements=elements colors=tech_colors layout=layout />
							</div>
							<LanguagePanel
								colors=tech_colors
								usage=language_usage
								hidden_languages=hidden_languages
								hide_forks=hide_forks
							/>
						</div>
					}
					.into_any()
				}
			}}
		</div>
	}
}
