use std::collections::{HashMap, HashSet};

use leptos::prelude::*;

/// Side panel: language usage list in assigned colors, plus the visibility
/// toggles for forks and individual languages.
#[component]
pub fn LanguagePanel(
	#[prop(into)] colors: Signal<HashMap<String, String>>,
	#[prop(into)] usage: Signal<HashMap<String, usize>>,
	hidden_languages: RwSignal<HashSet<String>>,
	hide_forks: RwSignal<bool>,
) -> impl IntoView {
	// HashMap order is arbitrary, so both lists sort by name for stability.
	let languages = Memo::new(move |_| {
		let mut names: Vec<String> = usage.get().into_keys().collect();
		names.sort_unstable();
		names
	});

	let toggle_language = move |language: String| {
		hidden_languages.update(|set| {
			if !set.remove(&language) {
				set.insert(language);
			}
		});
	};

	view! {
		<div class="side-panel">
			<div class="panel-card">
				<h2>"Languages" <br /> "(Nr. of repos using):"</h2>
				<ul>
					<For
						each=move || languages.get()
						key=|language| language.clone()
						children=move |language: String| {
							let name = language.clone();
							let color = move || {
								colors.get().get(&name).cloned().unwrap_or_default()
							};
							let name = language.clone();
							let count = move || usage.get().get(&name).copied().unwrap_or(0);
							view! {
								<li style:color=color>{language.clone()} " (" {count} ")"</li>
							}
						}
					/>
				</ul>
			</div>
			<div class="panel-card">
				<h2>"Hide Forks:"</h2>
				<label>
					<input
						type="checkbox"
						prop:checked=move || hide_forks.get()
						on:change=move |_| hide_forks.update(|v| *v = !*v)
					/>
					"Hide Forked Repositories"
				</label>

				<h2>"Hide Languages:"</h2>
				<ul>
					<For
						each=move || languages.get()
						key=|language| language.clone()
						children=move |language: String| {
							let name = language.clone();
							let checked = move || hidden_languages.get().contains(&name);
							let name = language.clone();
							view! {
								<li>
									<label>
										<input
											type="checkbox"
											prop:checked=checked
											on:change=move |_| toggle_language(name.clone())
										/>
										{language.clone()}
									</label>
								</li>
							}
						}
					/>
				</ul>
			</div>
		</div>
	}
}
