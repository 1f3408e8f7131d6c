use leptos::prelude::*;

use super::graph_canvas::LayoutKind;

/// Username input, search trigger and layout selector.
#[component]
pub fn SearchBar(
	username: RwSignal<String>,
	#[prop(into)] layout: Signal<LayoutKind>,
	on_search: Callback<()>,
	on_layout: Callback<LayoutKind>,
) -> impl IntoView {
	let submit = move |_| on_search.run(());
	let keydown = move |ev: leptos::ev::KeyboardEvent| {
		if ev.key() == "Enter" {
			on_search.run(());
		}
	};
	let select_layout = move |ev: leptos::ev::Event| {
		if let Ok(kind) = event_target_value(&ev).parse() {
			on_layout.run(kind);
		}
	};

	view! {
		<div class="search-bar">
			<label for="username-input">"GitHub Username:"</label>
			<input
				id="username-input"
				type="text"
				placeholder="Enter GitHub username"
				prop:value=move || username.get()
				on:input=move |ev| username.set(event_target_value(&ev))
				on:keydown=keydown
			/>
			<button on:click=submit>"Search"</button>

			<label for="layout-select">"Graph Layout:"</label>
			<select id="layout-select" title="layout-select" on:change=select_layout>
				{LayoutKind::ALL
					.into_iter()
					.map(|kind| {
						view! {
							<option
								value=kind.as_str()
								selected=move || layout.get() == kind
							>
								{kind.label()}
							</option>
						}
					})
					.collect_view()}
			</select>
		</div>
	}
}
