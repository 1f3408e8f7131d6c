use leptos::prelude::*;

/// Pulsing placeholder shown while a search is in flight: one block for the
/// graph area, two for the side panel cards.
#[component]
pub fn SkeletonLoader() -> impl IntoView {
	view! {
		<div class="skeleton">
			<div class="skeleton-canvas" />
			<div class="skeleton-panel">
				<div class="skeleton-card">
					<div class="skeleton-line wide" />
					<div class="skeleton-line" />
					<div class="skeleton-line" />
					<div class="skeleton-line" />
				</div>
				<div class="skeleton-card">
					<div class="skeleton-line wide" />
					<div class="skeleton-line" />
					<div class="skeleton-line" />
					<div class="skeleton-line" />
				</div>
			</div>
		</div>
	}
}
