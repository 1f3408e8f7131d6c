use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::layout::LayoutKind;
use super::render;
use super::state::GraphState;
use crate::graph::GraphElement;

fn canvas_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

/// Canvas renderer for the repository graph.
///
/// Every change to `elements`, `colors` or `layout` tears the graph state
/// down completely and builds a fresh one; a single animation-frame loop
/// ticks the simulation and redraws.
#[component]
pub fn GraphCanvas(
	#[prop(into)] elements: Signal<Vec<GraphElement>>,
	#[prop(into)] colors: Signal<HashMap<String, String>>,
	#[prop(into)] layout: Signal<LayoutKind>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

	// Rebuild on any input change. Replacing the old state drops its graph
	// and hover bookkeeping, which is the whole teardown.
	let state_build = state.clone();
	Effect::new(move |_| {
		let elements = elements.get();
		let colors = colors.get();
		let layout = layout.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = canvas_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		*state_build.borrow_mut() = Some(GraphState::new(&elements, &colors, layout, w, h));
	});

	// One animation loop for the component's lifetime.
	let (state_anim, animate_init) = (state.clone(), animate.clone());
	let handle_init = raf_handle.clone();
	Effect::new(move |started: Option<bool>| {
		let Some(canvas) = canvas_ref.get() else {
			return false;
		};
		if started.unwrap_or(false) {
			return true;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return false;
		};

		let (state_inner, animate_inner) = (state_anim.clone(), animate_init.clone());
		let handle_inner = handle_init.clone();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_inner.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			// Cleanup clears the closure slot, which both stops the loop
			// and breaks the Rc cycle keeping it alive.
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(window) = web_sys::window() {
					if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
						handle_inner.set(Some(id));
					}
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Some(window) = web_sys::window() {
				if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					handle_init.set(Some(id));
				}
			}
		}
		true
	});

	// Stop the frame loop when the canvas unmounts: cancel the pending
	// frame and drop the self-referential closure.
	// `on_cleanup` demands `Send + Sync`; the `Rc`s never leave the single
	// wasm thread, so `SendWrapper` satisfies the bound without changing
	// behavior.
	let cleanup_state = send_wrapper::SendWrapper::new((animate.clone(), raf_handle.clone()));
	on_cleanup(move || {
		let (animate_cleanup, handle_cleanup) = cleanup_state.take();
		if let Some(id) = handle_cleanup.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		*animate_cleanup.borrow_mut() = None;
	});

	let cursor = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = cursor(&ev) else { return };
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = cursor(&ev) else { return };
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			// Update hover state when not dragging
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}

			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					let (nx, ny) = (
						s.drag.node_start_x + dx as f32,
						s.drag.node_start_y + dy as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.is_anchor = true;
						}
					});
				}
			}
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = cursor(&ev) else { return };
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	// Double-click opens the repository page; nodes without a URL ignore it.
	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = cursor(&ev) else { return };
		let url = state_dc
			.borrow()
			.as_ref()
			.and_then(|s| s.url_at_position(x, y));
		if let (Some(url), Some(window)) = (url, web_sys::window()) {
			let _ = window.open_with_url_and_target(&url, "_blank");
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="repo-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			style="display: block; cursor: grab;"
		/>
	}
}
