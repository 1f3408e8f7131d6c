use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::state::{DIM_ALPHA, GraphState};

const BACKGROUND: &str = "#1f2937";
const NODE_FILL: &str = "#007acc";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Opacity for an element given the hover fade. Highlighted elements stay at
/// `base`; everything else eases towards the dim floor.
fn faded(base: f64, highlighted: bool, t: f64) -> f64 {
	if highlighted {
		base
	} else {
		base - (base - DIM_ALPHA) * t
	}
}

pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let points = node_points(state);
	draw_edges(state, ctx, &points);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn node_points(state: &GraphState) -> HashMap<DefaultNodeIdx, (f64, f64)> {
	let mut points = HashMap::new();
	state.graph.visit_nodes(|node| {
		points.insert(node.index(), (node.x() as f64, node.y() as f64));
	});
	points
}

fn draw_edges(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	points: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);
	let line_width = 1.5 / k;
	let font_size = 10.0 / k.max(0.5);

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (points.get(&edge.source), points.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let alpha = faded(1.0, state.is_edge_highlighted(edge), t);

		// Each parallel edge bows into its own lane so multi-language pairs
		// stay visually distinct.
		let bow = 14.0 + edge.lane * 28.0;
		let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
		let (px, py) = (-dy / dist, dx / dist);
		let (cx, cy) = (mx + px * bow, my + py * bow);

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(&edge.color);
		ctx.set_line_width(line_width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.quadratic_curve_to(cx, cy, x2, y2);
		ctx.stroke();

		// Label pill at the curve midpoint, backed by the edge color.
		let (lx, ly) = (
			0.25 * x1 + 0.5 * cx + 0.25 * x2,
			0.25 * y1 + 0.5 * cy + 0.25 * y2,
		);
		ctx.set_font(&format!("{font_size}px sans-serif"));
		let text_width = ctx
			.measure_text(&edge.label)
			.map(|m| m.width())
			.unwrap_or(edge.label.len() as f64 * font_size * 0.6);
		let (pad, pill_h) = (3.0 / k.max(0.5), font_size + 4.0 / k.max(0.5));
		ctx.set_fill_style_str(&edge.color);
		ctx.fill_rect(
			lx - text_width / 2.0 - pad,
			ly - pill_h / 2.0,
			text_width + pad * 2.0,
			pill_h,
		);
		ctx.set_fill_style_str("#000000");
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&edge.label, lx, ly);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let k = state.transform.k;

	// Dimmed pass first, then the highlighted neighborhood on top.
	state.graph.visit_nodes(|node| {
		if state.is_highlighted(node.index()) {
			return;
		}
		draw_node(
			ctx,
			node.x() as f64,
			node.y() as f64,
			node.data.user_data.radius,
			&node.data.user_data.label_lines,
			faded(1.0, false, t),
		);
	});

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = node.data.user_data.radius;

		if state.is_hovered(idx) && t > 0.01 {
			// Soft glow behind the hovered node.
			if let Ok(gradient) =
				ctx.create_radial_gradient(x, y, radius * 0.3, x, y, radius * 1.6)
			{
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.35 * t));
				let _ = gradient
					.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", 0.35 * t * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius * 1.6, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		draw_node(ctx, x, y, radius, &node.data.user_data.label_lines, 1.0);

		if state.is_hovered(idx) && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
	});
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	label_lines: &[String],
	alpha: f64,
) {
	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(NODE_FILL);
	ctx.fill();

	ctx.set_fill_style_str("#ffffff");
	ctx.set_font("12px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let line_height = 13.0;
	let top = y - (label_lines.len() as f64 - 1.0) / 2.0 * line_height;
	for (i, line) in label_lines.iter().enumerate() {
		if line.is_empty() {
			continue;
		}
		let _ = ctx.fill_text(line, x, top + i as f64 * line_height);
	}
	ctx.set_global_alpha(1.0);
}
