use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NODE_RADIUS};

pub(super) const LABEL_ROW: f64 = 18.0;
const LABEL_FONT: &str = "14px monospace";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Draw one frame. The canvas stays transparent so the audited page shows through.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_targets(state, ctx);
	draw_labels(state, ctx);
	ctx.restore();
}

fn dimmed(state: &ForceGraphState, highlighted: bool) -> f64 {
	if !state.has_active_highlight() || highlighted {
		1.0
	} else {
		1.0 - 0.8 * ease_out_cubic(state.hover.highlight_t)
	}
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	state.graph.visit_edges(|n1, n2, _| {
		let highlighted = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());
		let alpha = 0.7 * dimmed(state, highlighted);
		ctx.set_stroke_style_str(&format!("rgba(0, 0, 0, {alpha})"));
		ctx.set_line_width(if highlighted { 2.0 / k } else { 1.0 / k });
		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});
}

fn draw_targets(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		if !info.label.is_empty() {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		ctx.set_global_alpha(dimmed(state, state.is_highlighted(node.index())));
		ctx.begin_path();
		let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.5)");
		ctx.fill();
		ctx.set_stroke_style_str(&info.color);
		ctx.set_line_width(2.0 / k);
		ctx.stroke();
	});
	ctx.set_global_alpha(1.0);
}

fn draw_labels(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_font(LABEL_FONT);
	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		if info.label.is_empty() {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let width = info
			.label
			.iter()
			.filter_map(|line| ctx.measure_text(line).ok())
			.map(|m| m.width())
			.fold(0.0, f64::max);
		let height = info.label.len() as f64 * LABEL_ROW;

		ctx.set_global_alpha(dimmed(state, state.is_highlighted(node.index())));
		ctx.set_fill_style_str("white");
		ctx.fill_rect(x, y - LABEL_ROW * 0.75, width + 8.0, height);
		ctx.set_stroke_style_str(&info.color);
		ctx.set_line_width(1.0);
		ctx.stroke_rect(x, y - LABEL_ROW * 0.75, width + 8.0, height);

		ctx.set_fill_style_str("black");
		for (row, line) in info.label.iter().enumerate() {
			let _ = ctx.fill_text(line, x + 4.0, y + row as f64 * LABEL_ROW);
		}
	});
	ctx.set_global_alpha(1.0);
}
