use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::DiagramState;
use super::theme::palette_for_level;

/// Bands extend this far either side of x = 0 so fitting or panning the view
/// does not expose their ends.
const BAND_WIDTH: f64 = 2000.0;
const GUIDE_LINES: usize = 12;
const DOT_SPACING: f64 = 20.0;
const CORNER_RADIUS: f64 = 6.0;
const ACCENT_WIDTH: f64 = 8.0;
const HANDLE_RADIUS: f64 = 4.0;
const ARROW_SIZE: f64 = 10.0;
const MINIMAP_WIDTH: f64 = 200.0;
const MINIMAP_HEIGHT: f64 = 150.0;
const MINIMAP_INSET: f64 = 15.0;

pub fn render(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(state.theme.body_background());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_dots(state, ctx);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_bands(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();

	draw_minimap(state, ctx);
}

fn draw_dots(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let spacing = DOT_SPACING * state.transform.k;
	if spacing < 4.0 {
		return;
	}
	let (ox, oy) = (
		state.transform.x.rem_euclid(spacing),
		state.transform.y.rem_euclid(spacing),
	);
	ctx.set_fill_style_str(state.theme.background_dots());
	let mut y = oy;
	while y < state.height {
		let mut x = ox;
		while x < state.width {
			ctx.fill_rect(x - 0.5, y - 0.5, 1.0, 1.0);
			x += spacing;
		}
		y += spacing;
	}
}

/// Level bands and guide lines, in graph coordinates so they follow pan and zoom.
fn draw_bands(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let theme = state.theme;
	for (_, band) in state.bands.iter() {
		ctx.set_fill_style_str(theme.band_fill());
		ctx.fill_rect(-BAND_WIDTH, band.top, 2.0 * BAND_WIDTH, band.height());

		ctx.set_stroke_style_str(theme.band_line());
		ctx.set_line_width(2.0);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(8.0),
			&JsValue::from_f64(4.0),
		));
		ctx.begin_path();
		ctx.move_to(-BAND_WIDTH, band.bottom);
		ctx.line_to(BAND_WIDTH, band.bottom);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	let height = state.bands.viewport_height();
	ctx.set_global_alpha(0.25);
	ctx.set_stroke_style_str(theme.guide_line());
	ctx.set_line_width(1.0);
	for i in 0..GUIDE_LINES {
		let i = i as f64;
		ctx.begin_path();
		ctx.move_to(100.0 + i * 100.0, 0.0);
		ctx.line_to(600.0 + i * 60.0, height);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_edges(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (state.config.node_width, state.config.node_height);
	let (dash, gap) = (5.0, 5.0);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let color = state.theme.edge();

	for (link, source, target) in state.drawable_links() {
		// The lower card attaches at its top, the higher card at its bottom.
		let (y1, y2) = if target.y <= source.y {
			(source.y, target.y + h)
		} else {
			(source.y + h, target.y)
		};
		let (x1, x2) = (source.x + w / 2.0, target.x + w / 2.0);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(1.5);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2 - ux * ARROW_SIZE, y2 - uy * ARROW_SIZE);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(color);
		let (back_x, back_y) = (x2 - ux * ARROW_SIZE, y2 - uy * ARROW_SIZE);
		let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
		ctx.begin_path();
		ctx.move_to(x2, y2);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if let Some(label) = &link.label {
			let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
			let label_w = label.chars().count() as f64 * 6.0 + 8.0;
			ctx.set_fill_style_str(state.theme.body_background());
			ctx.fill_rect(mx - label_w / 2.0, my - 8.0, label_w, 16.0);
			ctx.set_fill_style_str(state.theme.edge_label());
			ctx.set_font("10px sans-serif");
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			let _ = ctx.fill_text(label, mx, my);
		}
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (state.config.node_width, state.config.node_height);
	let theme = state.theme;

	for node in &state.nodes {
		let palette = palette_for_level(theme, node.level);
		let (x, y) = (node.x, node.y);

		ctx.set_shadow_color("rgba(0, 0, 0, 0.12)");
		ctx.set_shadow_blur(4.0);
		rounded_rect(ctx, x, y, w, h, CORNER_RADIUS);
		ctx.set_fill_style_str(palette.fill);
		ctx.fill();
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_color("transparent");

		ctx.set_stroke_style_str(palette.accent);
		ctx.set_line_width(2.0);
		ctx.stroke();

		ctx.save();
		ctx.clip();
		ctx.set_fill_style_str(palette.accent);
		ctx.fill_rect(x, y, ACCENT_WIDTH, h);
		ctx.restore();

		if state.selection.is_selected(&node.id) {
			rounded_rect(ctx, x - 3.0, y - 3.0, w + 6.0, h + 6.0, CORNER_RADIUS + 2.0);
			ctx.set_stroke_style_str(theme.selection_ring());
			ctx.set_line_width(2.0);
			ctx.stroke();
		}

		let cx = x + w / 2.0;
		ctx.set_fill_style_str(palette.text);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_font("bold 14px sans-serif");
		let _ = ctx.fill_text(&node.label, cx, y + h * 0.4);
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(&format!("Level {}", node.level), cx, y + h * 0.72);

		ctx.set_fill_style_str(theme.handle());
		for hy in [y, y + h] {
			ctx.begin_path();
			let _ = ctx.arc(cx, hy, HANDLE_RADIUS, 0.0, 2.0 * PI);
			ctx.fill();
		}
	}
}

/// Overview in the bottom-right corner: every card plus the visible area.
fn draw_minimap(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let Some((nx0, ny0, nx1, ny1)) = state.bounds() else {
		return;
	};
	let (vx0, vy0) = state.screen_to_graph(0.0, 0.0);
	let (vx1, vy1) = state.screen_to_graph(state.width, state.height);
	let (x0, y0, x1, y1) = (nx0.min(vx0), ny0.min(vy0), nx1.max(vx1), ny1.max(vy1));
	if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
		return;
	}

	let left = state.width - MINIMAP_WIDTH - MINIMAP_INSET;
	let top = state.height - MINIMAP_HEIGHT - MINIMAP_INSET;
	let scale = (MINIMAP_WIDTH / (x1 - x0)).min(MINIMAP_HEIGHT / (y1 - y0));
	let (ox, oy) = (
		left + (MINIMAP_WIDTH - (x1 - x0) * scale) / 2.0,
		top + (MINIMAP_HEIGHT - (y1 - y0) * scale) / 2.0,
	);
	let project = |gx: f64, gy: f64| (ox + (gx - x0) * scale, oy + (gy - y0) * scale);

	ctx.set_fill_style_str(state.theme.minimap_background());
	ctx.fill_rect(left, top, MINIMAP_WIDTH, MINIMAP_HEIGHT);

	let (w, h) = (state.config.node_width * scale, state.config.node_height * scale);
	for node in &state.nodes {
		let (px, py) = project(node.x, node.y);
		ctx.set_fill_style_str(palette_for_level(state.theme, node.level).minimap);
		ctx.fill_rect(px, py, w.max(1.0), h.max(1.0));
	}

	let (px0, py0) = project(vx0, vy0);
	let (px1, py1) = project(vx1, vy1);
	ctx.set_stroke_style_str(state.theme.minimap_viewport());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(px0, py0, px1 - px0, py1 - py0);
}
