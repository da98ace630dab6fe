//! Canvas rendering for the graph engine.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edge lines and edge labels (world space)
//! 3. Nodes, the hover ring, then labels on top

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::GraphEngine;
use super::theme::Theme;

/// Renders the engine's current frame to the canvas.
pub fn render(engine: &GraphEngine, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.clear_rect(0.0, 0.0, engine.width, engine.height);
	draw_background(engine, ctx, theme);

	if engine.is_empty() {
		return;
	}

	ctx.save();
	let _ = ctx.translate(engine.transform.x, engine.transform.y);
	let _ = ctx.scale(engine.transform.k, engine.transform.k);

	draw_edges(engine, ctx);
	draw_edge_labels(engine, ctx, theme);
	draw_nodes(engine, ctx, theme);
	draw_labels(engine, ctx, theme);

	ctx.restore();
}

fn draw_background(engine: &GraphEngine, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.a <= 0.0 {
		return;
	}
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, engine.width, engine.height);
}

fn draw_edges(engine: &GraphEngine, ctx: &CanvasRenderingContext2d) {
	let k = engine.transform.k;
	for edge in engine.edges() {
		let (x1, y1) = engine.node_world(edge.source);
		let (x2, y2) = engine.node_world(edge.target);
		ctx.set_stroke_style_str(&edge.color);
		ctx.set_line_width(engine.edge_width(edge) / k);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_edge_labels(engine: &GraphEngine, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.label.to_css());
	ctx.set_text_align("center");
	for label in engine.edge_labels() {
		ctx.set_font(&format!("{}px sans-serif", label.size));
		let _ = ctx.fill_text(label.text, label.x, label.y - 2.0);
	}
	ctx.set_text_align("start");
}

fn draw_nodes(engine: &GraphEngine, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	for (idx, node) in engine.nodes().iter().enumerate() {
		let (x, y) = engine.node_world(idx);
		let radius = engine.node_radius(idx);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.frame.node.color);
		ctx.fill();
	}

	if let Some(idx) = engine.hovered() {
		let (x, y) = engine.node_world(idx);
		let radius = engine.node_radius(idx);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 2.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.hover_ring.to_css());
		ctx.set_line_width(1.5 / engine.transform.k);
		ctx.stroke();
	}
}

fn draw_labels(engine: &GraphEngine, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let settings = &engine.settings;
	ctx.set_font(&settings.label_font());
	ctx.set_fill_style_str(&theme.label.to_css());
	for (idx, node) in engine.nodes().iter().enumerate() {
		let radius = engine.node_radius(idx);
		if radius * engine.transform.k < settings.label_threshold {
			continue;
		}
		let (x, y) = engine.node_world(idx);
		let _ = ctx.fill_text(
			&node.frame.node.label,
			x + radius + 3.0,
			y + settings.default_label_size / 3.0,
		);
	}
}
