use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::rc::Rc;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::config::{ArrowKind, TopologyConfig};
use super::geometry::{Point, Rect, point_along};
use super::label::fit_label;
use super::state::TopologyState;
use super::style::{
	Badge, IconTable, ShapeStyle, StateStyles, health_badge, plane_color, spin_angle, sync_badge,
};
use super::types::ResourceNode;

/// Lazily loaded images keyed by asset url.
#[derive(Default)]
pub struct ImageCache {
	images: RefCell<HashMap<String, HtmlImageElement>>,
}

impl ImageCache {
	/// The image for `src` once it has finished loading.
	pub fn get(&self, src: &str) -> Option<HtmlImageElement> {
		let mut images = self.images.borrow_mut();
		if !images.contains_key(src) {
			let img = HtmlImageElement::new().ok()?;
			img.set_src(src);
			images.insert(src.to_string(), img);
		}
		images
			.get(src)
			.filter(|img| img.complete() && img.natural_width() > 0)
			.cloned()
	}
}

/// Everything a renderer may read while drawing one frame.
pub struct Frame<'a> {
	/// Context already transformed to graph space.
	pub ctx: &'a CanvasRenderingContext2d,
	/// Seconds since the instance was created.
	pub time: f64,
	/// Sizes and colours in effect.
	pub config: &'a TopologyConfig,
	/// Shared icon and badge images.
	pub images: &'a ImageCache,
}

/// Draws one node.
pub trait NodeRenderer {
	/// Draws `node` inside `rect` with its resolved state style.
	fn draw(&self, frame: &Frame, node: &ResourceNode, rect: &Rect, style: &ShapeStyle);
}

/// Draws one edge.
pub trait EdgeRenderer {
	/// Draws the routed `path` with its resolved state style.
	fn draw(&self, frame: &Frame, path: &[Point], style: &ShapeStyle);
}

/// Node and edge drawing strategies plus their state-style tables.
#[derive(Clone)]
pub struct Renderers {
	/// Node strategy.
	pub node: Rc<dyn NodeRenderer>,
	/// Edge strategy.
	pub edge: Rc<dyn EdgeRenderer>,
	/// Hover and selection styles for nodes.
	pub node_states: StateStyles,
	/// Hover styles for edges.
	pub edge_states: StateStyles,
}

impl Renderers {
	/// The resource card and flow edge renderers, styled from `config`.
	pub fn new(config: &TopologyConfig) -> Self {
		Self {
			node: Rc::new(ResourceNodeRenderer::default()),
			edge: Rc::new(FlowEdgeRenderer {
				arrow: config.arrow,
				arrow_size: config.arrow_size,
				animate: config.animate_edges,
				period: config.edge_dot_period,
			}),
			node_states: StateStyles::nodes(&config.node_fill, &config.node_stroke),
			edge_states: StateStyles::edges(&config.edge_color),
		}
	}
}

/// Clears the canvas and draws edges, then nodes, under the view transform.
pub fn render(
	state: &TopologyState,
	renderers: &Renderers,
	images: &ImageCache,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(&state.config.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let frame = Frame {
		ctx,
		time: state.flow_time,
		config: &state.config,
		images,
	};
	for (i, path) in state.layout.edges.iter().enumerate() {
		let style = renderers
			.edge_states
			.resolve(state.interaction.edge_state(i));
		renderers.edge.draw(&frame, path, &style);
	}
	for (i, (node, rect)) in state.data.nodes.iter().zip(&state.layout.nodes).enumerate() {
		let style = renderers
			.node_states
			.resolve(state.interaction.node_state(i));
		renderers.node.draw(&frame, node, rect, &style);
	}
	ctx.restore();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, r: &Rect, radius: f64) {
	let radius = radius.min(r.width / 2.0).min(r.height / 2.0);
	ctx.begin_path();
	ctx.move_to(r.x + radius, r.y);
	let _ = ctx.arc_to(r.right(), r.y, r.right(), r.bottom(), radius);
	let _ = ctx.arc_to(r.right(), r.bottom(), r.x, r.bottom(), radius);
	let _ = ctx.arc_to(r.x, r.bottom(), r.x, r.y, radius);
	let _ = ctx.arc_to(r.x, r.y, r.right(), r.y, radius);
	ctx.close_path();
}

fn apply_shadow(ctx: &CanvasRenderingContext2d, style: &ShapeStyle) {
	ctx.set_shadow_blur(style.shadow_blur.unwrap_or(0.0));
	ctx.set_shadow_color(style.shadow_color.as_deref().unwrap_or("transparent"));
}

/// Centres of the health (right) and sync (left) badge slots.
pub fn badge_slots(rect: &Rect, size: f64) -> [Point; 2] {
	let y = rect.center().y;
	let right = rect.right() - 8.0 - size / 2.0;
	[Point::new(right, y), Point::new(right - size - 4.0, y)]
}

/// Rounded card with accent bar, icon, fitted label and status badges.
#[derive(Default)]
pub struct ResourceNodeRenderer {
	/// Kind and provider icons.
	pub icons: IconTable,
}

impl ResourceNodeRenderer {
	fn draw_badge(&self, frame: &Frame, badge: Badge, at: Point) {
		let ctx = frame.ctx;
		let size = frame.config.badge_size;
		ctx.save();
		let _ = ctx.translate(at.x, at.y);
		if badge.spins {
			let _ = ctx.rotate(spin_angle(frame.time, frame.config.spin_period));
		}
		match frame.images.get(badge.asset) {
			Some(img) => {
				let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
					&img,
					-size / 2.0,
					-size / 2.0,
					size,
					size,
				);
			}
			None => {
				ctx.begin_path();
				let _ = ctx.arc(0.0, 0.0, size / 2.0 - 1.0, 0.0, 2.0 * PI);
				ctx.set_fill_style_str(badge.color);
				ctx.fill();
				if badge.spins {
					// open arc shows the spin
					ctx.begin_path();
					let _ = ctx.arc(0.0, 0.0, size / 4.0, 0.0, 1.5 * PI);
					ctx.set_stroke_style_str("#ffffff");
					ctx.set_line_width(1.5);
					ctx.stroke();
				}
			}
		}
		ctx.restore();
	}
}

impl NodeRenderer for ResourceNodeRenderer {
	fn draw(&self, frame: &Frame, node: &ResourceNode, rect: &Rect, style: &ShapeStyle) {
		let (ctx, config) = (frame.ctx, frame.config);

		ctx.save();
		apply_shadow(ctx, style);
		rounded_rect(ctx, rect, config.node_radius);
		ctx.set_fill_style_str(style.fill.as_deref().unwrap_or(&config.node_fill));
		ctx.fill();
		ctx.restore();

		ctx.save();
		rounded_rect(ctx, rect, config.node_radius);
		ctx.clip();
		ctx.set_fill_style_str(plane_color(node.data.resource_plane.as_deref()));
		ctx.fill_rect(rect.x, rect.y, config.accent_width, rect.height);
		ctx.restore();

		rounded_rect(ctx, rect, config.node_radius);
		ctx.set_stroke_style_str(style.stroke.as_deref().unwrap_or(&config.node_stroke));
		ctx.set_line_width(style.line_width.unwrap_or(1.0));
		ctx.stroke();

		let cy = rect.center().y;
		let icon_x = rect.x + config.accent_width + 8.0;
		let icon = self
			.icons
			.lookup([node.kind(), node.data.resource_type.as_deref()]);
		if let Some(img) = frame.images.get(icon) {
			let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
				&img,
				icon_x,
				cy - config.icon_size / 2.0,
				config.icon_size,
				config.icon_size,
			);
		}

		let text_x = icon_x + config.icon_size + 8.0;
		let label_width = config.label_width();
		ctx.set_text_baseline("middle");
		ctx.set_text_align("left");
		ctx.set_fill_style_str(&config.label_color);
		ctx.set_font(&format!("{}px sans-serif", config.font_size));
		let subtitle = node.kind().or(node.data.resource_type.as_deref());
		let label_y = if subtitle.is_some() { cy - 7.0 } else { cy };
		let _ = ctx.fill_text(
			&fit_label(&node.label, label_width, config.font_size),
			text_x,
			label_y,
		);
		if let Some(subtitle) = subtitle {
			let small = config.font_size - 2.0;
			ctx.set_fill_style_str("#8c8c8c");
			ctx.set_font(&format!("{small}px sans-serif"));
			let _ = ctx.fill_text(&fit_label(subtitle, label_width, small), text_x, cy + 9.0);
		}

		let [health_at, sync_at] = badge_slots(rect, config.badge_size);
		if let Some(health) = node.data.health {
			self.draw_badge(frame, health_badge(health), health_at);
		}
		if let Some(sync) = node.data.sync {
			self.draw_badge(frame, sync_badge(sync), sync_at);
		}
	}
}

/// Tip and the two back corners of an arrowhead on the last segment.
pub fn arrow_head(path: &[Point], size: f64) -> Option<[Point; 3]> {
	let [.., from, tip] = path else {
		return None;
	};
	let (dx, dy) = (tip.x - from.x, tip.y - from.y);
	let len = dx.hypot(dy);
	if len < 1e-6 {
		return None;
	}
	let (ux, uy) = (dx / len, dy / len);
	let back = Point::new(tip.x - ux * size, tip.y - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
	Some([
		*tip,
		Point::new(back.x + px, back.y + py),
		Point::new(back.x - px, back.y - py),
	])
}

/// Where the travelling dot sits at `time` for a loop of `period` seconds.
pub fn dot_position(path: &[Point], time: f64, period: f64) -> Option<Point> {
	if period <= 0.0 {
		return None;
	}
	point_along(path, time.rem_euclid(period) / period)
}

/// Orthogonal polyline with an arrowhead and an optional travelling dot.
pub struct FlowEdgeRenderer {
	/// Head style.
	pub arrow: ArrowKind,
	/// Head length.
	pub arrow_size: f64,
	/// Draw the travelling dot.
	pub animate: bool,
	/// Seconds per dot lap.
	pub period: f64,
}

impl EdgeRenderer for FlowEdgeRenderer {
	fn draw(&self, frame: &Frame, path: &[Point], style: &ShapeStyle) {
		let ctx = frame.ctx;
		let Some((first, rest)) = path.split_first() else {
			return;
		};
		let color = style
			.stroke
			.as_deref()
			.unwrap_or(&frame.config.edge_color);

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(style.line_width.unwrap_or(1.0));
		ctx.set_line_join("round");
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.begin_path();
		ctx.move_to(first.x, first.y);
		for p in rest {
			ctx.line_to(p.x, p.y);
		}
		ctx.stroke();

		if let Some([tip, left, right]) = arrow_head(path, self.arrow_size) {
			match self.arrow {
				ArrowKind::Triangle => {
					ctx.begin_path();
					ctx.move_to(tip.x, tip.y);
					ctx.line_to(left.x, left.y);
					ctx.line_to(right.x, right.y);
					ctx.close_path();
					ctx.set_fill_style_str(style.fill.as_deref().unwrap_or(color));
					ctx.fill();
				}
				ArrowKind::Vee => {
					ctx.begin_path();
					ctx.move_to(left.x, left.y);
					ctx.line_to(tip.x, tip.y);
					ctx.line_to(right.x, right.y);
					ctx.stroke();
				}
				ArrowKind::None => {}
			}
		}

		if self.animate {
			if let Some(dot) = dot_position(path, frame.time, self.period) {
				ctx.begin_path();
				let _ = ctx.arc(dot.x, dot.y, 3.0, 0.0, 2.0 * PI);
				ctx.set_fill_style_str(color);
				ctx.fill();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn arrow_points_along_last_segment() {
		let path = [
			Point::new(0.0, 0.0),
			Point::new(0.0, 10.0),
			Point::new(20.0, 10.0),
		];
		let [tip, left, right] = arrow_head(&path, 8.0).unwrap();
		assert_eq!(tip, Point::new(20.0, 10.0));
		assert_eq!(left, Point::new(12.0, 14.0));
		assert_eq!(right, Point::new(12.0, 6.0));
		assert_eq!(arrow_head(&path[..1], 8.0), None);
	}

	#[test]
	fn dot_loops_with_period() {
		let path = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
		assert_eq!(dot_position(&path, 0.5, 2.0), Some(Point::new(25.0, 0.0)));
		assert_eq!(dot_position(&path, 2.5, 2.0), Some(Point::new(25.0, 0.0)));
		assert_eq!(dot_position(&path, 1.0, 0.0), None);
	}

	#[test]
	fn badges_sit_inside_the_right_edge() {
		let rect = Rect::new(0.0, 0.0, 180.0, 44.0);
		let [health, sync] = badge_slots(&rect, 14.0);
		assert_eq!(health, Point::new(165.0, 22.0));
		assert_eq!(sync, Point::new(147.0, 22.0));
		assert!(health.x + 7.0 < rect.right());
	}
}
