use super::config::TopologyConfig;
use super::geometry::{Point, ViewTransform, distance_to_polyline};
use super::interaction::{HoverTarget, InteractionController, edge_anchor, node_anchor};
use super::layers::{LayerMap, layer_map};
use super::layout::Layout;
use super::types::{GraphData, NodeClickPayload};

/// Padding kept around the graph when fitting it to the canvas.
pub const FIT_PADDING: f64 = 32.0;
/// Pointer travel, in pixels, after which a press becomes a pan.
const DRAG_THRESHOLD: f64 = 3.0;

/// A background drag in progress.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// A press on the background is held.
	pub active: bool,
	/// The press travelled far enough to count as a pan.
	pub moved: bool,
	/// Screen position of the press.
	pub start_x: f64,
	/// Screen position of the press.
	pub start_y: f64,
	/// Translation when the press began.
	pub transform_start_x: f64,
	/// Translation when the press began.
	pub transform_start_y: f64,
}

/// Lines shown in the tooltip for the hovered item.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipContent {
	/// Heading, the resource label.
	pub title: String,
	/// Key/value rows.
	pub lines: Vec<(String, String)>,
}

/// Everything one mounted canvas knows: graph, layout, view and pointer state.
pub struct TopologyState {
	/// The graph being shown.
	pub data: GraphData,
	/// Positions, index-aligned with `data`.
	pub layout: Layout,
	/// Fan-out histogram, used for sizing.
	pub layers: LayerMap,
	/// Sizes and colours.
	pub config: TopologyConfig,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Background drag state.
	pub pan: PanState,
	/// Hover, tooltip and selection.
	pub interaction: InteractionController,
	/// Canvas size in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Whether the clock advances.
	pub animation_running: bool,
	/// Seconds of animation elapsed.
	pub flow_time: f64,
}

impl TopologyState {
	/// Lays out `data`, fits it to the canvas and selects the workload node, if any.
	pub fn new(data: GraphData, config: TopologyConfig, width: f64, height: f64) -> Self {
		let layout = Layout::compute(&data, &config);
		let layers = layer_map(&data.edges);
		let transform = ViewTransform::fit(&layout.bounds, width, height, FIT_PADDING);
		let mut interaction = InteractionController::default();
		if let Some(workload) = &data.workload {
			interaction.click(data.nodes.iter().position(|n| &n.id == workload));
		}
		Self {
			data,
			layout,
			layers,
			config,
			transform,
			pan: PanState::default(),
			interaction,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	/// Resets pan and zoom so the whole graph is visible.
	pub fn fit_to_view(&mut self) {
		self.transform = ViewTransform::fit(&self.layout.bounds, self.width, self.height, FIT_PADDING);
	}

	/// Canvas height that shows the graph without zooming out.
	pub fn preferred_height(&self) -> f64 {
		let pitch = self.config.node_height + self.config.node_sep;
		(self.layers.widest() as f64 * pitch).max(self.layout.bounds.height) + 2.0 * FIT_PADDING
	}

	/// Screen position to graph space.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		self.transform.to_graph(Point::new(sx, sy))
	}

	/// Node or edge under a screen position. Nodes win over edges.
	pub fn item_at(&self, sx: f64, sy: f64) -> Option<HoverTarget> {
		let p = self.screen_to_graph(sx, sy);
		if let Some(idx) = self.layout.node_at(p) {
			return Some(HoverTarget::Node(idx));
		}
		// tolerance stays constant on screen
		let tolerance = self.config.edge_hit_tolerance / self.transform.k;
		self.layout
			.edges
			.iter()
			.enumerate()
			.map(|(i, path)| (i, distance_to_polyline(p, path)))
			.filter(|&(_, d)| d <= tolerance)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| HoverTarget::Edge(i))
	}

	/// Graph-space tooltip anchor of `target`.
	pub fn anchor_of(&self, target: HoverTarget) -> Point {
		match target {
			HoverTarget::Node(i) => self
				.layout
				.nodes
				.get(i)
				.map(node_anchor)
				.unwrap_or_default(),
			HoverTarget::Edge(i) => self
				.layout
				.edges
				.get(i)
				.map(|path| edge_anchor(path))
				.unwrap_or_default(),
		}
	}

	/// Starts a pan unless the press lands on a node.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if matches!(self.item_at(sx, sy), Some(HoverTarget::Node(_))) {
			return;
		}
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Pans while a press is held, otherwise updates hover and the tooltip.
	/// Returns true when the tooltip changed.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> bool {
		if self.pan.active {
			let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
			if dx.hypot(dy) > DRAG_THRESHOLD {
				self.pan.moved = true;
			}
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
			self.reanchor_tooltip();
			return self.interaction.tooltip().visible;
		}
		match self.item_at(sx, sy) {
			Some(target) => {
				let anchor = self.anchor_of(target);
				self.interaction.pointer_enter(target, anchor, &self.transform)
			}
			None => self.interaction.pointer_leave(),
		}
	}

	/// Ends a press. A press that did not pan is a click: it selects the node
	/// under the pointer (or clears the selection) and yields the payload for
	/// the host.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<NodeClickPayload> {
		let panned = self.pan.active && self.pan.moved;
		self.pan = PanState::default();
		if panned {
			return None;
		}
		let node = match self.item_at(sx, sy) {
			Some(HoverTarget::Node(i)) => Some(i),
			_ => None,
		};
		self.interaction
			.click(node)
			.and_then(|i| self.data.nodes.get(i))
			.map(NodeClickPayload::from)
	}

	/// Pointer left the canvas. Returns true if a tooltip was closed.
	pub fn pointer_leave(&mut self) -> bool {
		self.pan = PanState::default();
		self.interaction.pointer_leave()
	}

	/// Zooms about the pointer, in for negative `delta_y`.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.transform.zoom_at(Point::new(sx, sy), factor);
		self.reanchor_tooltip();
	}

	fn reanchor_tooltip(&mut self) {
		if let Some(target) = self.interaction.hovered() {
			let anchor = self.anchor_of(target);
			self.interaction.reanchor(anchor, &self.transform);
		}
	}

	/// Title and rows for the tooltip of `target`.
	pub fn tooltip_content(&self, target: HoverTarget) -> Option<TooltipContent> {
		match target {
			HoverTarget::Node(i) => {
				let node = self.data.nodes.get(i)?;
				let meta = &node.data;
				let mut lines = vec![("ID".to_string(), node.id.clone())];
				let fields = [
					("Kind", node.kind().map(str::to_string)),
					("Type", meta.resource_type.clone()),
					("Plane", meta.resource_plane.clone()),
					("Cloud ID", meta.cloud_resource_id.clone()),
					("IAM ID", meta.iam_resource_id.clone()),
					("Status", meta.status.clone()),
					("Health", meta.health.map(|h| format!("{h:?}"))),
					("Sync", meta.sync.map(|s| format!("{s:?}"))),
					("Count", meta.count.map(|c| c.to_string())),
				];
				lines.extend(
					fields
						.into_iter()
						.filter_map(|(k, v)| Some((k.to_string(), v?))),
				);
				Some(TooltipContent {
					title: node.label.clone(),
					lines,
				})
			}
			HoverTarget::Edge(i) => {
				let edge = self.data.edges.get(i)?;
				Some(TooltipContent {
					title: "Dependency".to_string(),
					lines: vec![
						("From".to_string(), edge.source.clone()),
						("To".to_string(), edge.target.clone()),
					],
				})
			}
		}
	}

	/// Advances the animation clock.
	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	/// Records a new canvas size. The view is left as it is.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::topology::builder::parse_payload;

	const PAYLOAD: &str = r#"{
		"resources": {
			"apps/v1:Deployment:default:web": {"resourcePlane": "Kubernetes", "health": "Progressing"},
			"apps/v1:ReplicaSet:default:web-6d4": {"resourcePlane": "Kubernetes"},
			"v1:Pod:default:web-6d4-x1": {"status": "Running", "health": "Healthy"}
		},
		"relations": [
			{"DependencyResource": "apps/v1:Deployment:default:web", "DependentResource": "apps/v1:ReplicaSet:default:web-6d4"},
			{"DependencyResource": "apps/v1:ReplicaSet:default:web-6d4", "DependentResource": "v1:Pod:default:web-6d4-x1"}
		],
		"workload": "apps/v1:Deployment:default:web"
	}"#;

	fn state() -> TopologyState {
		let data = parse_payload(PAYLOAD).unwrap();
		let mut state = TopologyState::new(data, TopologyConfig::default(), 1200.0, 600.0);
		state.transform = ViewTransform::default();
		state
	}

	fn center_of(state: &TopologyState, i: usize) -> Point {
		state.layout.nodes[i].center()
	}

	#[test]
	fn workload_starts_selected() {
		let state = state();
		assert_eq!(state.interaction.selected(), Some(0));
	}

	#[test]
	fn hover_opens_tooltip_for_node_then_edge() {
		let mut state = state();
		let c = center_of(&state, 1);
		assert!(state.pointer_move(c.x, c.y));
		let tooltip = state.interaction.tooltip();
		assert_eq!(tooltip.target, Some(HoverTarget::Node(1)));
		assert_eq!((tooltip.x, tooltip.y), (c.x, state.layout.nodes[1].y));

		let path = state.layout.edges[0].clone();
		let mid = edge_anchor(&path);
		assert!(state.pointer_move(mid.x, mid.y + 2.0));
		assert_eq!(
			state.interaction.tooltip().target,
			Some(HoverTarget::Edge(0))
		);

		assert!(state.pointer_move(-500.0, -500.0));
		assert!(!state.interaction.tooltip().visible);
	}

	#[test]
	fn click_selects_and_returns_metadata() {
		let mut state = state();
		let c = center_of(&state, 2);
		state.pointer_down(c.x, c.y);
		let payload = state.pointer_up(c.x, c.y).unwrap();
		assert_eq!(payload.id, "v1:Pod:default:web-6d4-x1");
		assert_eq!(payload.label, "web-6d4-x1");
		assert_eq!(payload.metadata.status.as_deref(), Some("Running"));
		assert_eq!(state.interaction.selected(), Some(2));
		assert!(!state.interaction.node_state(0).selected);
	}

	#[test]
	fn click_on_empty_canvas_clears_selection() {
		let mut state = state();
		state.pointer_down(-300.0, -300.0);
		assert_eq!(state.pointer_up(-300.0, -300.0), None);
		assert_eq!(state.interaction.selected(), None);
	}

	#[test]
	fn dragging_the_background_pans_without_clicking() {
		let mut state = state();
		state.pointer_down(-300.0, -300.0);
		state.pointer_move(-250.0, -280.0);
		assert_eq!((state.transform.x, state.transform.y), (50.0, 20.0));
		assert_eq!(state.pointer_up(-250.0, -280.0), None);
		assert_eq!(state.interaction.selected(), Some(0));
		assert!(!state.pan.active);
	}

	#[test]
	fn wheel_zoom_keeps_tooltip_on_its_item() {
		let mut state = state();
		let c = center_of(&state, 0);
		state.pointer_move(c.x, c.y);
		state.wheel(0.0, 0.0, -1.0);
		let anchor = state.transform.to_screen(state.anchor_of(HoverTarget::Node(0)));
		let tooltip = state.interaction.tooltip();
		assert_eq!((tooltip.x, tooltip.y), (anchor.x, anchor.y));
	}

	#[test]
	fn tooltip_lists_known_fields() {
		let state = state();
		let content = state.tooltip_content(HoverTarget::Node(2)).unwrap();
		assert_eq!(content.title, "web-6d4-x1");
		assert!(content
			.lines
			.contains(&("Status".to_string(), "Running".to_string())));
		assert!(content
			.lines
			.contains(&("Health".to_string(), "Healthy".to_string())));
		assert!(!content.lines.iter().any(|(k, _)| k == "Cloud ID"));
		assert_eq!(state.tooltip_content(HoverTarget::Edge(9)), None);
	}

	#[test]
	fn preferred_height_covers_the_layout() {
		let state = state();
		assert!(state.preferred_height() >= state.layout.bounds.height + 2.0 * FIT_PADDING);
	}
}
