//! Tooltip, hover and selection state driven by pointer events.

use super::geometry::{Point, Rect, ViewTransform, point_along};
use super::style::ItemState;

/// Item under the pointer, by index into the graph's nodes or edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTarget {
	/// A node, by index.
	Node(usize),
	/// An edge, by index.
	Edge(usize),
}

/// The one tooltip a canvas shows, in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TooltipState {
	/// Screen x of the anchor.
	pub x: f64,
	/// Screen y of the anchor.
	pub y: f64,
	/// Whether the tooltip is shown.
	pub visible: bool,
	/// Item the tooltip describes.
	pub target: Option<HoverTarget>,
}

/// Graph-space anchor of a node tooltip: top centre of its box.
pub fn node_anchor(rect: &Rect) -> Point {
	Point::new(rect.center().x, rect.y)
}

/// Graph-space anchor of an edge tooltip: halfway along its path.
pub fn edge_anchor(path: &[Point]) -> Point {
	point_along(path, 0.5).unwrap_or_default()
}

/// Hover, tooltip and selection of one canvas.
///
/// At most one tooltip is open and at most one node is selected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionController {
	tooltip: TooltipState,
	hovered: Option<HoverTarget>,
	selected: Option<usize>,
}

impl InteractionController {
	/// Current tooltip.
	pub fn tooltip(&self) -> TooltipState {
		self.tooltip
	}

	/// Item under the pointer.
	pub fn hovered(&self) -> Option<HoverTarget> {
		self.hovered
	}

	/// Selected node index.
	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	/// Shows the tooltip for `target` anchored at graph-space `anchor`.
	/// Returns false when `target` was already hovered.
	pub fn pointer_enter(
		&mut self,
		target: HoverTarget,
		anchor: Point,
		transform: &ViewTransform,
	) -> bool {
		if self.hovered == Some(target) {
			return false;
		}
		let at = transform.to_screen(anchor);
		self.hovered = Some(target);
		self.tooltip = TooltipState {
			x: at.x,
			y: at.y,
			visible: true,
			target: Some(target),
		};
		true
	}

	/// Hides the tooltip and clears hover. Returns false if nothing was hovered.
	pub fn pointer_leave(&mut self) -> bool {
		if self.hovered.is_none() {
			return false;
		}
		self.hovered = None;
		self.tooltip = TooltipState::default();
		true
	}

	/// Selects `node`, replacing any earlier selection. `None` (a click on
	/// empty canvas) clears it. Returns the node the host should be told about.
	pub fn click(&mut self, node: Option<usize>) -> Option<usize> {
		self.selected = node;
		node
	}

	/// Moves the open tooltip after the view was panned or zoomed.
	pub fn reanchor(&mut self, anchor: Point, transform: &ViewTransform) {
		if self.tooltip.visible {
			let at = transform.to_screen(anchor);
			self.tooltip.x = at.x;
			self.tooltip.y = at.y;
		}
	}

	/// Interaction state of node `idx`.
	pub fn node_state(&self, idx: usize) -> ItemState {
		ItemState {
			hovered: self.hovered == Some(HoverTarget::Node(idx)),
			selected: self.selected == Some(idx),
		}
	}

	/// Interaction state of edge `idx`. Edges are hovered, never selected.
	pub fn edge_state(&self, idx: usize) -> ItemState {
		ItemState {
			hovered: self.hovered == Some(HoverTarget::Edge(idx)),
			selected: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn enter_opens_tooltip_at_screen_anchor() {
		let mut ctl = InteractionController::default();
		let transform = ViewTransform {
			x: 10.0,
			y: 5.0,
			k: 2.0,
		};
		let rect = Rect::new(0.0, 20.0, 100.0, 40.0);
		assert!(ctl.pointer_enter(HoverTarget::Node(3), node_anchor(&rect), &transform));
		assert_eq!(
			ctl.tooltip(),
			TooltipState {
				x: 110.0,
				y: 45.0,
				visible: true,
				target: Some(HoverTarget::Node(3)),
			}
		);
		assert!(ctl.node_state(3).hovered);
		assert!(!ctl.pointer_enter(HoverTarget::Node(3), node_anchor(&rect), &transform));
	}

	#[test]
	fn leave_closes_tooltip_and_clears_hover() {
		let mut ctl = InteractionController::default();
		ctl.pointer_enter(HoverTarget::Edge(0), Point::new(1.0, 1.0), &ViewTransform::default());
		assert!(ctl.edge_state(0).hovered);
		assert!(ctl.pointer_leave());
		assert_eq!(ctl.tooltip(), TooltipState::default());
		assert_eq!(ctl.hovered(), None);
		assert!(!ctl.pointer_leave());
	}

	#[test]
	fn moving_between_items_swaps_the_single_tooltip() {
		let mut ctl = InteractionController::default();
		let t = ViewTransform::default();
		ctl.pointer_enter(HoverTarget::Node(0), Point::new(0.0, 0.0), &t);
		ctl.pointer_enter(HoverTarget::Node(1), Point::new(50.0, 0.0), &t);
		assert!(!ctl.node_state(0).hovered);
		assert!(ctl.node_state(1).hovered);
		assert_eq!(ctl.tooltip().x, 50.0);
	}

	#[test]
	fn at_most_one_node_is_selected() {
		let mut ctl = InteractionController::default();
		assert_eq!(ctl.click(Some(2)), Some(2));
		assert_eq!(ctl.click(Some(4)), Some(4));
		assert!(!ctl.node_state(2).selected);
		assert!(ctl.node_state(4).selected);
		assert_eq!(ctl.click(None), None);
		assert_eq!(ctl.selected(), None);
	}

	#[test]
	fn edge_anchor_is_path_midpoint() {
		let path = [Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 10.0)];
		assert_eq!(edge_anchor(&path), Point::new(0.0, 10.0));
		assert_eq!(edge_anchor(&[]), Point::default());
	}

	#[test]
	fn reanchor_follows_pan() {
		let mut ctl = InteractionController::default();
		let anchor = Point::new(10.0, 10.0);
		ctl.pointer_enter(HoverTarget::Node(0), anchor, &ViewTransform::default());
		let panned = ViewTransform {
			x: 30.0,
			y: 0.0,
			k: 1.0,
		};
		ctl.reanchor(anchor, &panned);
		assert_eq!((ctl.tooltip().x, ctl.tooltip().y), (40.0, 10.0));
	}
}
