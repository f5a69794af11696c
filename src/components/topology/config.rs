use serde::Deserialize;

use super::error::{Result, TopologyError};

/// How node positions are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
	/// Left-to-right ranks following edge direction.
	#[default]
	Flow,
	/// Force-directed placement, for overview graphs.
	Force,
}

/// Head drawn at the target end of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowKind {
	/// Filled triangle.
	#[default]
	Triangle,
	/// Open two-stroke head.
	Vee,
	/// No head.
	None,
}

/// Sizing, timing and colours of a topology canvas.
///
/// Every field has a default, so a JSON override only names what it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopologyConfig {
	/// Placement strategy.
	pub layout: LayoutKind,
	/// Node card size, in graph units.
	pub node_width: f64,
	/// Node card height.
	pub node_height: f64,
	/// Corner radius of the card.
	pub node_radius: f64,
	/// Width of the plane-coloured bar on the left of a card.
	pub accent_width: f64,
	/// Side of the kind icon.
	pub icon_size: f64,
	/// Diameter of a status badge.
	pub badge_size: f64,
	/// Label font size in pixels.
	pub font_size: f64,
	/// Horizontal gap between ranks.
	pub rank_sep: f64,
	/// Vertical gap between nodes of one rank.
	pub node_sep: f64,
	/// Arrowhead style.
	pub arrow: ArrowKind,
	/// Arrowhead length.
	pub arrow_size: f64,
	/// Whether a dot travels along each edge.
	pub animate_edges: bool,
	/// Seconds for the edge dot to travel its path once.
	pub edge_dot_period: f64,
	/// Seconds per turn of the progressing badge.
	pub spin_period: f64,
	/// Iterations of the force simulation run before the first frame.
	pub force_iterations: usize,
	/// Screen pixels within which the pointer hits an edge.
	pub edge_hit_tolerance: f64,
	/// Canvas clear colour.
	pub background: String,
	/// Card fill when idle.
	pub node_fill: String,
	/// Card border when idle.
	pub node_stroke: String,
	/// Label text colour.
	pub label_color: String,
	/// Edge stroke when idle.
	pub edge_color: String,
}

impl Default for TopologyConfig {
	fn default() -> Self {
		Self {
			layout: LayoutKind::Flow,
			node_width: 180.0,
			node_height: 44.0,
			node_radius: 6.0,
			accent_width: 4.0,
			icon_size: 22.0,
			badge_size: 14.0,
			font_size: 13.0,
			rank_sep: 90.0,
			node_sep: 28.0,
			arrow: ArrowKind::Triangle,
			arrow_size: 8.0,
			animate_edges: true,
			edge_dot_period: 2.0,
			spin_period: 1.2,
			force_iterations: 300,
			edge_hit_tolerance: 5.0,
			background: "#f5f7fa".into(),
			node_fill: "#ffffff".into(),
			node_stroke: "#d9dde3".into(),
			label_color: "#1f2329".into(),
			edge_color: "#a3adba".into(),
		}
	}
}

impl TopologyConfig {
	/// Reads a partial config from JSON and checks that sizes and periods are positive.
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		let positive = [
			("nodeWidth", self.node_width),
			("nodeHeight", self.node_height),
			("fontSize", self.font_size),
			("edgeDotPeriod", self.edge_dot_period),
			("spinPeriod", self.spin_period),
		];
		match positive.iter().find(|(_, v)| !(*v > 0.0)) {
			Some((name, v)) => Err(TopologyError::InvalidConfig {
				message: format!("{name} must be positive, got {v}"),
			}),
			None => Ok(()),
		}
	}

	/// Width available to the label between the icon and the badges.
	pub fn label_width(&self) -> f64 {
		self.node_width - self.accent_width - self.icon_size - 2.0 * self.badge_size - 28.0
	}
}
