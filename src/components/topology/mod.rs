//! Resource topology: payload to graph, layout, canvas rendering and
//! pointer interaction.

mod builder;
mod component;
mod config;
mod error;
mod geometry;
mod interaction;
mod label;
mod layers;
mod layout;
mod render;
mod state;
mod style;
#[cfg(test)]
mod test_support;
mod types;

pub use builder::{build_overview_graph, build_resource_graph, parse_payload, resource_label};
pub use component::TopologyCanvas;
pub use config::{ArrowKind, LayoutKind, TopologyConfig};
pub use error::{Result, TopologyError};
pub use geometry::{Point, Rect, ViewTransform};
pub use interaction::{HoverTarget, InteractionController, TooltipState};
pub use label::{fit_label, text_width};
pub use layers::{LayerMap, layer_map};
pub use layout::Layout;
pub use render::{
	EdgeRenderer, FlowEdgeRenderer, Frame, ImageCache, NodeRenderer, Renderers, ResourceNodeRenderer,
};
pub use state::{TooltipContent, TopologyState};
pub use style::{IconTable, ItemState, ShapeStyle, StateStyles};
pub use types::{
	GraphData, HealthStatus, NodeClickPayload, OverviewPayload, ResourceEdge, ResourceGraphPayload,
	ResourceMeta, ResourceNode, SyncStatus,
};
