use std::collections::{BTreeMap, BTreeSet};

use super::types::ResourceEdge;

/// Sentinel root id the histogram is seeded from.
pub const ROOT_ID: &str = "0";
/// Levels counted, the root's included.
pub const LAYER_COUNT: usize = 4;

/// Node counts per fan-out level below the sentinel root.
///
/// Only a sizing hint. Graphs keyed by real resource ids have no `"0"` node
/// and always come out as `{layer-1: 1, layer-2: 0, layer-3: 0, layer-4: 0}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerMap {
	counts: [usize; LAYER_COUNT],
}

impl LayerMap {
	/// Count for `layer-{n}`, 1-based.
	pub fn get(&self, layer: usize) -> usize {
		layer
			.checked_sub(1)
			.and_then(|i| self.counts.get(i))
			.copied()
			.unwrap_or(0)
	}

	/// Largest count over all layers.
	pub fn widest(&self) -> usize {
		self.counts.iter().copied().max().unwrap_or(0)
	}

	/// `layer-1`..`layer-4` keyed map.
	pub fn to_named(&self) -> BTreeMap<String, usize> {
		self.counts
			.iter()
			.enumerate()
			.map(|(i, &count)| (format!("layer-{}", i + 1), count))
			.collect()
	}
}

/// Counts the distinct nodes reached at each fan-out level from [`ROOT_ID`].
pub fn layer_map(edges: &[ResourceEdge]) -> LayerMap {
	let mut counts = [0; LAYER_COUNT];
	let mut level: BTreeSet<&str> = BTreeSet::from([ROOT_ID]);
	counts[0] = 1;

	for count in counts.iter_mut().skip(1) {
		level = edges
			.iter()
			.filter(|e| level.contains(e.source.as_str()))
			.map(|e| e.target.as_str())
			.collect();
		*count = level.len();
		if level.is_empty() {
			break;
		}
	}
	LayerMap { counts }
}
