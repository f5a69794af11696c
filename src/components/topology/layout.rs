//! Node placement and orthogonal edge routing.

use std::collections::{HashMap, VecDeque};
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::config::{LayoutKind, TopologyConfig};
use super::geometry::{Point, Rect};
use super::types::GraphData;

/// Positions for one [`GraphData`], index-aligned with its nodes and edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	/// Node boxes in graph space.
	pub nodes: Vec<Rect>,
	/// Routed polylines. Empty when an endpoint is unknown.
	pub edges: Vec<Vec<Point>>,
	/// Union of all node boxes.
	pub bounds: Rect,
}

impl Layout {
	/// Places the nodes with the configured strategy and routes every edge.
	pub fn compute(data: &GraphData, config: &TopologyConfig) -> Self {
		let centers = match config.layout {
			LayoutKind::Flow => flow_centers(data, config),
			LayoutKind::Force => force_centers(data, config),
		};
		let nodes: Vec<Rect> = centers
			.iter()
			.map(|c| {
				Rect::new(
					c.x - config.node_width / 2.0,
					c.y - config.node_height / 2.0,
					config.node_width,
					config.node_height,
				)
			})
			.collect();
		let index = index_of(data);
		let edges = data
			.edges
			.iter()
			.map(
				|e| match (index.get(e.source.as_str()), index.get(e.target.as_str())) {
					(Some(&s), Some(&t)) => route_elbow(&nodes[s], &nodes[t], config.rank_sep / 2.0),
					_ => Vec::new(),
				},
			)
			.collect();
		let bounds = nodes
			.iter()
			.copied()
			.reduce(|acc, r| acc.union(&r))
			.unwrap_or_default();
		Self {
			nodes,
			edges,
			bounds,
		}
	}

	/// Topmost node under `p`, in graph space.
	pub fn node_at(&self, p: Point) -> Option<usize> {
		self.nodes.iter().rposition(|r| r.contains(p))
	}
}

fn index_of(data: &GraphData) -> HashMap<&str, usize> {
	data.nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect()
}

/// Longest-path ranks. A node on a cycle takes one more than its highest
/// ranked predecessor placed before the cycle was broken.
pub fn ranks(data: &GraphData) -> Vec<usize> {
	let n = data.nodes.len();
	let index = index_of(data);
	let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
	let mut pred: Vec<Vec<usize>> = vec![Vec::new(); n];
	for e in &data.edges {
		if let (Some(&s), Some(&t)) = (index.get(e.source.as_str()), index.get(e.target.as_str())) {
			if s != t {
				succ[s].push(t);
				pred[t].push(s);
			}
		}
	}

	let mut indegree: Vec<usize> = pred.iter().map(Vec::len).collect();
	let mut rank = vec![0; n];
	let mut queued: Vec<bool> = indegree.iter().map(|&d| d == 0).collect();
	let mut queue: VecDeque<usize> = (0..n).filter(|&i| queued[i]).collect();
	loop {
		while let Some(u) = queue.pop_front() {
			for &v in &succ[u] {
				if queued[v] {
					continue;
				}
				rank[v] = rank[v].max(rank[u] + 1);
				indegree[v] -= 1;
				if indegree[v] == 0 {
					queued[v] = true;
					queue.push_back(v);
				}
			}
		}
		// break the first remaining cycle at its earliest node
		let Some(u) = (0..n).find(|&i| !queued[i]) else {
			break;
		};
		queued[u] = true;
		queue.push_back(u);
	}
	rank
}

fn flow_centers(data: &GraphData, config: &TopologyConfig) -> Vec<Point> {
	let rank = ranks(data);
	let Some(&max_rank) = rank.iter().max() else {
		return Vec::new();
	};
	let index = index_of(data);

	let mut columns: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
	for (i, &r) in rank.iter().enumerate() {
		columns[r].push(i);
	}

	// one barycenter sweep against the previous column
	let mut slot = vec![0.0; rank.len()];
	for column in &mut columns {
		let key: HashMap<usize, f64> = column
			.iter()
			.enumerate()
			.map(|(pos, &i)| {
				let preds: Vec<f64> = data
					.edges
					.iter()
					.filter(|e| e.target == data.nodes[i].id)
					.filter_map(|e| index.get(e.source.as_str()))
					.filter(|&&p| rank[p] + 1 == rank[i])
					.map(|&p| slot[p])
					.collect();
				let key = if preds.is_empty() {
					pos as f64
				} else {
					preds.iter().sum::<f64>() / preds.len() as f64
				};
				(i, key)
			})
			.collect();
		column.sort_by(|a, b| key[a].total_cmp(&key[b]));
		for (pos, &i) in column.iter().enumerate() {
			slot[i] = pos as f64;
		}
	}

	let pitch_x = config.node_width + config.rank_sep;
	let pitch_y = config.node_height + config.node_sep;
	let tallest = columns.iter().map(Vec::len).max().unwrap_or(0) as f64;
	let mut centers = vec![Point::default(); rank.len()];
	for (r, column) in columns.iter().enumerate() {
		let offset = (tallest - column.len() as f64) * pitch_y / 2.0;
		for (pos, &i) in column.iter().enumerate() {
			centers[i] = Point::new(
				r as f64 * pitch_x + config.node_width / 2.0,
				offset + pos as f64 * pitch_y + config.node_height / 2.0,
			);
		}
	}
	centers
}

fn force_centers(data: &GraphData, config: &TopologyConfig) -> Vec<Point> {
	let n = data.nodes.len();
	if n == 0 {
		return Vec::new();
	}
	let mut graph: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	let mut handles = Vec::with_capacity(n);
	for i in 0..n {
		let angle = (i as f64) * 2.0 * PI / n as f64;
		handles.push(graph.add_node(NodeData {
			x: (100.0 * angle.cos()) as f32,
			y: (100.0 * angle.sin()) as f32,
			mass: 10.0,
			is_anchor: false,
			user_data: i,
		}));
	}
	let index = index_of(data);
	for e in &data.edges {
		if let (Some(&s), Some(&t)) = (index.get(e.source.as_str()), index.get(e.target.as_str())) {
			graph.add_edge(handles[s], handles[t], EdgeData::default());
		}
	}
	for _ in 0..config.force_iterations {
		graph.update(0.016);
	}

	let mut centers = vec![Point::default(); n];
	graph.visit_nodes(|node| {
		centers[node.data.user_data] = Point::new(node.x() as f64, node.y() as f64);
	});
	spread(&mut centers, config.node_width + config.node_sep);
	centers
}

/// Scales positions so the mean nearest-neighbour distance is `target`.
fn spread(centers: &mut [Point], target: f64) {
	if centers.len() < 2 {
		return;
	}
	let nearest: f64 = centers
		.iter()
		.enumerate()
		.map(|(i, a)| {
			centers
				.iter()
				.enumerate()
				.filter(|&(j, _)| j != i)
				.map(|(_, b)| a.distance(*b))
				.fold(f64::INFINITY, f64::min)
		})
		.sum::<f64>()
		/ centers.len() as f64;
	if nearest > 1e-6 {
		let k = target / nearest;
		for c in centers.iter_mut() {
			c.x *= k;
			c.y *= k;
		}
	}
}

/// Orthogonal route from the right side of `from` to `to`.
///
/// Forward edges bend twice at the midpoint between the boxes. When both boxes
/// share a centre line the route is a single straight segment. Edges whose
/// target is not to the right go around below and enter from the bottom,
/// bending three times.
pub fn route_elbow(from: &Rect, to: &Rect, offset: f64) -> Vec<Point> {
	let start = Point::new(from.right(), from.center().y);
	if to.x >= from.right() {
		let end = Point::new(to.x, to.center().y);
		if (start.y - end.y).abs() < 0.5 {
			return vec![start, end];
		}
		let mid = (start.x + end.x) / 2.0;
		return vec![start, Point::new(mid, start.y), Point::new(mid, end.y), end];
	}
	let end = Point::new(to.center().x, to.bottom());
	let below = from.bottom().max(to.bottom()) + offset;
	let out = start.x + offset;
	vec![
		start,
		Point::new(out, start.y),
		Point::new(out, below),
		Point::new(end.x, below),
		end,
	]
}
