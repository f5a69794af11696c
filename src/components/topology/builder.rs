//! Turns API payloads into a normalized [`GraphData`].
//!
//! Edges always point from the dependency (owner) toward the dependent,
//! whichever payload shape they came from.

use std::collections::HashSet;

use log::{debug, warn};
use serde_json::Value;

use super::error::{Result, TopologyError};
use super::types::{
	GraphData, OverviewEntry, OverviewPayload, RelationKind, ResourceEdge, ResourceGraphPayload,
	ResourceMeta, ResourceNode,
};

/// Human-readable name for a composite resource id.
///
/// `apps/v1:Deployment:default:nginx` becomes `nginx`, `aws_vpc.main` becomes
/// `main`. Ids without separators come back unchanged.
pub fn resource_label(id: &str) -> String {
	let pick = |sep: char| {
		id.contains(sep)
			.then(|| id.rsplit(sep).find(|s| !s.is_empty()))
			.flatten()
	};
	pick(':')
		.or_else(|| pick('.'))
		.unwrap_or(id)
		.to_string()
}

/// Collects edges, dropping repeats of the same ordered pair.
#[derive(Default)]
struct EdgeSet {
	seen: HashSet<String>,
	edges: Vec<ResourceEdge>,
}

impl EdgeSet {
	fn insert(&mut self, source: &str, target: &str) {
		let edge = ResourceEdge::new(source, target);
		if self.seen.insert(edge.key()) {
			self.edges.push(edge);
		}
	}

	/// Drops edges whose endpoints are not nodes of this graph.
	fn finish(self, nodes: &[ResourceNode]) -> Vec<ResourceEdge> {
		let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		let (kept, dangling): (Vec<_>, Vec<_>) = self.edges.into_iter().partition(|e| {
			ids.contains(e.source.as_str()) && ids.contains(e.target.as_str())
		});
		for edge in &dangling {
			warn!("dropping dangling edge {}", edge.key());
		}
		kept
	}
}

fn node(id: &str, data: ResourceMeta) -> ResourceNode {
	ResourceNode {
		id: id.to_string(),
		label: resource_label(id),
		data,
	}
}

/// Builds the graph for the canonical `{resources, relations, workload}` shape.
pub fn build_resource_graph(payload: &ResourceGraphPayload) -> GraphData {
	let nodes: Vec<ResourceNode> = payload
		.resources
		.iter()
		.map(|(id, meta)| node(id, meta.clone()))
		.collect();

	let mut edges = EdgeSet::default();
	for relation in &payload.relations {
		edges.insert(&relation.dependency, &relation.dependent);
	}
	let edges = edges.finish(&nodes);

	debug!(
		"built resource graph: {} nodes, {} edges",
		nodes.len(),
		edges.len()
	);
	GraphData {
		nodes,
		edges,
		workload: payload.workload.clone(),
	}
}

/// Node metadata for an overview entry, relation lists included.
fn overview_meta(entry: &OverviewEntry) -> ResourceMeta {
	let mut meta = entry.meta.clone();
	if !entry.relationship.is_empty() {
		let relationship = entry
			.relationship
			.iter()
			.map(|(id, kind)| (id.clone(), Value::from(kind.as_str())))
			.collect();
		meta.extra.insert("relationship".into(), Value::Object(relationship));
	}
	let ids = |list: &[String]| {
		Value::Array(list.iter().map(|id| Value::from(id.as_str())).collect())
	};
	if !entry.children.is_empty() {
		meta.extra.insert("children".into(), ids(&entry.children));
	}
	if !entry.parents.is_empty() {
		meta.extra.insert("Parents".into(), ids(&entry.parents));
	}
	meta
}

/// Builds the graph for the overview `{id: {relationship, children, Parents}}` shape.
pub fn build_overview_graph(payload: &OverviewPayload) -> GraphData {
	let nodes: Vec<ResourceNode> = payload
		.iter()
		.map(|(id, entry)| node(id, overview_meta(entry)))
		.collect();

	let mut edges = EdgeSet::default();
	for (owner, entry) in payload {
		for (target, kind) in &entry.relationship {
			match kind {
				RelationKind::Child => edges.insert(owner, target),
				RelationKind::Parent => edges.insert(target, owner),
			}
		}
		for child in &entry.children {
			edges.insert(owner, child);
		}
		for parent in &entry.parents {
			edges.insert(parent, owner);
		}
	}
	let edges = edges.finish(&nodes);

	debug!(
		"built overview graph: {} nodes, {} edges",
		nodes.len(),
		edges.len()
	);
	GraphData {
		nodes,
		edges,
		workload: None,
	}
}

/// Parses either payload shape from JSON text.
pub fn parse_payload(json: &str) -> Result<GraphData> {
	let value: Value = serde_json::from_str(json)?;
	let canonical = match &value {
		Value::Object(map) => map.contains_key("resources"),
		other => {
			return Err(TopologyError::UnrecognizedPayload {
				found: json_kind(other),
			});
		}
	};
	if canonical {
		let payload: ResourceGraphPayload = serde_json::from_value(value)?;
		Ok(build_resource_graph(&payload))
	} else {
		let payload: OverviewPayload = serde_json::from_value(value)?;
		Ok(build_overview_graph(&payload))
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;
	use crate::components::topology::test_support::resource_payload;
	use crate::components::topology::types::NodeClickPayload;

	fn ids(data: &GraphData) -> Vec<&str> {
		data.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	fn pairs(data: &GraphData) -> Vec<(&str, &str)> {
		data.edges
			.iter()
			.map(|e| (e.source.as_str(), e.target.as_str()))
			.collect()
	}

	#[test]
	fn labels_come_from_the_last_id_segment() {
		assert_eq!(resource_label("apps/v1:Deployment:default:nginx"), "nginx");
		assert_eq!(resource_label("aws_vpc.main"), "main");
		assert_eq!(resource_label("plain-name"), "plain-name");
		assert_eq!(resource_label("v1:Namespace::"), "Namespace");
		assert_eq!(resource_label(":::"), ":::");
		assert_eq!(resource_label(""), "");
	}

	#[test]
	fn relation_records_become_dependency_edges() {
		let payload = resource_payload(
			[("A", ResourceMeta::default()), ("B", ResourceMeta::default())],
			[("A", "B")],
		);
		let data = build_resource_graph(&payload);
		assert_eq!(ids(&data), vec!["A", "B"]);
		assert_eq!(pairs(&data), vec![("A", "B")]);
	}

	#[test]
	fn duplicate_relations_collapse() {
		let payload = resource_payload(
			[("A", ResourceMeta::default()), ("B", ResourceMeta::default())],
			[("A", "B"), ("A", "B"), ("B", "A")],
		);
		let data = build_resource_graph(&payload);
		assert_eq!(pairs(&data), vec![("A", "B"), ("B", "A")]);
	}

	#[test]
	fn building_twice_is_identical() {
		let payload = resource_payload(
			[
				("v1:Pod:default:web-1", ResourceMeta::default()),
				("apps/v1:ReplicaSet:default:web", ResourceMeta::default()),
				("v1:Pod:default:web-0", ResourceMeta::default()),
			],
			[
				("apps/v1:ReplicaSet:default:web", "v1:Pod:default:web-0"),
				("apps/v1:ReplicaSet:default:web", "v1:Pod:default:web-1"),
			],
		);
		assert_eq!(build_resource_graph(&payload), build_resource_graph(&payload));
	}

	#[test]
	fn dangling_edges_are_dropped() {
		let payload = resource_payload([("A", ResourceMeta::default())], [("A", "ghost")]);
		let data = build_resource_graph(&payload);
		assert!(data.edges.is_empty());
	}

	#[test]
	fn overview_relationship_direction() {
		let data = parse_payload(
			r#"{
				"owner": {"count": 2, "relationship": {"kid": "child", "boss": "parent"}},
				"kid": {"count": 1},
				"boss": {"count": 1}
			}"#,
		)
		.unwrap();
		assert_eq!(ids(&data), vec!["boss", "kid", "owner"]);
		let edges = pairs(&data);
		assert!(edges.contains(&("owner", "kid")));
		assert!(edges.contains(&("boss", "owner")));
		assert_eq!(edges.len(), 2);
		assert_eq!(data.node("owner").unwrap().data.count, Some(2));
	}

	#[test]
	fn overview_lists_merge_with_relationship() {
		let data = parse_payload(
			r#"{
				"rs": {"relationship": {"pod": "child"}, "children": ["pod"], "Parents": ["deploy"]},
				"pod": {"relationship": {"rs": "parent"}},
				"deploy": {}
			}"#,
		)
		.unwrap();
		assert_eq!(pairs(&data), vec![("rs", "pod"), ("deploy", "rs")]);
	}

	#[test]
	fn overview_click_payload_keeps_the_whole_entry() {
		let data = parse_payload(
			r#"{
				"a": {"count": 1, "relationship": {"b": "child"}, "children": ["b"], "note": "x"},
				"b": {}
			}"#,
		)
		.unwrap();
		let payload = serde_json::to_value(NodeClickPayload::from(data.node("a").unwrap())).unwrap();
		assert_eq!(
			payload,
			json!({
				"id": "a",
				"label": "a",
				"count": 1,
				"relationship": {"b": "child"},
				"children": ["b"],
				"note": "x"
			})
		);
		let bare = serde_json::to_value(NodeClickPayload::from(data.node("b").unwrap())).unwrap();
		assert_eq!(bare, json!({"id": "b", "label": "b"}));
	}

	#[test]
	fn null_collections_still_build_the_nodes() {
		let data = parse_payload(r#"{"resources": {"A": {}}, "relations": null}"#).unwrap();
		assert_eq!(ids(&data), vec!["A"]);
		assert!(data.edges.is_empty());

		let data =
			parse_payload(r#"{"a": {"relationship": null, "children": null, "Parents": null}}"#)
				.unwrap();
		assert_eq!(ids(&data), vec!["a"]);
		assert!(data.edges.is_empty());
	}

	#[test]
	fn canonical_payload_keeps_workload() {
		let data = parse_payload(
			r#"{
				"resources": {"A": {"status": "Running"}, "B": {}},
				"relations": [{"DependencyResource": "A", "DependentResource": "B"}],
				"workload": "A"
			}"#,
		)
		.unwrap();
		assert_eq!(data.workload.as_deref(), Some("A"));
		assert_eq!(data.nodes[0].data.status.as_deref(), Some("Running"));
	}

	#[test]
	fn non_object_payloads_are_rejected() {
		let err = parse_payload("[1, 2]").unwrap_err();
		assert!(matches!(
			err,
			TopologyError::UnrecognizedPayload { found: "an array" }
		));
		assert!(matches!(parse_payload("{"), Err(TopologyError::Json(_))));
	}
}
