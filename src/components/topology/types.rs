use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Health reported for a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
	/// Running as intended.
	Healthy,
	/// Rolling out or starting up.
	Progressing,
	/// Failing or unavailable.
	Degraded,
	/// Paused on purpose.
	Suspended,
	/// Expected but not found.
	Missing,
	/// Anything else the API reports.
	#[serde(other)]
	Unknown,
}

/// Desired-vs-live sync state of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncStatus {
	/// Live state matches the desired state.
	Synced,
	/// Live state has drifted.
	OutOfSync,
	/// Anything else the API reports.
	#[serde(other)]
	Unknown,
}

/// Metadata attached to a resource in either payload shape.
///
/// Unknown fields are kept in `extra` so the click callback hands the host
/// everything the API sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
	/// Provider family, e.g. `Kubernetes`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_type: Option<String>,
	/// Plane the resource lives in; picks the accent colour.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_plane: Option<String>,
	/// Provider-side identifier.
	#[serde(
		default,
		rename = "cloudResourceID",
		skip_serializing_if = "Option::is_none"
	)]
	pub cloud_resource_id: Option<String>,
	/// Identity bound to the resource.
	#[serde(
		default,
		rename = "iamResourceID",
		skip_serializing_if = "Option::is_none"
	)]
	pub iam_resource_id: Option<String>,
	/// Free-form status text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	/// Health badge.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub health: Option<HealthStatus>,
	/// Sync badge.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sync: Option<SyncStatus>,
	/// Instance count, from overview payloads.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub count: Option<u64>,
	/// Grouping info, passed through untouched.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_group: Option<serde_json::Value>,
	/// Every other field of the payload entry.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// One resource of the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceNode {
	/// Composite id as sent by the API.
	pub id: String,
	/// Display name derived from the id.
	pub label: String,
	/// Full metadata.
	pub data: ResourceMeta,
}

impl ResourceNode {
	/// Kind segment of an `apiVersion:Kind[:namespace:name]` id, if present.
	pub fn kind(&self) -> Option<&str> {
		self.id.split(':').nth(1).filter(|k| !k.is_empty())
	}
}

/// Directed dependency, owner to dependent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceEdge {
	/// Id of the dependency.
	pub source: String,
	/// Id of the dependent.
	pub target: String,
}

impl ResourceEdge {
	/// Edge from `source` to `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}

	/// Dedup key, `source->target`.
	pub fn key(&self) -> String {
		format!("{}->{}", self.source, self.target)
	}
}

/// Normalized graph handed to layout and rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Nodes in ascending id order.
	pub nodes: Vec<ResourceNode>,
	/// Deduplicated edges between known nodes.
	pub edges: Vec<ResourceEdge>,
	/// Focus resource of the canonical payload; selected on mount.
	pub workload: Option<String>,
}

impl GraphData {
	/// Node with `id`, if present.
	pub fn node(&self, id: &str) -> Option<&ResourceNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Reads `null` as the empty collection, the way Go encodes a nil slice or map.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One `{DependencyResource, DependentResource}` record.
#[derive(Clone, Debug, Deserialize)]
pub struct RelationRecord {
	/// Owner side.
	#[serde(rename = "DependencyResource")]
	pub dependency: String,
	/// Owned side.
	#[serde(rename = "DependentResource")]
	pub dependent: String,
}

/// Canonical resource-graph payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResourceGraphPayload {
	/// Metadata keyed by resource id.
	#[serde(default, deserialize_with = "null_as_default")]
	pub resources: BTreeMap<String, ResourceMeta>,
	/// Dependency records.
	#[serde(default, deserialize_with = "null_as_default")]
	pub relations: Vec<RelationRecord>,
	/// Id of the resource the view is about.
	#[serde(default)]
	pub workload: Option<String>,
}

/// Direction of an overview relationship, seen from the entry's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
	/// The related resource is owned by this entry.
	Child,
	/// The related resource owns this entry.
	Parent,
}

impl RelationKind {
	/// Wire spelling.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Child => "child",
			Self::Parent => "parent",
		}
	}
}

/// One entry of the overview payload shape. Fields other than the relation
/// lists land in `meta`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OverviewEntry {
	/// Related id to direction.
	#[serde(default, deserialize_with = "null_as_default")]
	pub relationship: BTreeMap<String, RelationKind>,
	/// Extra ids owned by this entry.
	#[serde(default, deserialize_with = "null_as_default")]
	pub children: Vec<String>,
	/// Extra ids owning this entry.
	#[serde(default, rename = "Parents", deserialize_with = "null_as_default")]
	pub parents: Vec<String>,
	/// The remaining fields.
	#[serde(flatten)]
	pub meta: ResourceMeta,
}

/// Overview payload: entries keyed by resource id.
pub type OverviewPayload = BTreeMap<String, OverviewEntry>;

/// Payload handed to the host when a node is clicked.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeClickPayload {
	/// Clicked resource id.
	pub id: String,
	/// Its display name.
	pub label: String,
	/// Its metadata, flattened into the same object.
	#[serde(flatten)]
	pub metadata: ResourceMeta,
}

impl From<&ResourceNode> for NodeClickPayload {
	fn from(node: &ResourceNode) -> Self {
		Self {
			id: node.id.clone(),
			label: node.label.clone(),
			metadata: node.data.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kind_comes_from_the_second_segment() {
		let node = ResourceNode {
			id: "apps/v1:Deployment:default:nginx".into(),
			label: "nginx".into(),
			data: ResourceMeta::default(),
		};
		assert_eq!(node.kind(), Some("Deployment"));

		let overview = ResourceNode {
			id: "apps/v1:ReplicaSet".into(),
			..node.clone()
		};
		assert_eq!(overview.kind(), Some("ReplicaSet"));

		let bare = ResourceNode {
			id: "nginx".into(),
			..node
		};
		assert_eq!(bare.kind(), None);
	}

	#[test]
	fn meta_keeps_unknown_fields_and_tolerates_unknown_statuses() {
		let meta: ResourceMeta = serde_json::from_str(
			r#"{"resourceType":"Kubernetes","cloudResourceID":"x","health":"Weird","owner":"team-a"}"#,
		)
		.unwrap();
		assert_eq!(meta.resource_type.as_deref(), Some("Kubernetes"));
		assert_eq!(meta.cloud_resource_id.as_deref(), Some("x"));
		assert_eq!(meta.health, Some(HealthStatus::Unknown));
		assert_eq!(meta.extra["owner"], "team-a");
	}

	#[test]
	fn null_collections_read_as_empty() {
		let payload: ResourceGraphPayload =
			serde_json::from_str(r#"{"resources": null, "relations": null}"#).unwrap();
		assert!(payload.resources.is_empty());
		assert!(payload.relations.is_empty());

		let entry: OverviewEntry = serde_json::from_str(
			r#"{"relationship": null, "children": null, "Parents": null, "count": 3}"#,
		)
		.unwrap();
		assert!(entry.relationship.is_empty());
		assert!(entry.children.is_empty());
		assert!(entry.parents.is_empty());
		assert_eq!(entry.meta.count, Some(3));
	}

	#[test]
	fn click_payload_flattens_metadata() {
		let node = ResourceNode {
			id: "v1:Pod:default:web-0".into(),
			label: "web-0".into(),
			data: ResourceMeta {
				status: Some("Running".into()),
				..Default::default()
			},
		};
		let json = serde_json::to_value(NodeClickPayload::from(&node)).unwrap();
		assert_eq!(json["id"], "v1:Pod:default:web-0");
		assert_eq!(json["label"], "web-0");
		assert_eq!(json["status"], "Running");
	}
}
