use std::collections::BTreeMap;

use super::types::{RelationRecord, ResourceGraphPayload, ResourceMeta};

/// Canonical payload from `(id, meta)` resources and `(dependency, dependent)` pairs.
pub fn resource_payload<'a>(
	resources: impl IntoIterator<Item = (&'a str, ResourceMeta)>,
	relations: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> ResourceGraphPayload {
	let resources: BTreeMap<String, ResourceMeta> = resources
		.into_iter()
		.map(|(id, meta)| (id.to_string(), meta))
		.collect();
	ResourceGraphPayload {
		resources,
		relations: relations
			.into_iter()
			.map(|(dependency, dependent)| RelationRecord {
				dependency: dependency.to_string(),
				dependent: dependent.to_string(),
			})
			.collect(),
		workload: None,
	}
}
