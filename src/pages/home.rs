use leptos::prelude::*;
use log::error;

use crate::components::topology::{GraphData, NodeClickPayload, TopologyCanvas, parse_payload};

/// A deployment with its rollout chain and the cloud resources it uses.
const WORKLOAD_GRAPH: &str = r#"{
	"resources": {
		"apps/v1:Deployment:monitoring:prometheus": {"resourceType": "Kubernetes", "resourcePlane": "Kubernetes", "status": "Available", "health": "Progressing", "sync": "Synced"},
		"apps/v1:ReplicaSet:monitoring:prometheus-57f46848c9": {"resourceType": "Kubernetes", "resourcePlane": "Kubernetes", "health": "Healthy"},
		"v1:Pod:monitoring:deployment-prometheus-prod-57f46848c9-699n8": {"resourceType": "Kubernetes", "resourcePlane": "Kubernetes", "status": "Running", "health": "Healthy"},
		"v1:Pod:monitoring:deployment-prometheus-prod-57f46848c9-x2k4q": {"resourceType": "Kubernetes", "resourcePlane": "Kubernetes", "status": "CrashLoopBackOff", "health": "Degraded"},
		"v1:Service:monitoring:prometheus": {"resourceType": "Kubernetes", "resourcePlane": "Kubernetes", "health": "Healthy", "sync": "OutOfSync"},
		"v1:ConfigMap:monitoring:prometheus-config": {"resourceType": "Kubernetes", "resourcePlane": "Kubernetes"},
		"aws:aws_s3_bucket:metrics-archive": {"resourceType": "Terraform", "resourcePlane": "aws", "cloudResourceID": "arn:aws:s3:::metrics-archive", "iamResourceID": "arn:aws:iam::123456789012:role/prometheus"}
	},
	"relations": [
		{"DependencyResource": "apps/v1:Deployment:monitoring:prometheus", "DependentResource": "apps/v1:ReplicaSet:monitoring:prometheus-57f46848c9"},
		{"DependencyResource": "apps/v1:ReplicaSet:monitoring:prometheus-57f46848c9", "DependentResource": "v1:Pod:monitoring:deployment-prometheus-prod-57f46848c9-699n8"},
		{"DependencyResource": "apps/v1:ReplicaSet:monitoring:prometheus-57f46848c9", "DependentResource": "v1:Pod:monitoring:deployment-prometheus-prod-57f46848c9-x2k4q"},
		{"DependencyResource": "v1:ConfigMap:monitoring:prometheus-config", "DependentResource": "apps/v1:Deployment:monitoring:prometheus"},
		{"DependencyResource": "aws:aws_s3_bucket:metrics-archive", "DependentResource": "apps/v1:Deployment:monitoring:prometheus"},
		{"DependencyResource": "v1:Service:monitoring:prometheus", "DependentResource": "v1:Pod:monitoring:deployment-prometheus-prod-57f46848c9-699n8"},
		{"DependencyResource": "v1:Service:monitoring:prometheus", "DependentResource": "v1:Pod:monitoring:deployment-prometheus-prod-57f46848c9-x2k4q"}
	],
	"workload": "apps/v1:Deployment:monitoring:prometheus"
}"#;

/// Kind-level overview of a namespace.
const OVERVIEW_GRAPH: &str = r#"{
	"apps/v1:Deployment": {"count": 3, "resourceGroup": {"kind": "Deployment"}, "relationship": {"apps/v1:ReplicaSet": "child"}},
	"apps/v1:ReplicaSet": {"count": 5, "resourceGroup": {"kind": "ReplicaSet"}, "children": ["v1:Pod"], "Parents": ["apps/v1:Deployment"]},
	"v1:Pod": {"count": 9, "resourceGroup": {"kind": "Pod"}, "relationship": {"apps/v1:ReplicaSet": "parent"}},
	"v1:Service": {"count": 2, "resourceGroup": {"kind": "Service"}, "children": ["v1:Pod"]}
}"#;

fn load(json: &str) -> GraphData {
	parse_payload(json).unwrap_or_else(|e| {
		error!("bad sample payload: {e}");
		GraphData::default()
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let overview = RwSignal::new(false);
	let graph_data = Signal::derive(move || {
		if overview.get() {
			load(OVERVIEW_GRAPH)
		} else {
			load(WORKLOAD_GRAPH)
		}
	});
	let selected = RwSignal::new(None::<NodeClickPayload>);
	let on_node_click = Callback::new(move |payload: NodeClickPayload| selected.set(Some(payload)));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<TopologyCanvas data=graph_data on_node_click=on_node_click fullscreen=true />
				<div class="graph-overlay">
					<h1>"Resource Topology"</h1>
					<p class="subtitle">"Hover for details. Click a resource to inspect it. Drag to pan, scroll to zoom."</p>
					<button on:click=move |_| {
						selected.set(None);
						overview.update(|o| *o = !*o);
					}>
						{move || if overview.get() { "Show workload" } else { "Show overview" }}
					</button>
					{move || {
						selected
							.get()
							.map(|payload| {
								let details = serde_json::to_string_pretty(&payload)
									.unwrap_or_else(|e| e.to_string());
								view! {
									<h2>{payload.label}</h2>
									<pre class="resource-details">{details}</pre>
								}
							})
					}}
				</div>
			</div>
		</ErrorBoundary>
	}
}
