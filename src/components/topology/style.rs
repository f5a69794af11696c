//! State styles, status badges and the icon table.

use std::collections::HashMap;

use super::types::{HealthStatus, SyncStatus};

/// Interaction states an item can carry at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemState {
	/// Under the pointer.
	pub hovered: bool,
	/// The selected node.
	pub selected: bool,
}

/// Stroke/fill attributes of a drawn shape. `None` leaves the base value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeStyle {
	/// Outline colour.
	pub stroke: Option<String>,
	/// Fill colour.
	pub fill: Option<String>,
	/// Outline width.
	pub line_width: Option<f64>,
	/// Glow radius.
	pub shadow_blur: Option<f64>,
	/// Glow colour.
	pub shadow_color: Option<String>,
}

impl ShapeStyle {
	/// Overlays the fields set in `other`.
	pub fn merged(mut self, other: &ShapeStyle) -> Self {
		let pick = |mine: &mut Option<String>, theirs: &Option<String>| {
			if theirs.is_some() {
				mine.clone_from(theirs);
			}
		};
		pick(&mut self.stroke, &other.stroke);
		pick(&mut self.fill, &other.fill);
		pick(&mut self.shadow_color, &other.shadow_color);
		self.line_width = other.line_width.or(self.line_width);
		self.shadow_blur = other.shadow_blur.or(self.shadow_blur);
		self
	}
}

/// Per-state overrides applied on top of a base style. Selected wins over
/// hovered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateStyles {
	/// Idle style.
	pub base: ShapeStyle,
	/// Applied while hovered.
	pub hover: ShapeStyle,
	/// Applied while selected, after hover.
	pub selected: ShapeStyle,
}

impl StateStyles {
	/// Base style with the overrides for `state` applied.
	pub fn resolve(&self, state: ItemState) -> ShapeStyle {
		let mut style = self.base.clone();
		if state.hovered {
			style = style.merged(&self.hover);
		}
		if state.selected {
			style = style.merged(&self.selected);
		}
		style
	}

	/// Node styles over the given idle fill and stroke.
	pub fn nodes(fill: &str, stroke: &str) -> Self {
		Self {
			base: ShapeStyle {
				stroke: Some(stroke.into()),
				fill: Some(fill.into()),
				line_width: Some(1.0),
				..Default::default()
			},
			hover: ShapeStyle {
				stroke: Some("#5b8ff9".into()),
				line_width: Some(1.5),
				shadow_blur: Some(8.0),
				shadow_color: Some("rgba(91, 143, 249, 0.35)".into()),
				..Default::default()
			},
			selected: ShapeStyle {
				stroke: Some("#2f54eb".into()),
				fill: Some("#f0f5ff".into()),
				line_width: Some(2.0),
				shadow_blur: Some(12.0),
				shadow_color: Some("rgba(47, 84, 235, 0.4)".into()),
			},
		}
	}

	/// Edge styles. Edges are never selected, so only hover overrides the base.
	pub fn edges(color: &str) -> Self {
		Self {
			base: ShapeStyle {
				stroke: Some(color.into()),
				fill: Some(color.into()),
				line_width: Some(1.2),
				..Default::default()
			},
			hover: ShapeStyle {
				stroke: Some("#5b8ff9".into()),
				fill: Some("#5b8ff9".into()),
				line_width: Some(2.0),
				..Default::default()
			},
			selected: ShapeStyle::default(),
		}
	}
}

/// A small status marker drawn at the node's right edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Badge {
	pub asset: &'static str,
	/// Fill used while the image is loading.
	pub color: &'static str,
	pub spins: bool,
}

pub fn health_badge(status: HealthStatus) -> Badge {
	let (asset, color) = match status {
		HealthStatus::Healthy => ("/assets/status/healthy.svg", "#52c41a"),
		HealthStatus::Progressing => ("/assets/status/progressing.svg", "#1890ff"),
		HealthStatus::Degraded => ("/assets/status/degraded.svg", "#f5222d"),
		HealthStatus::Suspended => ("/assets/status/suspended.svg", "#722ed1"),
		HealthStatus::Missing => ("/assets/status/missing.svg", "#faad14"),
		HealthStatus::Unknown => ("/assets/status/unknown.svg", "#bfbfbf"),
	};
	Badge {
		asset,
		color,
		spins: status == HealthStatus::Progressing,
	}
}

pub fn sync_badge(status: SyncStatus) -> Badge {
	let (asset, color) = match status {
		SyncStatus::Synced => ("/assets/status/synced.svg", "#52c41a"),
		SyncStatus::OutOfSync => ("/assets/status/out-of-sync.svg", "#fa8c16"),
		SyncStatus::Unknown => ("/assets/status/unknown.svg", "#bfbfbf"),
	};
	Badge {
		asset,
		color,
		spins: false,
	}
}

/// Rotation of a spinning badge at `time` seconds.
pub fn spin_angle(time: f64, period: f64) -> f64 {
	if period <= 0.0 {
		return 0.0;
	}
	(time.rem_euclid(period) / period) * std::f64::consts::TAU
}

/// Accent bar colour by resource plane.
pub fn plane_color(plane: Option<&str>) -> &'static str {
	match plane.map(str::to_ascii_lowercase).as_deref() {
		Some("kubernetes") => "#326ce5",
		Some("aws") => "#ff9900",
		Some("alicloud") | Some("aliyun") => "#ff6a00",
		Some("azure") => "#0078d4",
		Some("google") | Some("gcp") => "#34a853",
		Some("terraform") => "#7b42bc",
		_ => "#8c8c8c",
	}
}

pub const FALLBACK_ICON: &str = "/assets/icons/resource.svg";

/// Kind/provider name to icon asset, matched case-insensitively.
#[derive(Clone, Debug)]
pub struct IconTable {
	icons: HashMap<String, String>,
	fallback: String,
}

impl Default for IconTable {
	fn default() -> Self {
		let mut table = Self::empty(FALLBACK_ICON);
		for kind in [
			"Deployment",
			"StatefulSet",
			"DaemonSet",
			"ReplicaSet",
			"Pod",
			"Service",
			"Ingress",
			"ConfigMap",
			"Secret",
			"Namespace",
			"Job",
			"CronJob",
			"PersistentVolumeClaim",
			"ServiceAccount",
		] {
			table.insert(kind, format!("/assets/icons/k8s/{}.svg", kind.to_ascii_lowercase()));
		}
		for provider in ["Kubernetes", "Terraform", "aws", "alicloud", "azure", "google"] {
			table.insert(
				provider,
				format!("/assets/icons/provider/{}.svg", provider.to_ascii_lowercase()),
			);
		}
		table
	}
}

impl IconTable {
	/// A table with no entries.
	pub fn empty(fallback: impl Into<String>) -> Self {
		Self {
			icons: HashMap::new(),
			fallback: fallback.into(),
		}
	}

	/// Adds or replaces the icon for `key`.
	pub fn insert(&mut self, key: &str, asset: impl Into<String>) {
		self.icons.insert(key.to_ascii_lowercase(), asset.into());
	}

	/// First hit among `keys`, else the fallback icon.
	pub fn lookup<'a>(&self, keys: impl IntoIterator<Item = Option<&'a str>>) -> &str {
		keys.into_iter()
			.flatten()
			.find_map(|k| self.icons.get(&k.to_ascii_lowercase()))
			.unwrap_or(&self.fallback)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn selected_overrides_hover() {
		let styles = StateStyles::nodes("#fff", "#ccc");
		let idle = styles.resolve(ItemState::default());
		assert_eq!(idle.stroke.as_deref(), Some("#ccc"));
		assert_eq!(idle.shadow_blur, None);

		let hovered = styles.resolve(ItemState {
			hovered: true,
			selected: false,
		});
		assert_eq!(hovered.stroke.as_deref(), Some("#5b8ff9"));
		assert_eq!(hovered.fill.as_deref(), Some("#fff"));

		let both = styles.resolve(ItemState {
			hovered: true,
			selected: true,
		});
		assert_eq!(both.stroke.as_deref(), Some("#2f54eb"));
		assert_eq!(both.fill.as_deref(), Some("#f0f5ff"));
		assert_eq!(both.line_width, Some(2.0));
	}

	#[test]
	fn edges_only_react_to_hover() {
		let styles = StateStyles::edges("#a3adba");
		let idle = styles.resolve(ItemState::default());
		let selected = styles.resolve(ItemState {
			hovered: false,
			selected: true,
		});
		assert_eq!(selected, idle);
		let hovered = styles.resolve(ItemState {
			hovered: true,
			selected: false,
		});
		assert_eq!(hovered.stroke.as_deref(), Some("#5b8ff9"));
	}

	#[test]
	fn only_progressing_spins() {
		assert!(health_badge(HealthStatus::Progressing).spins);
		for status in [
			HealthStatus::Healthy,
			HealthStatus::Degraded,
			HealthStatus::Suspended,
			HealthStatus::Missing,
			HealthStatus::Unknown,
		] {
			assert!(!health_badge(status).spins, "{status:?}");
		}
		assert!(!sync_badge(SyncStatus::OutOfSync).spins);
	}

	#[test]
	fn spin_wraps_each_period() {
		assert_eq!(spin_angle(0.0, 1.2), 0.0);
		assert!((spin_angle(0.6, 1.2) - std::f64::consts::PI).abs() < 1e-9);
		assert!((spin_angle(1.8, 1.2) - std::f64::consts::PI).abs() < 1e-9);
		assert_eq!(spin_angle(3.0, 0.0), 0.0);
	}

	#[test]
	fn icons_fall_back_in_order() {
		let table = IconTable::default();
		assert_eq!(
			table.lookup([Some("Deployment"), Some("Kubernetes")]),
			"/assets/icons/k8s/deployment.svg"
		);
		assert_eq!(
			table.lookup([Some("MadeUpKind"), Some("kubernetes")]),
			"/assets/icons/provider/kubernetes.svg"
		);
		assert_eq!(table.lookup([None, Some("nope")]), FALLBACK_ICON);
	}

	#[test]
	fn unknown_planes_are_grey() {
		assert_eq!(plane_color(Some("Kubernetes")), "#326ce5");
		assert_eq!(plane_color(None), "#8c8c8c");
	}
}
