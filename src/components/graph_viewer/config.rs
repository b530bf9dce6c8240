//! Viewer configuration.
//!
//! Every section has sensible defaults, so a partial JSON document (or none at
//! all) yields a usable configuration.

use serde::Deserialize;

use super::scale::ScaleConfig;

/// Pan/zoom and pointer gesture tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
	pub min_k: f64,
	pub max_k: f64,
	/// Zoom multiplier applied per wheel notch.
	pub wheel_factor: f64,
	/// Padding (graph units) used by zoom-to-fit.
	pub fit_padding: f64,
	/// Pointer travel (pixels) before a press becomes a drag.
	pub drag_threshold: f64,
	/// Idle time (ms) after the last wheel event before the zoom is considered over.
	pub zoom_end_delay_ms: f64,
	/// A resize this soon (ms) after a zoom-to-fit re-applies the fit.
	pub refit_window_ms: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_k: 0.1,
			max_k: 10.0,
			wheel_factor: 1.1,
			fit_padding: 50.0,
			drag_threshold: 3.0,
			zoom_end_delay_ms: 150.0,
			refit_window_ms: 500.0,
		}
	}
}

/// Automatic layout tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Relaxation steps run synchronously when the layout starts.
	pub initial_iterations: usize,
	/// Upper bound on animated ticks after the initial relaxation.
	pub max_ticks: usize,
	/// Simulated seconds per solver step.
	pub step: f32,
	/// The layout finishes once the largest per-tick node movement drops below this.
	pub settle_distance: f64,
	/// Fraction of the distance to the group centroid a member moves per tick.
	pub group_cohesion: f64,
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	pub node_mass: f32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			initial_iterations: 10,
			max_ticks: 300,
			step: 0.016,
			settle_distance: 0.05,
			group_cohesion: 0.02,
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			node_mass: 10.0,
		}
	}
}

/// Complete viewer configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
	pub scale: ScaleConfig,
	pub zoom: ZoomConfig,
	pub layout: LayoutConfig,
	/// Maximum number of undoable actions kept. Oldest entries are dropped first.
	pub history_limit: usize,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			scale: ScaleConfig::default(),
			zoom: ZoomConfig::default(),
			layout: LayoutConfig::default(),
			history_limit: 200,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config: ViewerConfig =
			serde_json::from_str(r#"{ "history_limit": 5, "zoom": { "max_k": 4.0 } }"#).unwrap();
		assert_eq!(config.history_limit, 5);
		assert_eq!(config.zoom.max_k, 4.0);
		assert_eq!(config.zoom.min_k, 0.1);
		assert_eq!(config.layout.initial_iterations, 10);
		assert_eq!(config.scale.low_detail_k, 0.35);
	}
}
