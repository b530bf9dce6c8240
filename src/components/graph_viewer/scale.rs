//! Zoom-dependent scaling configuration for canvas visuals.
//!
//! Centralizes every value that changes with the zoom level `k`: screen-constant
//! stroke widths, indicator sizes, and the detail thresholds below which text is
//! replaced with cheaper placeholders.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: graph coordinates. Values scale with zoom.
//! - **Screen-space**: canvas pixels. Values stay constant regardless of zoom.
//!
//! Drawing happens after the canvas transform is applied, so every value in
//! [`ScaledValues`] is expressed in world units.

use serde::Deserialize;

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Complete scale configuration for canvas elements.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
	/// Below this zoom, node text is replaced by placeholders.
	pub low_detail_k: f64,
	/// Below this zoom, edge labels are hidden.
	pub edge_label_min_k: f64,
	/// Node border width in screen pixels.
	pub node_border_width: f64,
	/// Node border width when highlighted, in screen pixels.
	pub node_border_width_highlighted: f64,
	pub border_behavior: ScaleBehavior,
	/// Radius of the press indicator drawn on empty canvas.
	pub touch_radius: f64,
	/// Padding around a node for the hover/touch backdrop, world units.
	pub backdrop_padding: f64,
	/// Padding around a layout group's members, world units.
	pub group_padding: f64,
	/// Edge-creation preview line width in screen pixels.
	pub creation_line_width: f64,
	/// Edge-creation preview end circle radius in screen pixels.
	pub creation_node_radius: f64,
	/// Edge-creation preview arrowhead half-width in world units.
	pub creation_arrow_size: f64,
	/// Edge length of a resize handle in screen pixels.
	pub handle_size: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			low_detail_k: 0.35,
			edge_label_min_k: 0.35,
			node_border_width: 1.5,
			node_border_width_highlighted: 2.0,
			border_behavior: ScaleBehavior::Screen,
			touch_radius: 20.0,
			backdrop_padding: 10.0,
			group_padding: 10.0,
			creation_line_width: 1.0,
			creation_node_radius: 6.0,
			creation_arrow_size: 16.0,
			handle_size: 8.0,
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Whether node text is drawn at this zoom.
	pub high_detail: bool,
	/// Whether edge labels are drawn at this zoom.
	pub edge_labels: bool,
	pub node_border_width: f64,
	pub node_border_width_highlighted: f64,
	pub touch_radius: f64,
	pub backdrop_padding: f64,
	pub group_padding: f64,
	pub creation_line_width: f64,
	pub creation_node_radius: f64,
	pub creation_arrow_size: f64,
	pub handle_size: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let border = |base: f64| config.border_behavior.apply(base, k);
		Self {
			k,
			high_detail: k >= config.low_detail_k,
			edge_labels: k >= config.edge_label_min_k,
			node_border_width: border(config.node_border_width),
			node_border_width_highlighted: border(config.node_border_width_highlighted),
			touch_radius: config.touch_radius / k,
			backdrop_padding: config.backdrop_padding,
			group_padding: config.group_padding,
			creation_line_width: config.creation_line_width / k,
			creation_node_radius: config.creation_node_radius / k,
			creation_arrow_size: config.creation_arrow_size,
			handle_size: config.handle_size / k,
		}
	}

	/// Whether an entity is drawn in full detail. Selection and highlight always
	/// force full detail.
	pub fn detailed(&self, selected: bool, highlighted: bool) -> bool {
		self.high_detail || selected || highlighted
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_values_shrink_in_world_space_when_zoomed_in() {
		let scaled = ScaledValues::new(&ScaleConfig::default(), 2.0);
		assert_eq!(scaled.node_border_width, 0.75);
		assert_eq!(scaled.touch_radius, 10.0);
		assert_eq!(scaled.handle_size, 4.0);
		assert!(scaled.high_detail);
	}

	#[test]
	fn low_zoom_drops_detail_unless_forced() {
		let scaled = ScaledValues::new(&ScaleConfig::default(), 0.2);
		assert!(!scaled.high_detail);
		assert!(!scaled.edge_labels);
		assert!(!scaled.detailed(false, false));
		assert!(scaled.detailed(true, false));
		assert!(scaled.detailed(false, true));
	}

	#[test]
	fn clamped_behavior_respects_screen_bounds() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 2.0,
			max_screen: 8.0,
		};
		assert_eq!(behavior.apply(5.0, 1.0), 5.0);
		assert_eq!(behavior.apply(5.0, 0.1), 20.0);
		assert_eq!(behavior.apply(5.0, 4.0), 2.0);
	}
}
