//! Visual theming for the knowledge map canvas.
//!
//! Provides colors, palettes and the entity legend (entity type -> color/icon)
//! consulted when styling nodes.

use std::collections::HashMap;

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same hue at a different opacity.
	pub fn faded(self, alpha: f64) -> Self {
		Self {
			a: alpha.clamp(0.0, 1.0),
			..self
		}
	}

	/// Blend toward white; `0.0` keeps the color, `1.0` is white.
	pub fn tinted(self, amount: f64) -> Self {
		let amount = amount.clamp(0.0, 1.0);
		let tint = |c: u8| (c as f64 + (255.0 - c as f64) * amount).round() as u8;
		Self {
			r: tint(self.r),
			g: tint(self.g),
			b: tint(self.b),
			a: self.a,
		}
	}

	/// Parses `#RRGGBB`, `#RGB` and `rgb()`/`rgba()` notation.
	pub fn parse(color_str: &str) -> Option<Color> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
			return match hex.len() {
				6 => Some(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
				3 => {
					let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
					Some(Color::rgb(short(0)?, short(1)?, short(2)?))
				}
				_ => None,
			};
		}
		if s.starts_with("rgb") {
			let nums: Vec<&str> = s
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let r = nums.first()?.parse().ok()?;
			let g = nums.get(1)?.parse().ok()?;
			let b = nums.get(2)?.parse().ok()?;
			let a = nums.get(3).and_then(|s| s.parse().ok()).unwrap_or(1.0);
			return Some(Color::rgba(r, g, b, a));
		}
		None
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

impl<'de> Deserialize<'de> for Color {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Color::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'")))
	}
}

const FALLBACK_PALETTE_COLOR: Color = Color::rgb(128, 128, 128);

/// A curated color palette, cycled by index.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Saturated colors that stay readable behind a 10% alpha fill.
	pub fn groups() -> Self {
		Self {
			colors: vec![
				Color::rgb(116, 12, 170), // Violet
				Color::rgb(12, 170, 112), // Jade
				Color::rgb(230, 81, 0),   // Burnt orange
				Color::rgb(25, 118, 210), // Cobalt
				Color::rgb(198, 40, 40),  // Crimson
				Color::rgb(0, 131, 143),  // Deep teal
			],
		}
	}

	/// Color for the `index`th item. An empty palette yields neutral gray.
	pub fn get(&self, index: usize) -> Color {
		self.colors
			.get(index % self.colors.len().max(1))
			.copied()
			.unwrap_or(FALLBACK_PALETTE_COLOR)
	}
}

/// Presentation metadata for one entity type.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityStyle {
	pub color: Color,
	/// Font icon glyph drawn instead of a box, if the type has one.
	pub icon_code: Option<String>,
}

/// Read-only table mapping entity-type labels to presentation metadata.
///
/// Owned by whoever loads annotation styles; the viewer only reads it. Lookups of
/// unknown labels fall back to [`Legend::fallback`].
#[derive(Clone, Debug)]
pub struct Legend {
	entries: HashMap<String, EntityStyle>,
	fallback: EntityStyle,
}

impl Legend {
	pub fn new(entries: HashMap<String, EntityStyle>, fallback: EntityStyle) -> Self {
		Self { entries, fallback }
	}

	/// Style for a label, case-insensitive.
	pub fn get(&self, label: &str) -> Option<&EntityStyle> {
		self.entries.get(&label.to_ascii_lowercase())
	}

	/// Style for a label, or the fallback for unknown labels.
	pub fn resolve(&self, label: &str) -> &EntityStyle {
		self.get(label).unwrap_or(&self.fallback)
	}

	pub fn fallback(&self) -> &EntityStyle {
		&self.fallback
	}
}

impl Default for Legend {
	fn default() -> Self {
		default_legend()
	}
}

/// Default entity colors used by the knowledge map annotation styles.
pub fn default_legend() -> Legend {
	let entries = [
		("gene", "#673ab7", None),
		("protein", "#bcbd22", None),
		("disease", "#ff9800", None),
		("chemical", "#4caf50", None),
		("compound", "#4caf50", None),
		("mutation", "#5d4037", None),
		("species", "#0277bd", None),
		("pathway", "#e65100", None),
		("phenotype", "#edc949", None),
		("company", "#ff7f7f", None),
		("entity", "#7f7f7f", None),
		("study", "#303f9f", None),
		("link", "#669999", Some("\u{f0c1}")),
		("note", "#edc949", Some("\u{f249}")),
		("map", "#0277bd", Some("\u{f279}")),
	]
	.into_iter()
	.map(|(label, hex, icon)| {
		let color = Color::parse(hex).unwrap_or(Color::rgb(128, 128, 128));
		(
			label.to_string(),
			EntityStyle {
				color,
				icon_code: icon.map(str::to_string),
			},
		)
	})
	.collect();

	Legend::new(
		entries,
		EntityStyle {
			color: Color::rgb(0, 0, 0),
			icon_code: None,
		},
	)
}

/// Canvas colors.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	/// Canvas fill. `None` clears to transparent.
	pub background: Option<Color>,
	/// Node and default edge border color.
	pub border: Color,
	pub node_fill: Color,
	pub node_fill_selected: Color,
	pub node_fill_highlighted: Color,
	/// Backdrop behind the hovered node and the touch indicator.
	pub backdrop: Color,
	/// Placeholder fill for text that is not drawn at low detail.
	pub low_detail_fill: Color,
	pub edge_label: Color,
	pub edge_label_halo: Color,
	pub creation_line: Color,
	pub creation_node_fill: Color,
	pub group_palette: NodePalette,
	/// Font family for labels.
	pub font_family: &'static str,
	/// Font family for icon glyphs.
	pub icon_font_family: &'static str,
}

impl Theme {
	/// Light editor theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: None,
			border: Color::rgb(43, 124, 233),
			node_fill: Color::rgb(255, 255, 255),
			node_fill_selected: Color::rgb(239, 239, 239),
			node_fill_highlighted: Color::rgb(228, 239, 255),
			backdrop: Color::rgba(0, 0, 0, 0.075),
			low_detail_fill: Color::rgb(204, 204, 204),
			edge_label: Color::rgb(136, 136, 136),
			edge_label_halo: Color::rgb(255, 255, 255),
			creation_line: Color::rgb(43, 124, 233),
			creation_node_fill: Color::rgb(151, 194, 252),
			group_palette: NodePalette::groups(),
			font_family: "Roboto",
			icon_font_family: "FontAwesome",
		}
	}

	/// Dark presentation theme
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: Some(Color::rgb(22, 27, 34)),
			border: Color::rgb(100, 148, 220),
			node_fill: Color::rgb(36, 42, 52),
			node_fill_selected: Color::rgb(48, 56, 68),
			node_fill_highlighted: Color::rgb(40, 62, 96),
			backdrop: Color::rgba(255, 255, 255, 0.08),
			low_detail_fill: Color::rgb(90, 98, 110),
			edge_label: Color::rgb(170, 178, 190),
			edge_label_halo: Color::rgb(22, 27, 34),
			creation_line: Color::rgb(100, 148, 220),
			creation_node_fill: Color::rgb(60, 90, 140),
			group_palette: NodePalette::groups(),
			font_family: "Roboto",
			icon_font_family: "FontAwesome",
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_and_functional_colors() {
		assert_eq!(Color::parse("#2B7CE9"), Some(Color::rgb(43, 124, 233)));
		assert_eq!(Color::parse("#fff"), Some(Color::rgb(255, 255, 255)));
		assert_eq!(
			Color::parse("rgba(0, 0, 0, 0.5)"),
			Some(Color::rgba(0, 0, 0, 0.5))
		);
		assert_eq!(Color::parse("tomato"), None);
	}

	#[test]
	fn palette_cycles_and_tolerates_being_empty() {
		let palette = NodePalette::groups();
		assert_eq!(palette.get(0), palette.get(palette.colors.len()));
		let empty = NodePalette { colors: Vec::new() };
		assert_eq!(empty.get(0), Color::rgb(128, 128, 128));
		assert_eq!(empty.get(7), Color::rgb(128, 128, 128));
	}

	#[test]
	fn tint_and_fade_keep_the_other_channels() {
		let border = Color::rgb(43, 124, 233);
		assert_eq!(border.tinted(0.0), border);
		assert_eq!(border.tinted(1.0), Color::rgb(255, 255, 255));
		assert_eq!(border.tinted(0.5), Color::rgb(149, 190, 244));
		assert_eq!(border.faded(0.5).to_css(), "rgba(43, 124, 233, 0.5)");
		assert_eq!(border.faded(3.0), border);
	}

	#[test]
	fn css_output_drops_alpha_when_opaque() {
		assert_eq!(Color::rgb(43, 124, 233).to_css(), "#2b7ce9");
		assert_eq!(
			Color::rgba(0, 0, 0, 0.075).to_css(),
			"rgba(0, 0, 0, 0.075)"
		);
	}

	#[test]
	fn legend_falls_back_for_unknown_labels() {
		let legend = default_legend();
		assert_eq!(legend.resolve("Gene").color, Color::rgb(103, 58, 183));
		assert_eq!(legend.resolve("no-such-type"), legend.fallback());
		assert!(legend.resolve("note").icon_code.is_some());
	}
}
