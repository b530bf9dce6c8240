//! Headless drawing surface for tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use super::canvas::{DrawingContext, TextMeasure, TextMetrics};

/// Width of every character, in pixels.
pub const CHAR_WIDTH: f64 = 8.0;
pub const ASCENT: f64 = 12.0;
pub const DESCENT: f64 = 4.0;

/// A recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	Save,
	Restore,
	Translate(f64, f64),
	Scale(f64),
	FillStyle(String),
	StrokeStyle(String),
	LineWidth(f64),
	LineDash(Vec<f64>),
	Font(String),
	GlobalAlpha(f64),
	BeginPath,
	ClosePath,
	MoveTo(f64, f64),
	LineTo(f64, f64),
	QuadraticCurveTo(f64, f64, f64, f64),
	Rect(f64, f64, f64, f64),
	Arc(f64, f64, f64),
	Fill,
	Stroke,
	ClearRect(f64, f64, f64, f64),
	FillRect(f64, f64, f64, f64),
	FillText(String, f64, f64),
	StrokeText(String, f64, f64),
	DrawImage(String),
}

/// Records commands into a shared log. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingContext {
	log: Rc<RefCell<Vec<DrawCommand>>>,
	/// URLs whose picture is still loading; `draw_image` fails for them.
	loading: Rc<RefCell<HashSet<String>>>,
	loaded: Rc<Cell<bool>>,
}

impl RecordingContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn commands(&self) -> Vec<DrawCommand> {
		self.log.borrow().clone()
	}

	/// Make `url` unavailable until [`RecordingContext::finish_loading`].
	pub fn start_loading(&self, url: &str) {
		self.loading.borrow_mut().insert(url.to_string());
	}

	/// The picture at `url` arrived.
	pub fn finish_loading(&self, url: &str) {
		if self.loading.borrow_mut().remove(url) {
			self.loaded.set(true);
		}
	}

	pub fn clear(&self) {
		self.log.borrow_mut().clear();
	}

	/// Texts passed to `fill_text`, in order.
	pub fn filled_texts(&self) -> Vec<String> {
		self.log
			.borrow()
			.iter()
			.filter_map(|c| match c {
				DrawCommand::FillText(text, _, _) => Some(text.clone()),
				_ => None,
			})
			.collect()
	}

	fn push(&mut self, command: DrawCommand) {
		self.log.borrow_mut().push(command);
	}
}

impl TextMeasure for RecordingContext {
	fn measure_text(&self, _font: &str, text: &str) -> TextMetrics {
		TextMetrics {
			width: text.chars().count() as f64 * CHAR_WIDTH,
			ascent: ASCENT,
			descent: DESCENT,
		}
	}
}

impl DrawingContext for RecordingContext {
	fn save(&mut self) {
		self.push(DrawCommand::Save);
	}
	fn restore(&mut self) {
		self.push(DrawCommand::Restore);
	}
	fn translate(&mut self, x: f64, y: f64) {
		self.push(DrawCommand::Translate(x, y));
	}
	fn scale(&mut self, k: f64) {
		self.push(DrawCommand::Scale(k));
	}
	fn set_fill_style(&mut self, css: &str) {
		self.push(DrawCommand::FillStyle(css.to_string()));
	}
	fn set_stroke_style(&mut self, css: &str) {
		self.push(DrawCommand::StrokeStyle(css.to_string()));
	}
	fn set_line_width(&mut self, width: f64) {
		self.push(DrawCommand::LineWidth(width));
	}
	fn set_line_dash(&mut self, segments: &[f64]) {
		self.push(DrawCommand::LineDash(segments.to_vec()));
	}
	fn set_font(&mut self, font: &str) {
		self.push(DrawCommand::Font(font.to_string()));
	}
	fn set_global_alpha(&mut self, alpha: f64) {
		self.push(DrawCommand::GlobalAlpha(alpha));
	}
	fn begin_path(&mut self) {
		self.push(DrawCommand::BeginPath);
	}
	fn close_path(&mut self) {
		self.push(DrawCommand::ClosePath);
	}
	fn move_to(&mut self, x: f64, y: f64) {
		self.push(DrawCommand::MoveTo(x, y));
	}
	fn line_to(&mut self, x: f64, y: f64) {
		self.push(DrawCommand::LineTo(x, y));
	}
	fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
		self.push(DrawCommand::QuadraticCurveTo(cx, cy, x, y));
	}
	fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.push(DrawCommand::Rect(x, y, width, height));
	}
	fn arc(&mut self, x: f64, y: f64, radius: f64, _start: f64, _end: f64) {
		self.push(DrawCommand::Arc(x, y, radius));
	}
	fn fill(&mut self) {
		self.push(DrawCommand::Fill);
	}
	fn stroke(&mut self) {
		self.push(DrawCommand::Stroke);
	}
	fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.push(DrawCommand::ClearRect(x, y, width, height));
	}
	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.push(DrawCommand::FillRect(x, y, width, height));
	}
	fn fill_text(&mut self, text: &str, x: f64, y: f64) {
		self.push(DrawCommand::FillText(text.to_string(), x, y));
	}
	fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
		self.push(DrawCommand::StrokeText(text.to_string(), x, y));
	}
	fn draw_image(&mut self, url: &str, _x: f64, _y: f64, _width: f64, _height: f64) -> bool {
		if self.loading.borrow().contains(url) {
			return false;
		}
		self.push(DrawCommand::DrawImage(url.to_string()));
		true
	}
	fn take_pending_redraw(&mut self) -> bool {
		self.loaded.replace(false)
	}
}
