//! 2D drawing surface port.
//!
//! The view never touches the DOM directly: placement measures text through
//! [`TextMeasure`] and rendering draws through [`DrawingContext`]. [`WebCanvas`]
//! implements both over a browser `CanvasRenderingContext2d`; tests use a
//! recording double.
//!
//! Pictures load asynchronously. A node whose image is still loading is drawn
//! as a placeholder, and the context reports through
//! [`DrawingContext::take_pending_redraw`] once a picture arrived so the next
//! frame can draw it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// Measured extent of a run of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
	pub width: f64,
	/// Distance from the baseline to the top of the glyphs.
	pub ascent: f64,
	/// Distance from the baseline to the bottom of the glyphs.
	pub descent: f64,
}

impl TextMetrics {
	pub fn height(&self) -> f64 {
		self.ascent + self.descent
	}
}

/// Font metrics provider.
pub trait TextMeasure {
	fn measure_text(&self, font: &str, text: &str) -> TextMetrics;
}

/// Immediate-mode 2D drawing commands, modeled on the HTML canvas API.
#[allow(missing_docs)]
pub trait DrawingContext: TextMeasure {
	fn save(&mut self);
	fn restore(&mut self);
	fn translate(&mut self, x: f64, y: f64);
	fn scale(&mut self, k: f64);

	fn set_fill_style(&mut self, css: &str);
	fn set_stroke_style(&mut self, css: &str);
	fn set_line_width(&mut self, width: f64);
	fn set_line_dash(&mut self, segments: &[f64]);
	fn set_font(&mut self, font: &str);
	fn set_global_alpha(&mut self, alpha: f64);

	fn begin_path(&mut self);
	fn close_path(&mut self);
	fn move_to(&mut self, x: f64, y: f64);
	fn line_to(&mut self, x: f64, y: f64);
	fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
	fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
	fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
	fn fill(&mut self);
	fn stroke(&mut self);

	fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
	fn fill_text(&mut self, text: &str, x: f64, y: f64);
	fn stroke_text(&mut self, text: &str, x: f64, y: f64);

	/// Draw the picture at `url` into the box. Returns `false` while the picture
	/// is not available yet.
	fn draw_image(&mut self, url: &str, x: f64, y: f64, width: f64, height: f64) -> bool;

	/// Whether a picture finished loading since the last call. Clears the flag.
	fn take_pending_redraw(&mut self) -> bool {
		false
	}

	/// Add a rounded rectangle to the current path.
	fn rounded_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) {
		let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
		self.move_to(x + r, y);
		self.line_to(x + width - r, y);
		self.quadratic_curve_to(x + width, y, x + width, y + r);
		self.line_to(x + width, y + height - r);
		self.quadratic_curve_to(x + width, y + height, x + width - r, y + height);
		self.line_to(x + r, y + height);
		self.quadratic_curve_to(x, y + height, x, y + height - r);
		self.line_to(x, y + r);
		self.quadratic_curve_to(x, y, x + r, y);
		self.close_path();
	}

	/// Add a full circle to the current path.
	fn circle(&mut self, x: f64, y: f64, radius: f64) {
		self.arc(x, y, radius, 0.0, 2.0 * PI);
	}
}

/// An image element and the load listener that must live as long as it does.
struct CachedImage {
	element: HtmlImageElement,
	_onload: Closure<dyn FnMut()>,
}

/// Browser canvas backend with a per-URL image cache.
#[derive(Clone)]
pub struct WebCanvas {
	ctx: CanvasRenderingContext2d,
	images: Rc<RefCell<HashMap<String, CachedImage>>>,
	/// Set by image load listeners, cleared by `take_pending_redraw`.
	loaded: Rc<Cell<bool>>,
}

impl WebCanvas {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self {
			ctx,
			images: Rc::new(RefCell::new(HashMap::new())),
			loaded: Rc::new(Cell::new(false)),
		}
	}

	fn image(&self, url: &str) -> Option<HtmlImageElement> {
		let mut images = self.images.borrow_mut();
		if let Some(cached) = images.get(url) {
			return Some(cached.element.clone());
		}
		let element = HtmlImageElement::new().ok()?;
		let loaded = self.loaded.clone();
		let onload = Closure::<dyn FnMut()>::new(move || loaded.set(true));
		element.set_onload(Some(onload.as_ref().unchecked_ref()));
		element.set_src(url);
		images.insert(
			url.to_string(),
			CachedImage {
				element: element.clone(),
				_onload: onload,
			},
		);
		Some(element)
	}
}

impl TextMeasure for WebCanvas {
	fn measure_text(&self, font: &str, text: &str) -> TextMetrics {
		let previous = self.ctx.font();
		self.ctx.set_font(font);
		let metrics = self
			.ctx
			.measure_text(text)
			.map(|m| TextMetrics {
				width: m.width(),
				ascent: m.actual_bounding_box_ascent(),
				descent: m.actual_bounding_box_descent(),
			})
			.unwrap_or_default();
		self.ctx.set_font(&previous);
		metrics
	}
}

impl DrawingContext for WebCanvas {
	fn save(&mut self) {
		self.ctx.save();
	}

	fn restore(&mut self) {
		self.ctx.restore();
	}

	fn translate(&mut self, x: f64, y: f64) {
		let _ = self.ctx.translate(x, y);
	}

	fn scale(&mut self, k: f64) {
		let _ = self.ctx.scale(k, k);
	}

	fn set_fill_style(&mut self, css: &str) {
		self.ctx.set_fill_style_str(css);
	}

	fn set_stroke_style(&mut self, css: &str) {
		self.ctx.set_stroke_style_str(css);
	}

	fn set_line_width(&mut self, width: f64) {
		self.ctx.set_line_width(width);
	}

	fn set_line_dash(&mut self, segments: &[f64]) {
		let array: js_sys::Array = segments.iter().map(|v| JsValue::from_f64(*v)).collect();
		let _ = self.ctx.set_line_dash(&array);
	}

	fn set_font(&mut self, font: &str) {
		self.ctx.set_font(font);
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.ctx.set_global_alpha(alpha);
	}

	fn begin_path(&mut self) {
		self.ctx.begin_path();
	}

	fn close_path(&mut self) {
		self.ctx.close_path();
	}

	fn move_to(&mut self, x: f64, y: f64) {
		self.ctx.move_to(x, y);
	}

	fn line_to(&mut self, x: f64, y: f64) {
		self.ctx.line_to(x, y);
	}

	fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
		let _ = self.ctx.quadratic_curve_to(cx, cy, x, y);
	}

	fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.ctx.rect(x, y, width, height);
	}

	fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
		let _ = self.ctx.arc(x, y, radius, start, end);
	}

	fn fill(&mut self) {
		self.ctx.fill();
	}

	fn stroke(&mut self) {
		self.ctx.stroke();
	}

	fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.ctx.clear_rect(x, y, width, height);
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.ctx.fill_rect(x, y, width, height);
	}

	fn fill_text(&mut self, text: &str, x: f64, y: f64) {
		let _ = self.ctx.fill_text(text, x, y);
	}

	fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
		let _ = self.ctx.stroke_text(text, x, y);
	}

	fn draw_image(&mut self, url: &str, x: f64, y: f64, width: f64, height: f64) -> bool {
		let Some(img) = self.image(url) else {
			return false;
		};
		if !img.complete() || img.natural_width() == 0 {
			return false;
		}
		self.ctx
			.draw_image_with_html_image_element_and_dw_and_dh(&img, x, y, width, height)
			.is_ok()
	}

	fn take_pending_redraw(&mut self) -> bool {
		self.loaded.replace(false)
	}
}
