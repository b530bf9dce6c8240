//! Geometry helpers in graph coordinates.

/// A 2D point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance_to(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}

	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}

/// Axis-aligned box described by its min and max corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl BoundingBox {
	pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
		Self {
			min_x,
			min_y,
			max_x,
			max_y,
		}
	}

	/// Box of the given size centered on a point.
	pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
		Self::new(
			cx - width / 2.0,
			cy - height / 2.0,
			cx + width / 2.0,
			cy + height / 2.0,
		)
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> Point {
		Point::new(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}

	/// Inclusive containment test.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
	}

	pub fn union(&self, other: &BoundingBox) -> BoundingBox {
		BoundingBox::new(
			self.min_x.min(other.min_x),
			self.min_y.min(other.min_y),
			self.max_x.max(other.max_x),
			self.max_y.max(other.max_y),
		)
	}

	/// Grow (or shrink, for negative values) the box on every side.
	pub fn padded(&self, padding: f64) -> BoundingBox {
		BoundingBox::new(
			self.min_x - padding,
			self.min_y - padding,
			self.max_x + padding,
			self.max_y + padding,
		)
	}

	/// Union of all boxes, or `None` for an empty iterator.
	pub fn enclosing(boxes: impl IntoIterator<Item = BoundingBox>) -> Option<BoundingBox> {
		boxes.into_iter().reduce(|acc, b| acc.union(&b))
	}
}

/// Find where a ray from `(x, y)` toward the center of the rectangle crosses the
/// rectangle's boundary.
///
/// Works for origins inside the rectangle too (the line through both points is
/// followed away from the center). An origin exactly at the center has no
/// direction and yields the center itself.
pub fn point_on_rect(x: f64, y: f64, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Point {
	let mid_x = (min_x + max_x) / 2.0;
	let mid_y = (min_y + max_y) / 2.0;

	if x == mid_x && y == mid_y {
		return Point::new(mid_x, mid_y);
	}

	// Slope of the line through the origin and the center.
	let m = (mid_y - y) / (mid_x - x);

	if x <= mid_x {
		let min_x_y = m * (min_x - x) + y;
		if min_y <= min_x_y && min_x_y <= max_y {
			return Point::new(min_x, min_x_y);
		}
	}

	if x >= mid_x {
		let max_x_y = m * (max_x - x) + y;
		if min_y <= max_x_y && max_x_y <= max_y {
			return Point::new(max_x, max_x_y);
		}
	}

	if y <= mid_y {
		let min_y_x = (min_y - y) / m + x;
		if min_x <= min_y_x && min_y_x <= max_x {
			return Point::new(min_y_x, min_y);
		}
	}

	if y >= mid_y {
		let max_y_x = (max_y - y) / m + x;
		if min_x <= max_y_x && max_y_x <= max_x {
			return Point::new(max_y_x, max_y);
		}
	}

	Point::new(mid_x, mid_y)
}

/// Shortest distance from a point to the segment `(x1, y1)-(x2, y2)`.
pub fn point_segment_distance(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	if len_sq == 0.0 {
		return (px - x1).hypot(py - y1);
	}
	let t = (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0);
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	(px - cx).hypot(py - cy)
}

/// Rotate and move local control points so that local `+x` follows the direction
/// from start to end and the local origin lands on the end point.
pub fn transform_control_points(start: Point, end: Point, points: &[(f64, f64)]) -> Vec<Point> {
	let (dx, dy) = (end.x - start.x, end.y - start.y);
	let len = dx.hypot(dy);
	let (sin, cos) = if len > 0.0 {
		(dy / len, dx / len)
	} else {
		(0.0, 1.0)
	};

	points
		.iter()
		.map(|&(px, py)| Point::new(px * cos - py * sin + end.x, px * sin + py * cos + end.y))
		.collect()
}
