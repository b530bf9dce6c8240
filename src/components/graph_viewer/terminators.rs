//! Shapes drawn at the ends of edge lines.

use super::canvas::DrawingContext;
use super::geometry::{Point, transform_control_points};
use super::types::TerminatorKind;

/// Base size of a terminator before the line width is added.
pub const TERMINATOR_BASE_SIZE: f64 = 16.0;

/// A line-end shape. Local coordinates put the tip at the origin with the line
/// arriving from `-x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineTerminator {
	/// Triangle. `width` is the half-width; `inset` pulls the back notch toward the tip.
	Arrow { width: f64, length: f64, inset: f64 },
	/// Rhombus of the given full width and length.
	Diamond { width: f64, length: f64 },
	None,
}

impl LineTerminator {
	/// Terminator used for an edge end of the given kind and stroke width.
	pub fn for_kind(kind: TerminatorKind, line_width: f64) -> Self {
		let size = TERMINATOR_BASE_SIZE + line_width;
		match kind {
			TerminatorKind::Arrow => LineTerminator::Arrow {
				width: size / 2.0,
				length: TERMINATOR_BASE_SIZE,
				inset: 0.0,
			},
			TerminatorKind::Diamond => LineTerminator::Diamond {
				width: size,
				length: size,
			},
			TerminatorKind::None => LineTerminator::None,
		}
	}

	/// Arrowhead of the given half-width and a length twice that.
	pub fn arrow(width: f64) -> Self {
		LineTerminator::Arrow {
			width,
			length: width * 2.0,
			inset: 0.0,
		}
	}

	fn outline(&self) -> Vec<(f64, f64)> {
		match *self {
			LineTerminator::Arrow {
				width,
				length,
				inset,
			} => vec![
				(0.0, 0.0),
				(-length, width),
				(-(1.0 - inset) * length, 0.0),
				(-length, -width),
				(0.0, 0.0),
			],
			LineTerminator::Diamond { width, length } => vec![
				(0.0, 0.0),
				(-length / 2.0, width / 2.0),
				(-length, 0.0),
				(-length / 2.0, -width / 2.0),
				(0.0, 0.0),
			],
			LineTerminator::None => Vec::new(),
		}
	}

	/// Fill the terminator and return the attach point.
	pub fn draw(&self, ctx: &mut dyn DrawingContext, start: Point, end: Point, fill: &str) -> Point {
		let points = transform_control_points(start, end, &self.outline());
		let Some((first, rest)) = points.split_first() else {
			return end;
		};

		ctx.begin_path();
		ctx.set_fill_style(fill);
		ctx.move_to(first.x, first.y);
		for p in rest {
			ctx.line_to(p.x, p.y);
		}
		ctx.fill();

		points.get(2).copied().unwrap_or(end)
	}
}

#[cfg(test)]
mod tests {
	use super::super::test_support::{DrawCommand, RecordingContext};
	use super::*;

	fn draw(terminator: LineTerminator, start: Point, end: Point) -> (Point, Vec<DrawCommand>) {
		let ctx = RecordingContext::new();
		let attach = terminator.draw(&mut ctx.clone(), start, end, "#000");
		(attach, ctx.commands())
	}

	#[test]
	fn arrow_attaches_behind_the_tip() {
		let arrow = LineTerminator::for_kind(TerminatorKind::Arrow, 1.5);
		let (p, commands) = draw(arrow, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
		assert!((p.x - (100.0 - TERMINATOR_BASE_SIZE)).abs() < 1e-9);
		assert!(p.y.abs() < 1e-9);
		assert_eq!(commands.last(), Some(&DrawCommand::Fill));
	}

	#[test]
	fn diamond_attaches_at_its_far_corner() {
		let diamond = LineTerminator::Diamond {
			width: 10.0,
			length: 20.0,
		};
		let (p, _) = draw(diamond, Point::new(0.0, 50.0), Point::new(0.0, 0.0));
		assert!(p.x.abs() < 1e-9);
		assert!((p.y - 20.0).abs() < 1e-9);
	}

	#[test]
	fn no_terminator_draws_nothing_and_attaches_at_the_end() {
		let end = Point::new(3.0, 4.0);
		let (p, commands) = draw(LineTerminator::None, Point::default(), end);
		assert_eq!(p, end);
		assert!(commands.is_empty());
	}
}
