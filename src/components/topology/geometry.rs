/// A position in graph or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Axis-aligned box, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Width.
	pub width: f64,
	/// Height.
	pub height: f64,
}

impl Rect {
	/// Box at `(x, y)` with the given size.
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	/// Right edge.
	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	/// Bottom edge.
	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	/// Centre point.
	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	/// True when `p` lies inside or on the border.
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
	}

	/// Smallest box holding both.
	pub fn union(&self, other: &Rect) -> Rect {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		Rect::new(
			x,
			y,
			self.right().max(other.right()) - x,
			self.bottom().max(other.bottom()) - y,
		)
	}
}

/// Pan/zoom of the canvas: screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Graph point to screen point.
	pub fn to_screen(&self, p: Point) -> Point {
		Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Screen point to graph point.
	pub fn to_graph(&self, p: Point) -> Point {
		Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
	}

	/// Transform that centres `bounds` in a `width` x `height` viewport,
	/// never zooming in past 1:1.
	pub fn fit(bounds: &Rect, width: f64, height: f64, padding: f64) -> Self {
		if bounds.width <= 0.0 || bounds.height <= 0.0 {
			return Self::default();
		}
		let k = ((width - 2.0 * padding) / bounds.width)
			.min((height - 2.0 * padding) / bounds.height)
			.clamp(0.1, 1.0);
		let c = bounds.center();
		Self {
			x: width / 2.0 - c.x * k,
			y: height / 2.0 - c.y * k,
			k,
		}
	}

	/// Zooms by `factor` keeping the screen point `at` fixed.
	pub fn zoom_at(&mut self, at: Point, factor: f64) {
		let k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = k / self.k;
		self.x = at.x - (at.x - self.x) * ratio;
		self.y = at.y - (at.y - self.y) * ratio;
		self.k = k;
	}
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
	points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Point at `t` (0..=1) of the way along a polyline, by arc length.
pub fn point_along(points: &[Point], t: f64) -> Option<Point> {
	let first = *points.first()?;
	let total = polyline_length(points);
	if total <= 0.0 {
		return Some(first);
	}
	let mut remaining = t.clamp(0.0, 1.0) * total;
	for w in points.windows(2) {
		let len = w[0].distance(w[1]);
		if remaining <= len && len > 0.0 {
			let f = remaining / len;
			return Some(Point::new(
				w[0].x + (w[1].x - w[0].x) * f,
				w[0].y + (w[1].y - w[0].y) * f,
			));
		}
		remaining -= len;
	}
	points.last().copied()
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	if len2 < 1e-12 {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Shortest distance from `p` to any segment. Infinite for fewer than two points.
pub fn distance_to_polyline(p: Point, points: &[Point]) -> f64 {
	points
		.windows(2)
		.map(|w| distance_to_segment(p, w[0], w[1]))
		.fold(f64::INFINITY, f64::min)
}
