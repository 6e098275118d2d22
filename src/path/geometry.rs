#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Screen-space rectangle, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Connected polyline ordered by increasing x.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurvePath {
    points: Vec<Point>,
}

impl CurvePath {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn line_to(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point>> for CurvePath {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// Linear remap of `value` from `[src_lo, src_hi]` to `[dst_lo, dst_hi]`.
pub fn remap(value: f32, src_lo: f32, src_hi: f32, dst_lo: f32, dst_hi: f32) -> f32 {
    dst_lo + (value - src_lo) * (dst_hi - dst_lo) / (src_hi - src_lo)
}

/// Position of `freq` within `[low, high]` on a log10 axis, 0..1 inside the range.
pub fn map_from_log10(freq: f32, low: f32, high: f32) -> f32 {
    (freq / low).log10() / (high / low).log10()
}

/// Frequency at normalised position `t` on a log10 axis spanning `[low, high]`.
pub fn map_to_log10(t: f64, low: f64, high: f64) -> f64 {
    10f64.powf(low.log10() + t * (high.log10() - low.log10()))
}
