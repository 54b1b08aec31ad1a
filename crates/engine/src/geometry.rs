use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("invalid geometry: width and height must be positive, got {width}x{height}")]
    InvalidGeometry { width: i32, height: i32 },
    #[error("rect at ({x}, {y}) of size {width}x{height} has edges outside the i32 range")]
    OutOfRange {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// Axis-aligned rectangle in integer world units.
///
/// `right` and `bottom` are exclusive edges: a rect at `x = 0` with
/// `width = 30` covers columns `0..30`. Both exclusive edges always fit in
/// an `i32`; repositioning saturates to keep them there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self, GeometryError> {
        if width <= 0 || height <= 0 {
            return Err(GeometryError::InvalidGeometry { width, height });
        }
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(GeometryError::OutOfRange {
                x,
                y,
                width,
                height,
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x + self.width.div_euclid(2),
            self.y + self.height.div_euclid(2),
        )
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        self.with_position(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    pub fn with_position(self, x: i32, y: i32) -> Self {
        Self {
            x: x.min(i32::MAX - self.width),
            y: y.min(i32::MAX - self.height),
            ..self
        }
    }

    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }
}

/// Separating-axis test. Rects that only share an edge do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.right() <= b.left()
        || b.right() <= a.left()
        || a.bottom() <= b.top()
        || b.bottom() <= a.top())
}

/// Translates `rect` so it lies inside `bounds`. An axis on which `rect` is
/// larger than `bounds` is centered instead of pinned to an edge.
pub fn clamp_move(rect: Rect, bounds: Rect) -> Rect {
    let x = clamp_axis(rect.x, rect.width, bounds.x, bounds.width);
    let y = clamp_axis(rect.y, rect.height, bounds.y, bounds.height);
    rect.with_position(x, y)
}

fn clamp_axis(start: i32, len: i32, bounds_start: i32, bounds_len: i32) -> i32 {
    if len > bounds_len {
        return bounds_start.saturating_add((bounds_len - len).div_euclid(2));
    }
    if start < bounds_start {
        bounds_start
    } else if start + len > bounds_start + bounds_len {
        bounds_start + bounds_len - len
    } else {
        start
    }
}

/// Sequential edge clamp: left, then right, then top, then bottom. When
/// `rect` is larger than `bounds` the far edge wins.
pub fn clamp_to_edges(rect: Rect, bounds: Rect) -> Rect {
    let mut clamped = rect;
    if clamped.left() < bounds.left() {
        clamped.x = bounds.left();
    }
    if clamped.right() > bounds.right() {
        clamped.x = bounds.right().saturating_sub(clamped.width);
    }
    if clamped.top() < bounds.top() {
        clamped.y = bounds.top();
    }
    if clamped.bottom() > bounds.bottom() {
        clamped.y = bounds.bottom().saturating_sub(clamped.height);
    }
    clamped
}
