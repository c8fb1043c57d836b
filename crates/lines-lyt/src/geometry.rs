//! Screen rectangles and edge widths.

/// A screen rectangle in cell coordinates.
///
/// Containment is half-open: `(x, y)` is inside while
/// `x <= px < x + width` and `y <= py < y + height`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle without area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// First column right of the rectangle.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// First row below the rectangle.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Overlapping area of both rectangles, [`Rect::ZERO`] if they don't
    /// overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::ZERO;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::ZERO;
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Smallest rectangle covering both. Empty rectangles don't contribute.
    pub fn union(&self, other: &Rect) -> Rect {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Rect::ZERO,
            (true, false) => *other,
            (false, true) => *self,
            (false, false) => {
                let x = self.x.min(other.x);
                let y = self.y.min(other.y);
                let right = self.right().max(other.right());
                let bottom = self.bottom().max(other.bottom());
                Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
            }
        }
    }
}

/// Widths reserved on each side of a rectangle.
///
/// Used for the margins the layout distributes around fixed nodes and for
/// the gaps (borders, titles) a container keeps for its own decoration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Edges {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Edges {
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same width on every side.
    pub fn uniform(width: i32) -> Self {
        Self::new(width, width, width, width)
    }

    pub fn horizontal(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    pub fn vertical(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }

    pub fn is_zero(&self) -> bool {
        *self == Edges::default()
    }

    /// Shrinks `rect` by these edges; the result never has negative size.
    pub fn inset(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x.saturating_add(self.left),
            rect.y.saturating_add(self.top),
            rect.width.saturating_sub(self.horizontal()).max(0),
            rect.height.saturating_sub(self.vertical()).max(0),
        )
    }
}
