use serde::{Deserialize, Serialize};

/// A rectangle in virtual-desktop pixel coordinates.
///
/// Stored as origin plus size. Win32 reports edges (`left`, `top`,
/// `right`, `bottom`); use [`Rect::from_edges`] to convert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its four edges.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns `true` if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns whether the two rectangles share at least one pixel row.
    ///
    /// Only the vertical axis is considered: a window anywhere to the
    /// left or right of `other` still counts if its rows intersect.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.y < other.bottom() && self.bottom() > other.y
    }

    /// Returns the number of overlapping pixels along the vertical axis.
    pub fn vertical_overlap(&self, other: &Rect) -> i32 {
        let top = self.y.max(other.y);
        let bottom = self.bottom().min(other.bottom());
        (bottom - top).max(0)
    }

    /// Moves the top edge down to at least `top`, keeping the bottom edge
    /// and the horizontal extent unchanged.
    ///
    /// The result may have zero or negative height when `top` lies below
    /// the bottom edge; callers decide whether that is acceptable.
    pub fn clip_top(&self, top: i32) -> Rect {
        let new_top = self.y.max(top);
        Rect::new(self.x, new_top, self.width, self.bottom() - new_top)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{} {}x{})", self.x, self.y, self.width, self.height)
    }
}
