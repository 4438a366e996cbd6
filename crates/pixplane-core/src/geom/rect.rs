use super::{Point, Size};
use std::fmt;

/// A rectangle region, typically an image ROI
///
/// Offsets are unsigned because an ROI never leaves the image; use
/// [`Point`] for signed offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left x coordinate
    pub x: u32,
    /// Top y coordinate
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole image of the given size.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub fn offset(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }

    /// Width and height.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Center pixel (rounded toward the top-left for even sizes).
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            (self.x + self.width / 2) as i32,
            (self.y + self.height / 2) as i32,
        )
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(&self) -> usize {
        self.size().area()
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= 0
            && p.y >= 0
            && (p.x as u64) >= self.x as u64
            && (p.x as u64) < self.right()
            && (p.y as u64) >= self.y as u64
            && (p.y as u64) < self.bottom()
    }

    /// Check if this rectangle contains another one.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if this rectangle lies within an image of the given size.
    #[inline]
    pub fn fits_in(&self, size: Size) -> bool {
        Rect::from_size(size).contains_rect(self)
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if (x as u64) < right && (y as u64) < bottom {
            Some(Rect::new(
                x,
                y,
                (right - x as u64) as u32,
                (bottom - y as u64) as u32,
            ))
        } else {
            None
        }
    }

    /// Shrink by `dx` on the left and right and `dy` on top and bottom.
    ///
    /// Returns `None` if nothing would remain.
    pub fn shrink(&self, dx: u32, dy: u32) -> Option<Rect> {
        let w = self.width.checked_sub(dx.checked_mul(2)?)?;
        let h = self.height.checked_sub(dy.checked_mul(2)?)?;
        if w == 0 || h == 0 {
            return None;
        }
        Some(Rect::new(self.x + dx, self.y + dy, w, h))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})+{}x{}", self.x, self.y, self.width, self.height)
    }
}
