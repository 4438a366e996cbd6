//! Point, Size, Rect - geometry value types
//!
//! Small `Copy` types used for image dimensions, pixel positions and
//! regions of interest. Rectangles are expressed as an offset plus a size;
//! `right()` and `bottom()` are exclusive.

mod point;
mod rect;
mod size;

pub use point::Point;
pub use rect::Rect;
pub use size::Size;
