//! ROI iteration
//!
//! Sequential traversal of the pixels inside a region of interest of one
//! channel plane. Iterators visit every ROI pixel exactly once in row-major
//! order starting at the ROI's top-left corner; after the last column of a
//! row they skip `image_width - roi_width` samples (the *line step*) to the
//! first column of the next row. Algorithms such as running sums depend on
//! that order.
//!
//! Iterators are not resettable: to traverse again, build a new one from
//! the same view.
//!
//! - [`RoiIter`] / [`RoiIterMut`] - per-sample iteration
//! - [`RoiRows`] / [`RoiRowsMut`] - per-line iteration, the fast path for
//!   kernels that work on whole rows
//! - [`ChannelView`] / [`ChannelViewMut`] - a channel plane bound to its
//!   image width and ROI, the usual way to obtain the iterators above

mod iter;
mod rows;
mod view;

pub use iter::{Positioned, RoiIter, RoiIterMut};
pub use rows::{RoiRows, RoiRowsMut};
pub use view::{ChannelView, ChannelViewMut};

use crate::geom::Rect;

/// Index of the first ROI sample in a plane of the given width.
#[inline]
pub(crate) fn roi_start(image_width: usize, roi: &Rect) -> usize {
    roi.y as usize * image_width + roi.x as usize
}

/// Number of samples a plane must hold for `roi` to be addressable.
#[inline]
pub(crate) fn required_len(image_width: usize, roi: &Rect) -> usize {
    if roi.is_empty() {
        0
    } else {
        (roi.y as usize + roi.height as usize - 1) * image_width
            + roi.x as usize
            + roi.width as usize
    }
}
