use super::{RoiIter, RoiIterMut, RoiRows, RoiRowsMut};
use crate::channel::{ChannelMut, ChannelRef};
use crate::geom::{Rect, Size};

/// Read view of one channel plane together with its image width and ROI
pub struct ChannelView<'a, T> {
    data: ChannelRef<'a, T>,
    size: Size,
    roi: Rect,
}

impl<'a, T> ChannelView<'a, T> {
    pub(crate) fn new(data: ChannelRef<'a, T>, size: Size, roi: Rect) -> Self {
        Self { data, size, roi }
    }

    /// Full plane size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// ROI the iterators traverse.
    pub fn roi(&self) -> Rect {
        self.roi
    }

    /// All samples of the plane, ignoring the ROI.
    pub fn samples(&self) -> &[T] {
        &self.data
    }

    /// Per-sample iterator over the ROI.
    pub fn iter(&self) -> RoiIter<'_, T> {
        RoiIter::new(&self.data, self.size.width, self.roi)
    }

    /// Per-sample iterator over another rectangle of the same plane.
    ///
    /// # Panics
    ///
    /// Panics if `roi` does not fit in the plane.
    pub fn iter_rect(&self, roi: Rect) -> RoiIter<'_, T> {
        RoiIter::new(&self.data, self.size.width, roi)
    }

    /// Line iterator over the ROI.
    pub fn rows(&self) -> RoiRows<'_, T> {
        RoiRows::new(&self.data, self.size.width, self.roi)
    }
}

/// Write view of one channel plane together with its image width and ROI
pub struct ChannelViewMut<'a, T> {
    data: ChannelMut<'a, T>,
    size: Size,
    roi: Rect,
}

impl<'a, T> ChannelViewMut<'a, T> {
    pub(crate) fn new(data: ChannelMut<'a, T>, size: Size, roi: Rect) -> Self {
        Self { data, size, roi }
    }

    /// Full plane size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// ROI the iterators traverse.
    pub fn roi(&self) -> Rect {
        self.roi
    }

    /// All samples of the plane, ignoring the ROI.
    pub fn samples_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Per-sample iterator over the ROI.
    pub fn iter(&self) -> RoiIter<'_, T> {
        RoiIter::new(&self.data, self.size.width, self.roi)
    }

    /// Mutable per-sample iterator over the ROI.
    pub fn iter_mut(&mut self) -> RoiIterMut<'_, T> {
        RoiIterMut::new(&mut self.data, self.size.width, self.roi)
    }

    /// Mutable line iterator over the ROI.
    pub fn rows_mut(&mut self) -> RoiRowsMut<'_, T> {
        RoiRowsMut::new(&mut self.data, self.size.width, self.roi)
    }
}
