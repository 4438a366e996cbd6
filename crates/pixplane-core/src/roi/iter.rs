use super::{required_len, roi_start};
use crate::geom::{Point, Rect, Size};
use std::iter::FusedIterator;

/// Per-sample iterator over the ROI of one channel plane
///
/// # Examples
///
/// ```
/// use pixplane_core::{Rect, RoiIter};
///
/// // 4x3 plane, 2x2 ROI at (1, 1)
/// let plane: Vec<u8> = (0..12).collect();
/// let visited: Vec<u8> = RoiIter::new(&plane, 4, Rect::new(1, 1, 2, 2)).copied().collect();
/// assert_eq!(visited, vec![5, 6, 9, 10]);
/// ```
#[derive(Debug, Clone)]
pub struct RoiIter<'a, T> {
    data: &'a [T],
    image_width: usize,
    roi: Rect,
    offset: usize,
    col: u32,
    row: u32,
    remaining: usize,
}

impl<'a, T> RoiIter<'a, T> {
    /// Create an iterator over `roi` of a plane that is `image_width` wide.
    ///
    /// # Panics
    ///
    /// Panics if `roi` is wider than the plane or `data` is too short to
    /// hold it.
    pub fn new(data: &'a [T], image_width: u32, roi: Rect) -> Self {
        let image_width = image_width as usize;
        assert!(
            roi.is_empty() || roi.right() <= image_width as u64,
            "ROI {roi} exceeds plane width {image_width}"
        );
        assert!(
            data.len() >= required_len(image_width, &roi),
            "ROI {roi} exceeds plane of {} samples",
            data.len()
        );
        Self {
            data,
            image_width,
            roi,
            offset: roi_start(image_width, &roi),
            col: 0,
            row: 0,
            remaining: roi.area(),
        }
    }

    /// The rectangle being traversed.
    #[inline]
    pub fn roi(&self) -> Rect {
        self.roi
    }

    /// Samples skipped between the end of one ROI row and the next.
    #[inline]
    pub fn line_step(&self) -> usize {
        self.image_width - self.roi.width as usize
    }

    /// Image coordinates of the next sample to be yielded.
    ///
    /// After exhaustion this is the first column one row below the ROI.
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(
            (self.roi.x + self.col) as i32,
            (self.roi.y + self.row) as i32,
        )
    }

    /// Attach image coordinates to every yielded sample.
    pub fn with_positions(self) -> Positioned<'a, T> {
        Positioned { inner: self }
    }

    /// Iterator over a `size` window of the same plane centered on `center`.
    ///
    /// The window's top-left corner is `center - size / 2` (integer
    /// division), so odd sizes are symmetric around `center`. This is the
    /// building block for "mask around the current pixel" loops.
    ///
    /// The window is expected to lie within this iterator's ROI; that is
    /// checked in debug builds only. Callers validate the mask size once up
    /// front (see [`checked_window`](Self::checked_window) for a per-call
    /// check).
    ///
    /// # Panics
    ///
    /// Panics if the window leaves the underlying plane.
    pub fn window(&self, center: Point, size: Size) -> RoiIter<'a, T> {
        let x = center.x as i64 - (size.width / 2) as i64;
        let y = center.y as i64 - (size.height / 2) as i64;
        assert!(x >= 0 && y >= 0, "window at {center} leaves the plane");
        let window = Rect::new(x as u32, y as u32, size.width, size.height);
        debug_assert!(
            self.roi.contains_rect(&window),
            "window {window} exceeds parent ROI {}",
            self.roi
        );
        RoiIter::new(self.data, self.image_width as u32, window)
    }

    /// Like [`window`](Self::window), but returns `None` instead of relying
    /// on the caller when the window does not fit in this iterator's ROI.
    pub fn checked_window(&self, center: Point, size: Size) -> Option<RoiIter<'a, T>> {
        let x = i64::from(center.x) - i64::from(size.width / 2);
        let y = i64::from(center.y) - i64::from(size.height / 2);
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        let window = Rect::new(x, y, size.width, size.height);
        if !self.roi.contains_rect(&window) {
            return None;
        }
        Some(RoiIter::new(self.data, self.image_width as u32, window))
    }
}

impl<'a, T> Iterator for RoiIter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let item = &self.data[self.offset];
        self.remaining -= 1;
        self.col += 1;
        if self.col == self.roi.width {
            self.col = 0;
            self.row += 1;
            self.offset += 1 + self.line_step();
        } else {
            self.offset += 1;
        }
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RoiIter<'_, T> {}
impl<T> FusedIterator for RoiIter<'_, T> {}

/// [`RoiIter`] adaptor yielding `(position, sample)` pairs
#[derive(Debug, Clone)]
pub struct Positioned<'a, T> {
    inner: RoiIter<'a, T>,
}

impl<'a, T> Positioned<'a, T> {
    /// The wrapped iterator, e.g. to build windows from it.
    pub fn inner(&self) -> &RoiIter<'a, T> {
        &self.inner
    }
}

impl<'a, T> Iterator for Positioned<'a, T> {
    type Item = (Point, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.inner.position();
        self.inner.next().map(|v| (pos, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Positioned<'_, T> {}

/// Mutable per-sample iterator over the ROI of one channel plane
#[derive(Debug)]
pub struct RoiIterMut<'a, T> {
    rest: &'a mut [T],
    line_step: usize,
    roi: Rect,
    col: u32,
    row: u32,
    remaining: usize,
}

impl<'a, T> RoiIterMut<'a, T> {
    /// Create an iterator over `roi` of a plane that is `image_width` wide.
    ///
    /// # Panics
    ///
    /// Panics if `roi` is wider than the plane or `data` is too short to
    /// hold it.
    pub fn new(data: &'a mut [T], image_width: u32, roi: Rect) -> Self {
        let image_width = image_width as usize;
        assert!(
            roi.is_empty() || roi.right() <= image_width as u64,
            "ROI {roi} exceeds plane width {image_width}"
        );
        assert!(
            data.len() >= required_len(image_width, &roi),
            "ROI {roi} exceeds plane of {} samples",
            data.len()
        );
        let rest: &'a mut [T] = if roi.is_empty() {
            Default::default()
        } else {
            &mut data[roi_start(image_width, &roi)..]
        };
        Self {
            rest,
            line_step: image_width - roi.width as usize,
            roi,
            col: 0,
            row: 0,
            remaining: roi.area(),
        }
    }

    /// The rectangle being traversed.
    #[inline]
    pub fn roi(&self) -> Rect {
        self.roi
    }

    /// Samples skipped between the end of one ROI row and the next.
    #[inline]
    pub fn line_step(&self) -> usize {
        self.line_step
    }

    /// Image coordinates of the next sample to be yielded.
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(
            (self.roi.x + self.col) as i32,
            (self.roi.y + self.row) as i32,
        )
    }
}

impl<'a, T> Iterator for RoiIterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        let rest = std::mem::take(&mut self.rest);
        let (item, tail) = rest.split_first_mut()?;
        self.remaining -= 1;
        self.col += 1;
        if self.col == self.roi.width {
            self.col = 0;
            self.row += 1;
            self.rest = if self.remaining > 0 {
                &mut tail[self.line_step..]
            } else {
                tail
            };
        } else {
            self.rest = tail;
        }
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RoiIterMut<'_, T> {}
impl<T> FusedIterator for RoiIterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(w: u32, h: u32) -> Vec<u32> {
        (0..w * h).collect()
    }

    #[test]
    fn test_full_roi_row_major() {
        let data = plane(3, 2);
        let got: Vec<u32> = RoiIter::new(&data, 3, Rect::new(0, 0, 3, 2))
            .copied()
            .collect();
        assert_eq!(got, data);
    }

    #[test]
    fn test_sub_roi_line_step() {
        let data = plane(5, 4);
        let it = RoiIter::new(&data, 5, Rect::new(1, 1, 3, 2));
        assert_eq!(it.line_step(), 2);
        assert_eq!(it.len(), 6);
        let got: Vec<u32> = it.copied().collect();
        assert_eq!(got, vec![6, 7, 8, 11, 12, 13]);
    }

    #[test]
    fn test_positions() {
        let data = plane(4, 4);
        let got: Vec<Point> = RoiIter::new(&data, 4, Rect::new(2, 1, 2, 2))
            .with_positions()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(
            got,
            vec![
                Point::new(2, 1),
                Point::new(3, 1),
                Point::new(2, 2),
                Point::new(3, 2)
            ]
        );
    }

    #[test]
    fn test_empty_roi() {
        let data = plane(4, 4);
        assert_eq!(RoiIter::new(&data, 4, Rect::new(4, 4, 0, 0)).count(), 0);
        let mut data = data;
        assert_eq!(RoiIterMut::new(&mut data, 4, Rect::new(0, 0, 0, 3)).count(), 0);
    }

    #[test]
    fn test_window_centered() {
        let data = plane(5, 5);
        let parent = RoiIter::new(&data, 5, Rect::new(0, 0, 5, 5));
        let win: Vec<u32> = parent.window(Point::new(2, 2), Size::new(3, 3)).copied().collect();
        assert_eq!(win, vec![6, 7, 8, 11, 12, 13, 16, 17, 18]);
    }

    #[test]
    fn test_checked_window() {
        let data = plane(5, 5);
        let parent = RoiIter::new(&data, 5, Rect::new(1, 1, 3, 3));
        assert!(parent.checked_window(Point::new(2, 2), Size::new(3, 3)).is_some());
        assert!(parent.checked_window(Point::new(1, 1), Size::new(3, 3)).is_none());
        assert!(parent.checked_window(Point::new(0, 0), Size::new(3, 3)).is_none());
    }

    #[test]
    fn test_iter_mut_writes_roi_only() {
        let mut data = vec![0u8; 16];
        for v in RoiIterMut::new(&mut data, 4, Rect::new(1, 2, 2, 2)) {
            *v = 1;
        }
        let expected = [
            0, 0, 0, 0, //
            0, 0, 0, 0, //
            0, 1, 1, 0, //
            0, 1, 1, 0,
        ];
        assert_eq!(data, expected);
    }

    #[test]
    #[should_panic(expected = "exceeds plane")]
    fn test_roi_outside_plane_panics() {
        let data = plane(3, 3);
        let _ = RoiIter::new(&data, 3, Rect::new(1, 1, 3, 1));
    }
}
