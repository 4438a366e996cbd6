use super::{required_len, roi_start};
use crate::geom::Rect;
use std::iter::FusedIterator;

/// Iterator over the ROI lines of one channel plane
#[derive(Debug, Clone)]
pub struct RoiRows<'a, T> {
    data: &'a [T],
    image_width: usize,
    roi: Rect,
    row: u32,
}

impl<'a, T> RoiRows<'a, T> {
    /// Create a line iterator over `roi` of a plane that is `image_width` wide.
    ///
    /// # Panics
    ///
    /// Panics if `roi` is wider than the plane or `data` is too short.
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
            row: if roi.is_empty() { roi.height } else { 0 },
        }
    }
}

impl<'a, T> Iterator for RoiRows<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<&'a [T]> {
        if self.row >= self.roi.height {
            return None;
        }
        let start = roi_start(self.image_width, &self.roi) + self.row as usize * self.image_width;
        self.row += 1;
        Some(&self.data[start..start + self.roi.width as usize])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.roi.height - self.row) as usize;
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for RoiRows<'_, T> {}
impl<T> FusedIterator for RoiRows<'_, T> {}

/// Mutable iterator over the ROI lines of one channel plane
#[derive(Debug)]
pub struct RoiRowsMut<'a, T> {
    rest: &'a mut [T],
    line_step: usize,
    roi_width: usize,
    rows_left: u32,
}

impl<'a, T> RoiRowsMut<'a, T> {
    /// Create a line iterator over `roi` of a plane that is `image_width` wide.
    ///
    /// # Panics
    ///
    /// Panics if `roi` is wider than the plane or `data` is too short.
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
        let (rest, rows_left): (&'a mut [T], u32) = if roi.is_empty() {
            (Default::default(), 0)
        } else {
            (&mut data[roi_start(image_width, &roi)..], roi.height)
        };
        Self {
            rest,
            line_step: image_width - roi.width as usize,
            roi_width: roi.width as usize,
            rows_left,
        }
    }
}

impl<'a, T> Iterator for RoiRowsMut<'a, T> {
    type Item = &'a mut [T];

    fn next(&mut self) -> Option<&'a mut [T]> {
        if self.rows_left == 0 {
            return None;
        }
        let rest = std::mem::take(&mut self.rest);
        let (row, tail) = rest.split_at_mut(self.roi_width);
        self.rows_left -= 1;
        if self.rows_left > 0 {
            self.rest = &mut tail[self.line_step..];
        }
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows_left as usize, Some(self.rows_left as usize))
    }
}

impl<T> ExactSizeIterator for RoiRowsMut<'_, T> {}
impl<T> FusedIterator for RoiRowsMut<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        let data: Vec<u16> = (0..20).collect();
        let rows: Vec<&[u16]> = RoiRows::new(&data, 5, Rect::new(1, 1, 3, 2)).collect();
        assert_eq!(rows, vec![&[6, 7, 8][..], &[11, 12, 13][..]]);
    }

    #[test]
    fn test_rows_mut_last_row_flush_with_end() {
        // ROI ends exactly at the last sample of the plane
        let mut data = vec![0i32; 9];
        for (i, row) in RoiRowsMut::new(&mut data, 3, Rect::new(1, 1, 2, 2)).enumerate() {
            row.fill(i as i32 + 1);
        }
        assert_eq!(data, vec![0, 0, 0, 0, 1, 1, 0, 2, 2]);
    }
}
