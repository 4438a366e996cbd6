//! Depth conversion and ROI copies

use super::Image;
use crate::channel::ChannelBlock;
use crate::channel::try_alloc;
use crate::depth::{Sample, clipped_cast};
use crate::error::{Error, Result};
use crate::roi::{RoiIter, RoiIterMut};

impl<T: Sample> Image<T> {
    /// Convert every sample to another depth, saturating at its bounds.
    ///
    /// Float to integer conversion rounds to nearest. Size, format and ROI
    /// are kept; the result owns all of its channels.
    pub fn convert_to<U: Sample>(&self) -> Result<Image<U>> {
        let mut channels = Vec::with_capacity(self.channels.len());
        for block in &self.channels {
            let src = block.samples();
            let mut data = try_alloc::<U>(src.len())?;
            for (d, &s) in data.iter_mut().zip(src.iter()) {
                *d = clipped_cast(s);
            }
            channels.push(ChannelBlock::from_vec(data.into_vec()));
        }
        Ok(Image {
            size: self.size,
            format: self.format,
            roi: self.roi,
            channels,
        })
    }

    /// Copy this image's ROI into the ROI of `dst`, converting samples.
    ///
    /// Both ROIs must have the same size and both images the same channel
    /// count. Aliased destination channels are detached first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the ROI sizes differ and
    /// [`Error::InvalidParameter`] if the channel counts differ.
    pub fn copy_roi_to<U: Sample>(&self, dst: &mut Image<U>) -> Result<()> {
        if self.roi.size() != dst.roi.size() {
            return Err(Error::SizeMismatch {
                expected: self.roi.size(),
                actual: dst.roi.size(),
            });
        }
        if self.channels.len() != dst.channels.len() {
            return Err(Error::InvalidParameter(format!(
                "channel count mismatch: {} vs {}",
                self.channels.len(),
                dst.channels.len()
            )));
        }
        let (dst_width, dst_roi) = (dst.size.width, dst.roi);
        for channel in 0..self.channels.len() {
            dst.detach_channel(channel)?;
            let src = self.channel_data(channel)?;
            let out = dst.channel_data_mut(channel)?;
            let src_iter = RoiIter::new(&src, self.size.width, self.roi);
            for (d, &s) in RoiIterMut::new(out, dst_width, dst_roi).zip(src_iter) {
                *d = clipped_cast(s);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Format, Image, Rect, Size};

    #[test]
    fn test_convert_saturates() {
        let img = Image::from_planes(
            Size::new(4, 1),
            Format::Gray,
            vec![vec![-10.0f32, 12.6, 255.4, 1e6]],
        )
        .unwrap();
        let out: Image<u8> = img.convert_to().unwrap();
        assert_eq!(&out.channel_data(0).unwrap()[..], &[0, 13, 255, 255]);
        assert_eq!(out.format(), Format::Gray);
    }

    #[test]
    fn test_copy_roi_to() {
        let mut src = Image::<u8>::new(Size::new(4, 4), 1, Format::Gray).unwrap();
        src.fill(200).unwrap();
        src.set_roi(Rect::new(1, 1, 2, 2)).unwrap();

        let mut dst = Image::<i16>::new(Size::new(3, 3), 1, Format::Gray).unwrap();
        dst.set_roi(Rect::new(0, 1, 2, 2)).unwrap();
        src.copy_roi_to(&mut dst).unwrap();

        assert_eq!(dst.pixel(0, 0, 0), Some(0));
        assert_eq!(dst.pixel(0, 1, 0), Some(200));
        assert_eq!(dst.pixel(1, 2, 0), Some(200));
        assert_eq!(dst.pixel(2, 2, 0), Some(0));
    }

    #[test]
    fn test_copy_roi_to_mismatch() {
        let src = Image::<u8>::new(Size::new(4, 4), 1, Format::Gray).unwrap();
        let mut dst = Image::<u8>::new(Size::new(3, 3), 1, Format::Gray).unwrap();
        assert!(src.copy_roi_to(&mut dst).is_err());

        let mut rgb = Image::<u8>::new(Size::new(4, 4), 3, Format::Rgb).unwrap();
        assert!(src.copy_roi_to(&mut rgb).is_err());
    }
}
