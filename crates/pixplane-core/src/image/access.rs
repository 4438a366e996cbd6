//! Pixel and channel access
//!
//! Three ways to reach samples, fastest first:
//!
//! 1. Raw channel slices ([`Image::channel_data`], [`Image::channel_data_mut`])
//! 2. ROI iterators from a channel view ([`Image::view`], [`Image::view_mut`])
//! 3. Random access ([`Image::pixel`], [`Image::set_pixel`])
//!
//! Random access recomputes `y * width + x` and bounds-checks on every call.
//! It exists for convenience and tests; loops over many pixels should use
//! one of the first two.

use super::Image;
use crate::channel::{ChannelMut, ChannelRef};
use crate::depth::Sample;
use crate::error::{Error, Result};
use crate::roi::{ChannelView, ChannelViewMut, RoiIterMut};
use std::ops::Range;

impl<T: Sample> Image<T> {
    /// Read access to all samples of one channel.
    pub fn channel_data(&self, channel: usize) -> Result<ChannelRef<'_, T>> {
        Ok(self.block(channel)?.samples())
    }

    /// Exclusive write access to all samples of one channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SharedChannel`] if another image aliases the channel.
    /// Call [`detach`](Self::detach) first.
    pub fn channel_data_mut(&mut self, channel: usize) -> Result<&mut [T]> {
        self.block_mut(channel)?
            .exclusive_mut()
            .ok_or(Error::SharedChannel { index: channel })
    }

    /// Write access that every image aliasing the channel observes.
    ///
    /// # Panics
    ///
    /// Panics if another guard on the same storage is alive.
    pub fn channel_data_aliased(&mut self, channel: usize) -> Result<ChannelMut<'_, T>> {
        Ok(self.block_mut(channel)?.aliased_mut())
    }

    /// Address range `[begin, end)` of one channel's samples.
    ///
    /// For code that hands planes to external routines. The pointers are
    /// valid until the channel is replaced, removed or detached.
    pub fn channel_ptr_range(&self, channel: usize) -> Result<Range<*const T>> {
        Ok(self.block(channel)?.samples().as_ptr_range())
    }

    /// Read view of one channel bound to this image's ROI.
    pub fn view(&self, channel: usize) -> Result<ChannelView<'_, T>> {
        let (size, roi) = (self.size, self.roi);
        Ok(ChannelView::new(self.channel_data(channel)?, size, roi))
    }

    /// Exclusive write view of one channel bound to this image's ROI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SharedChannel`] if another image aliases the channel.
    pub fn view_mut(&mut self, channel: usize) -> Result<ChannelViewMut<'_, T>> {
        let (size, roi) = (self.size, self.roi);
        let data = self.channel_data_mut(channel)?;
        Ok(ChannelViewMut::new(ChannelMut::Plain(data), size, roi))
    }

    /// Write view whose writes every image aliasing the channel observes.
    pub fn view_aliased(&mut self, channel: usize) -> Result<ChannelViewMut<'_, T>> {
        let (size, roi) = (self.size, self.roi);
        let data = self.channel_data_aliased(channel)?;
        Ok(ChannelViewMut::new(data, size, roi))
    }

    /// Read one sample, or `None` if the coordinates or channel are out of
    /// range.
    ///
    /// This is the slow path; see the module docs.
    pub fn pixel(&self, x: u32, y: u32, channel: usize) -> Option<T> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = y as usize * self.size.width as usize + x as usize;
        self.channels
            .get(channel)
            .map(|block| block.samples()[idx])
    }

    /// Write one sample.
    ///
    /// This is the slow path; see the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for coordinates outside the image,
    /// [`Error::ChannelIndex`] for a bad channel and
    /// [`Error::SharedChannel`] if the channel is aliased.
    pub fn set_pixel(&mut self, x: u32, y: u32, channel: usize, value: T) -> Result<()> {
        if x >= self.size.width || y >= self.size.height {
            return Err(Error::InvalidParameter(format!(
                "pixel ({x}, {y}) outside {} image",
                self.size
            )));
        }
        let idx = y as usize * self.size.width as usize + x as usize;
        self.channel_data_mut(channel)?[idx] = value;
        Ok(())
    }

    /// Set every ROI sample of every channel to `value`.
    ///
    /// Aliased channels are detached first.
    pub fn fill(&mut self, value: T) -> Result<()> {
        for channel in 0..self.channels.len() {
            self.fill_channel(channel, value)?;
        }
        Ok(())
    }

    /// Set every ROI sample of one channel to `value`.
    ///
    /// The channel is detached first if it is aliased.
    pub fn fill_channel(&mut self, channel: usize, value: T) -> Result<()> {
        self.detach_channel(channel)?;
        let (width, roi) = (self.size.width, self.roi);
        let data = self.channel_data_mut(channel)?;
        if roi.x == 0 && roi.width == width {
            let start = roi.y as usize * width as usize;
            data[start..start + roi.area()].fill(value);
        } else {
            RoiIterMut::new(data, width, roi).for_each(|v| *v = value);
        }
        Ok(())
    }

    /// Minimum and maximum sample of one channel within the ROI.
    ///
    /// Returns `None` for an empty ROI. NaN samples are skipped.
    pub fn channel_range(&self, channel: usize) -> Result<Option<(T, T)>> {
        let view = self.view(channel)?;
        let range = view.iter().fold(None, |acc: Option<(T, T)>, &v| {
            if v.partial_cmp(&v).is_none() {
                return acc;
            }
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (
                    if v < lo { v } else { lo },
                    if v > hi { v } else { hi },
                ),
            })
        });
        Ok(range)
    }
}
