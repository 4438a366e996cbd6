//! Image - typed planar multi-channel image
//!
//! An [`Image<T>`] is an ordered list of [`ChannelBlock`]s of one sample
//! type, all `width * height` samples long, plus a color [`Format`] tag and
//! a region of interest.
//!
//! # Ownership model
//!
//! Channels can be shared between images without copying pixels:
//! [`Image::shallow_copy`] and the channel-editing operations that take a
//! source image create aliases. Aliasing is visible in the API:
//!
//! - [`Image::channel_data_mut`], [`Image::view_mut`] and
//!   [`Image::set_pixel`] refuse to write to an aliased channel
//!   ([`Error::SharedChannel`]), so a plain write never leaks into another
//!   image.
//! - [`Image::detach`] gives the image private copies of every aliased
//!   channel.
//! - [`Image::channel_data_aliased`] deliberately writes through an alias.
//!
//! Whole-image writers in this crate ([`Image::fill`], [`Image::resize`],
//! [`Image::copy_roi_to`]) detach the channels they touch first.
//!
//! # Examples
//!
//! ```
//! use pixplane_core::{Format, Image, Size};
//!
//! let mut a = Image::<u8>::new(Size::new(4, 4), 1, Format::Gray).unwrap();
//! a.fill(10).unwrap();
//!
//! let mut b = a.shallow_copy();
//! assert!(!b.is_exclusive());
//!
//! b.detach().unwrap();
//! b.set_pixel(0, 0, 0, 99).unwrap();
//! assert_eq!(a.pixel(0, 0, 0), Some(10));
//! ```

mod access;
mod channels;
mod convert;

use crate::channel::ChannelBlock;
use crate::depth::{Depth, Sample};
use crate::error::{Error, Result};
use crate::format::Format;
use crate::geom::{Rect, Size};

/// Typed planar image
#[derive(Debug)]
pub struct Image<T: Sample> {
    size: Size,
    format: Format,
    roi: Rect,
    channels: Vec<ChannelBlock<T>>,
}

impl<T: Sample> Image<T> {
    /// Create an image with `channels` zeroed channels.
    ///
    /// The ROI covers the whole image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `format` has a fixed channel
    /// count different from `channels`, or [`Error::OutOfMemory`] if a
    /// channel cannot be allocated.
    pub fn new(size: Size, channels: usize, format: Format) -> Result<Self> {
        if !format.accepts(channels) {
            return Err(Error::InvalidParameter(format!(
                "format {format} requires {} channels, got {channels}",
                format.default_channels()
            )));
        }
        let blocks = (0..channels)
            .map(|_| ChannelBlock::allocate(size.area()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            size,
            format,
            roi: Rect::from_size(size),
            channels: blocks,
        })
    }

    /// Create an image with the channel count implied by `format`.
    pub fn with_format(size: Size, format: Format) -> Result<Self> {
        Self::new(size, format.default_channels(), format)
    }

    /// Build an image from per-channel sample vectors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a vector's length is not
    /// `size.area()` or the channel count does not fit `format`.
    pub fn from_planes(size: Size, format: Format, planes: Vec<Vec<T>>) -> Result<Self> {
        if !format.accepts(planes.len()) {
            return Err(Error::InvalidParameter(format!(
                "format {format} does not accept {} channels",
                planes.len()
            )));
        }
        if let Some(bad) = planes.iter().find(|p| p.len() != size.area()) {
            return Err(Error::InvalidParameter(format!(
                "plane holds {} samples, expected {}",
                bad.len(),
                size.area()
            )));
        }
        Ok(Self {
            size,
            format,
            roi: Rect::from_size(size),
            channels: planes.into_iter().map(ChannelBlock::from_vec).collect(),
        })
    }

    /// Wrap caller-owned planes without copying or taking ownership.
    ///
    /// One channel is created per pointer. The image never frees the
    /// memory.
    ///
    /// # Safety
    ///
    /// Every pointer must be valid for reads and writes of `size.area()`
    /// samples for as long as this image, or any image sharing its channels,
    /// is alive, and must not be accessed by other means during that time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a null pointer or a channel
    /// count that does not fit `format`.
    pub unsafe fn from_shared(planes: &[*mut T], size: Size, format: Format) -> Result<Self> {
        if !format.accepts(planes.len()) {
            return Err(Error::InvalidParameter(format!(
                "format {format} does not accept {} channels",
                planes.len()
            )));
        }
        let channels = planes
            .iter()
            // SAFETY: forwarded from this function's contract.
            .map(|&ptr| unsafe { ChannelBlock::wrap(ptr, size.area()) })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            size,
            format,
            roi: Rect::from_size(size),
            channels,
        })
    }

    /// Depth tag of the sample type.
    #[inline]
    pub fn depth(&self) -> Depth {
        T::DEPTH
    }

    /// Image size.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Number of channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    /// Color format.
    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Region of interest.
    #[inline]
    pub fn roi(&self) -> Rect {
        self.roi
    }

    /// Check if the ROI covers the whole image.
    #[inline]
    pub fn has_full_roi(&self) -> bool {
        self.roi == Rect::from_size(self.size)
    }

    /// Set the region of interest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoi`] if `roi` is not contained in the image.
    pub fn set_roi(&mut self, roi: Rect) -> Result<()> {
        if !roi.fits_in(self.size) {
            return Err(Error::InvalidRoi {
                roi,
                size: self.size,
            });
        }
        self.roi = roi;
        Ok(())
    }

    /// Reset the ROI to the whole image.
    pub fn reset_roi(&mut self) {
        self.roi = Rect::from_size(self.size);
    }

    /// Create an image that shares every channel with this one.
    ///
    /// No samples are copied. Both images report their channels as shared
    /// until one of them detaches or is dropped.
    pub fn shallow_copy(&mut self) -> Image<T> {
        Image {
            size: self.size,
            format: self.format,
            roi: self.roi,
            channels: self.channels.iter_mut().map(ChannelBlock::share).collect(),
        }
    }

    /// Create an independent image with copied samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if a channel cannot be allocated.
    pub fn deep_copy(&self) -> Result<Image<T>> {
        Ok(Image {
            size: self.size,
            format: self.format,
            roi: self.roi,
            channels: self
                .channels
                .iter()
                .map(ChannelBlock::deep_copy)
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// Give this image private copies of all aliased channels.
    ///
    /// Channels that are already exclusive are left untouched. Afterwards
    /// no other image observes writes to this one, and vice versa.
    pub fn detach(&mut self) -> Result<()> {
        let mut copied = 0;
        for block in &mut self.channels {
            if block.detach()? {
                copied += 1;
            }
        }
        if copied > 0 {
            log::trace!("detached {copied} of {} channels", self.channels.len());
        }
        Ok(())
    }

    /// Give one channel a private copy if it is aliased.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelIndex`] for a bad index.
    pub fn detach_channel(&mut self, channel: usize) -> Result<()> {
        self.block_mut(channel)?.detach()?;
        Ok(())
    }

    /// Check if none of the channels is aliased by another image.
    pub fn is_exclusive(&self) -> bool {
        self.channels.iter().all(ChannelBlock::is_exclusive)
    }

    /// Change the image size.
    ///
    /// A no-op if the size is unchanged. Otherwise every channel is replaced
    /// by a fresh zeroed block (contents are not preserved) and the ROI is
    /// reset to the whole image.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        if size == self.size {
            return Ok(());
        }
        let blocks = (0..self.channels.len())
            .map(|_| ChannelBlock::allocate(size.area()))
            .collect::<Result<Vec<_>>>()?;
        self.channels = blocks;
        self.size = size;
        self.roi = Rect::from_size(size);
        Ok(())
    }

    pub(crate) fn block(&self, channel: usize) -> Result<&ChannelBlock<T>> {
        let len = self.channels.len();
        self.channels.get(channel).ok_or(Error::ChannelIndex {
            index: channel,
            len,
        })
    }

    pub(crate) fn block_mut(&mut self, channel: usize) -> Result<&mut ChannelBlock<T>> {
        let len = self.channels.len();
        self.channels.get_mut(channel).ok_or(Error::ChannelIndex {
            index: channel,
            len,
        })
    }
}
