//! Structural edits of an image's channel list

use super::Image;
use crate::channel::{ChannelBlock, Ownership};
use crate::depth::Sample;
use crate::error::{Error, Result};
use crate::format::Format;

impl<T: Sample> Image<T> {
    /// Append a channel of `source`, aliasing its storage.
    ///
    /// Call [`deep_copy`](Self::deep_copy) on the source first to get an
    /// independent channel instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the images differ in size and
    /// [`Error::ChannelIndex`] for a bad source index.
    pub fn append_channel(&mut self, source: &mut Image<T>, channel: usize) -> Result<()> {
        self.check_same_size(source)?;
        let block = source.block_mut(channel)?.share();
        self.channels.push(block);
        self.reconcile_format();
        Ok(())
    }

    /// Remove a channel.
    ///
    /// If the removed block was shared, the other holders keep it alive.
    pub fn remove_channel(&mut self, channel: usize) -> Result<()> {
        self.block(channel)?;
        self.channels.remove(channel);
        self.reconcile_format();
        Ok(())
    }

    /// Exchange two channels of this image.
    pub fn swap_channels(&mut self, a: usize, b: usize) -> Result<()> {
        self.block(a)?;
        self.block(b)?;
        self.channels.swap(a, b);
        Ok(())
    }

    /// Replace channel `channel` with channel `source_channel` of `source`,
    /// aliasing its storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the images differ in size and
    /// [`Error::ChannelIndex`] for a bad index on either side.
    pub fn replace_channel(
        &mut self,
        channel: usize,
        source: &mut Image<T>,
        source_channel: usize,
    ) -> Result<()> {
        self.check_same_size(source)?;
        self.block(channel)?;
        let block = source.block_mut(source_channel)?.share();
        self.channels[channel] = block;
        Ok(())
    }

    /// Set the channel count, appending zeroed channels or dropping
    /// trailing ones.
    pub fn set_channels(&mut self, channels: usize) -> Result<()> {
        self.resize_channel_list(channels)?;
        self.reconcile_format();
        Ok(())
    }

    /// Set the color format, adjusting the channel count to match it.
    ///
    /// Switching to [`Format::Matrix`] keeps the current channels.
    pub fn set_format(&mut self, format: Format) -> Result<()> {
        if let Some(n) = format.channel_count() {
            self.resize_channel_list(n)?;
        }
        self.format = format;
        Ok(())
    }

    fn resize_channel_list(&mut self, channels: usize) -> Result<()> {
        if channels > self.channels.len() {
            let area = self.size.area();
            let missing = channels - self.channels.len();
            self.channels.try_reserve(missing).map_err(|_| Error::OutOfMemory {
                bytes: missing.saturating_mul(std::mem::size_of::<ChannelBlock<T>>()),
            })?;
            for _ in 0..missing {
                self.channels.push(ChannelBlock::allocate(area)?);
            }
        } else {
            self.channels.truncate(channels);
        }
        Ok(())
    }

    /// Ownership state of one channel.
    pub fn ownership(&self, channel: usize) -> Result<Ownership> {
        Ok(self.block(channel)?.ownership())
    }

    fn check_same_size(&self, other: &Image<T>) -> Result<()> {
        if self.size != other.size {
            return Err(Error::SizeMismatch {
                expected: self.size,
                actual: other.size,
            });
        }
        Ok(())
    }

    /// Fall back to `Matrix` when the channel count no longer fits.
    fn reconcile_format(&mut self) {
        if !self.format.accepts(self.channels.len()) {
            log::debug!(
                "{} channels do not fit format {}, switching to matrix",
                self.channels.len(),
                self.format
            );
            self.format = Format::Matrix;
        }
    }
}
