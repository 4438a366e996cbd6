//! Color format tags
//!
//! The format tag describes how channels are interpreted. It does not
//! constrain the depth. All formats except [`Format::Matrix`] imply a fixed
//! channel count.

use std::fmt;

/// Color format of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Single gray channel
    Gray,
    /// Red, green, blue planes
    Rgb,
    /// Hue, lightness, saturation planes
    Hls,
    /// Luma plus two chroma planes
    Yuv,
    /// CIE L*a*b* planes
    Lab,
    /// Two chromaticity planes (r, g)
    Chroma,
    /// Arbitrary number of channels with no color meaning
    #[default]
    Matrix,
}

impl Format {
    /// Fixed channel count of this format, or `None` for [`Format::Matrix`].
    pub fn channel_count(self) -> Option<usize> {
        match self {
            Format::Gray => Some(1),
            Format::Chroma => Some(2),
            Format::Rgb | Format::Hls | Format::Yuv | Format::Lab => Some(3),
            Format::Matrix => None,
        }
    }

    /// Channel count to allocate when none is given explicitly.
    ///
    /// `Matrix` images default to a single channel.
    pub fn default_channels(self) -> usize {
        self.channel_count().unwrap_or(1)
    }

    /// Check if `channels` is a valid channel count for this format.
    pub fn accepts(self, channels: usize) -> bool {
        self.channel_count().is_none_or(|n| n == channels)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Gray => "gray",
            Format::Rgb => "rgb",
            Format::Hls => "hls",
            Format::Yuv => "yuv",
            Format::Lab => "lab",
            Format::Chroma => "chroma",
            Format::Matrix => "matrix",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_channels() {
        assert_eq!(Format::Gray.channel_count(), Some(1));
        assert_eq!(Format::Rgb.channel_count(), Some(3));
        assert_eq!(Format::Chroma.default_channels(), 2);
        assert_eq!(Format::Matrix.default_channels(), 1);
        assert!(Format::Matrix.accepts(7));
        assert!(!Format::Lab.accepts(4));
    }
}
