//! Convolution options

use pixplane_core::Depth;

/// Which backends the engine may pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BackendPreference {
    /// Prefer an accelerated specialization when one handles the mask
    #[default]
    Auto,
    /// Only use portable specializations
    Portable,
}

impl BackendPreference {
    /// Read the preference from the `PIXPLANE_BACKEND` environment variable.
    ///
    /// `portable` selects [`BackendPreference::Portable`]; anything else,
    /// including an unset variable, selects [`BackendPreference::Auto`].
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("PIXPLANE_BACKEND").unwrap_or_default())
    }

    /// Parse a preference string (case-insensitive).
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "portable" => Self::Portable,
            _ => Self::Auto,
        }
    }
}

/// Options controlling destination layout and backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvolutionOptions {
    /// Size the destination to the output ROI (`true`) or keep the source
    /// size and set the destination ROI to the output rectangle (`false`)
    pub clip_to_roi: bool,
    /// Backend selection
    pub backend: BackendPreference,
    /// Destination depth; `None` keeps the source depth
    pub output_depth: Option<Depth>,
}

impl Default for ConvolutionOptions {
    fn default() -> Self {
        Self {
            clip_to_roi: true,
            backend: BackendPreference::default(),
            output_depth: None,
        }
    }
}

impl ConvolutionOptions {
    /// Default options with the backend taken from `PIXPLANE_BACKEND`.
    pub fn from_env() -> Self {
        Self::default().with_backend(BackendPreference::from_env())
    }

    /// Set [`clip_to_roi`](Self::clip_to_roi).
    pub fn with_clip_to_roi(mut self, clip: bool) -> Self {
        self.clip_to_roi = clip;
        self
    }

    /// Set [`backend`](Self::backend).
    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    /// Set [`output_depth`](Self::output_depth).
    pub fn with_output_depth(mut self, depth: Depth) -> Self {
        self.output_depth = Some(depth);
        self
    }
}
