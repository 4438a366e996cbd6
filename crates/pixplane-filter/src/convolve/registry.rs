//! Specialization registry
//!
//! Maps `(source depth, kernel type, backend)` to the function that runs a
//! convolution for that combination. Accelerated entries usually only
//! handle a few mask sizes; portable entries handle any.

use crate::FilterResult;
use crate::kernel::{Kernel, KernelType};
use pixplane_core::{AnyImage, Depth, Size};
use std::collections::HashMap;
use std::fmt;

use super::portable;

/// Implementation family of a specialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Generic per-pixel loop over ROI iterators
    Portable,
    /// Row-based loops unrolled for fixed mask sizes
    Accelerated,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Portable => "portable",
            Backend::Accelerated => "accelerated",
        })
    }
}

/// Convolution entry point
///
/// Called with the source image, the kernel in the specialization's element
/// type, and a destination whose size, channel count and ROI already match
/// the output. The destination's channels are exclusive.
pub type ConvolveFn = fn(&AnyImage, &Kernel, &mut AnyImage) -> FilterResult<()>;

fn any_mask(_: Size) -> bool {
    true
}

/// A registered implementation
#[derive(Debug, Clone, Copy)]
pub struct Specialization {
    /// Name used in logs and [`Resolution`](super::Resolution)
    pub name: &'static str,
    /// Entry point
    pub run: ConvolveFn,
    /// Mask sizes the entry point handles
    pub supports: fn(Size) -> bool,
}

impl Specialization {
    /// Specialization handling any mask size.
    pub fn new(name: &'static str, run: ConvolveFn) -> Self {
        Self {
            name,
            run,
            supports: any_mask,
        }
    }

    /// Restrict the mask sizes this specialization handles.
    pub fn with_masks(mut self, supports: fn(Size) -> bool) -> Self {
        self.supports = supports;
        self
    }
}

/// Lookup table of convolution specializations
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<(Depth, KernelType, Backend), Specialization>,
}

impl Default for Registry {
    /// Portable entries plus, with the `accel` feature, accelerated ones.
    fn default() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::portable();
        #[cfg(feature = "accel")]
        super::accel::register(&mut registry);
        registry
    }
}

impl Registry {
    /// Registry with no entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry with the portable entries only.
    ///
    /// Integer kernels are handled for `U8`, `I16` and `I32` sources, float
    /// kernels for every depth.
    pub fn portable() -> Self {
        let mut registry = Self::empty();
        let int = [
            (Depth::U8, Specialization::new("portable-int-u8", portable::convolve_int::<u8>)),
            (Depth::I16, Specialization::new("portable-int-i16", portable::convolve_int::<i16>)),
            (Depth::I32, Specialization::new("portable-int-i32", portable::convolve_int::<i32>)),
        ];
        for (depth, spec) in int {
            registry.register(depth, KernelType::Int, Backend::Portable, spec);
        }
        let float = [
            (Depth::U8, Specialization::new("portable-float-u8", portable::convolve_float::<u8>)),
            (
                Depth::I16,
                Specialization::new("portable-float-i16", portable::convolve_float::<i16>),
            ),
            (
                Depth::I32,
                Specialization::new("portable-float-i32", portable::convolve_float::<i32>),
            ),
            (
                Depth::F32,
                Specialization::new("portable-float-f32", portable::convolve_float::<f32>),
            ),
            (
                Depth::F64,
                Specialization::new("portable-float-f64", portable::convolve_float::<f64>),
            ),
        ];
        for (depth, spec) in float {
            registry.register(depth, KernelType::Float, Backend::Portable, spec);
        }
        registry
    }

    /// Add or replace an entry, returning the previous one.
    pub fn register(
        &mut self,
        depth: Depth,
        kernel: KernelType,
        backend: Backend,
        spec: Specialization,
    ) -> Option<Specialization> {
        self.entries.insert((depth, kernel, backend), spec)
    }

    /// Remove an entry.
    pub fn unregister(
        &mut self,
        depth: Depth,
        kernel: KernelType,
        backend: Backend,
    ) -> Option<Specialization> {
        self.entries.remove(&(depth, kernel, backend))
    }

    /// Look up an entry.
    pub fn get(
        &self,
        depth: Depth,
        kernel: KernelType,
        backend: Backend,
    ) -> Option<&Specialization> {
        self.entries.get(&(depth, kernel, backend))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best entry for one kernel type: accelerated first when allowed and
    /// the mask is supported, then portable.
    pub(crate) fn find(
        &self,
        depth: Depth,
        kernel: KernelType,
        mask: Size,
        allow_accelerated: bool,
    ) -> Option<(Backend, &Specialization)> {
        let backends: &[Backend] = if allow_accelerated {
            &[Backend::Accelerated, Backend::Portable]
        } else {
            &[Backend::Portable]
        };
        backends.iter().find_map(|&backend| {
            self.get(depth, kernel, backend)
                .filter(|spec| (spec.supports)(mask))
                .map(|spec| (backend, spec))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portable_table() {
        let registry = Registry::portable();
        assert_eq!(registry.len(), 8);
        for depth in Depth::ALL {
            assert!(registry.get(depth, KernelType::Float, Backend::Portable).is_some());
            assert_eq!(
                registry.get(depth, KernelType::Int, Backend::Portable).is_some(),
                depth.is_integer()
            );
        }
    }

    #[test]
    fn test_find_respects_masks() {
        fn only_3x3(mask: Size) -> bool {
            mask == Size::new(3, 3)
        }

        let mut registry = Registry::portable();
        let fast = Specialization::new("fast", portable::convolve_int::<u8>).with_masks(only_3x3);
        registry.register(Depth::U8, KernelType::Int, Backend::Accelerated, fast);

        let (backend, spec) = registry
            .find(Depth::U8, KernelType::Int, Size::new(3, 3), true)
            .unwrap();
        assert_eq!((backend, spec.name), (Backend::Accelerated, "fast"));

        let (backend, _) = registry
            .find(Depth::U8, KernelType::Int, Size::new(7, 7), true)
            .unwrap();
        assert_eq!(backend, Backend::Portable);

        let (backend, _) = registry
            .find(Depth::U8, KernelType::Int, Size::new(3, 3), false)
            .unwrap();
        assert_eq!(backend, Backend::Portable);

        assert!(registry.find(Depth::F32, KernelType::Int, Size::new(3, 3), true).is_none());
    }

    #[test]
    fn test_unregister() {
        let mut registry = Registry::portable();
        assert!(registry.unregister(Depth::U8, KernelType::Int, Backend::Portable).is_some());
        assert!(registry.get(Depth::U8, KernelType::Int, Backend::Portable).is_none());
        assert!(Registry::empty().is_empty());
    }
}
