//! Channel blocks - the unit of pixel memory ownership
//!
//! A [`ChannelBlock`] is one contiguous plane of samples. Its storage is in
//! exactly one of three states:
//!
//! - **Owned**: a private heap allocation. Only the holding image can see it.
//! - **Shared**: a reference-counted heap allocation aliased by several
//!   images (created by [`ChannelBlock::share`]).
//! - **Borrowed**: caller-owned memory wrapped by [`ChannelBlock::wrap`].
//!   Dropping the last block that refers to it never frees it.
//!
//! # Write discipline
//!
//! [`ChannelBlock::exclusive_mut`] only hands out a plain `&mut [T]` when no
//! other block aliases the storage, so code that mutates through it can
//! never be observed by another image. Writing *through* an alias is still
//! possible, but only via [`ChannelBlock::aliased_mut`], which names the
//! intent at the call site. Reference counts are not atomic; blocks are
//! neither `Send` nor `Sync`.

use crate::depth::Sample;
use crate::error::{Error, Result};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::rc::Rc;

/// Caller-owned sample memory
struct ExternalBuf<T> {
    ptr: NonNull<T>,
    len: usize,
}

impl<T> ExternalBuf<T> {
    fn as_slice(&self) -> &[T] {
        // SAFETY: `wrap` requires `ptr` to be valid for `len` reads for the
        // lifetime of every block referring to it.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above for writes; the surrounding `RefCell` (or unique
        // `Rc`) guarantees this is the only live reference.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

enum BlockState<T> {
    Owned(Box<[T]>),
    Shared(Rc<RefCell<Box<[T]>>>),
    Borrowed(Rc<RefCell<ExternalBuf<T>>>),
}

/// How a channel block holds its storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Private allocation
    Owned,
    /// Reference-counted allocation with `refs` holders
    Shared { refs: usize },
    /// Caller-owned memory with `refs` holders
    Borrowed { refs: usize },
}

/// One plane of pixel samples
pub struct ChannelBlock<T> {
    state: BlockState<T>,
}

/// Read guard for a channel's samples
pub enum ChannelRef<'a, T> {
    /// Storage reachable without a borrow flag
    Plain(&'a [T]),
    /// Storage behind a shared cell
    Cell(Ref<'a, [T]>),
}

/// Write guard for a channel's samples
pub enum ChannelMut<'a, T> {
    /// Storage reachable without a borrow flag
    Plain(&'a mut [T]),
    /// Storage behind a shared cell
    Cell(RefMut<'a, [T]>),
}

impl<T> Deref for ChannelRef<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match self {
            ChannelRef::Plain(s) => s,
            ChannelRef::Cell(r) => r,
        }
    }
}

impl<T> Deref for ChannelMut<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match self {
            ChannelMut::Plain(s) => s,
            ChannelMut::Cell(r) => r,
        }
    }
}

impl<T> DerefMut for ChannelMut<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        match self {
            ChannelMut::Plain(s) => s,
            ChannelMut::Cell(r) => r,
        }
    }
}

/// Allocate a zeroed boxed slice, reporting failure instead of aborting.
pub(crate) fn try_alloc<T: Sample>(len: usize) -> Result<Box<[T]>> {
    let mut v: Vec<T> = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::OutOfMemory {
        bytes: len.saturating_mul(T::DEPTH.bytes()),
    })?;
    v.resize(len, T::default());
    Ok(v.into_boxed_slice())
}

impl<T: Sample> ChannelBlock<T> {
    /// Allocate a zero-initialized block of `len` samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the allocation fails.
    pub fn allocate(len: usize) -> Result<Self> {
        Ok(Self {
            state: BlockState::Owned(try_alloc(len)?),
        })
    }

    /// Take ownership of existing samples.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            state: BlockState::Owned(data.into_boxed_slice()),
        }
    }

    /// Wrap caller-owned memory without taking ownership of it.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` samples for as long
    /// as this block, or any block shared from it, is alive, and must not be
    /// accessed by other means during that time. Dropping the blocks never
    /// frees the memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `ptr` is null and `len > 0`.
    pub unsafe fn wrap(ptr: *mut T, len: usize) -> Result<Self> {
        let ptr = match NonNull::new(ptr) {
            Some(p) => p,
            None if len == 0 => NonNull::dangling(),
            None => {
                return Err(Error::InvalidParameter(
                    "cannot wrap a null channel pointer".into(),
                ));
            }
        };
        Ok(Self {
            state: BlockState::Borrowed(Rc::new(RefCell::new(ExternalBuf { ptr, len }))),
        })
    }

    /// Create another handle aliasing the same storage.
    ///
    /// An owned block is promoted to the shared state first, so both `self`
    /// and the returned block report [`Ownership::Shared`] afterwards.
    pub fn share(&mut self) -> Self {
        if let BlockState::Owned(_) = self.state {
            let placeholder = BlockState::Owned(Box::default());
            if let BlockState::Owned(data) = std::mem::replace(&mut self.state, placeholder) {
                self.state = BlockState::Shared(Rc::new(RefCell::new(data)));
            }
        }
        log::trace!("sharing channel block of {} samples", self.len());
        let state = match &self.state {
            BlockState::Shared(rc) => BlockState::Shared(Rc::clone(rc)),
            BlockState::Borrowed(rc) => BlockState::Borrowed(Rc::clone(rc)),
            BlockState::Owned(_) => unreachable!("owned block was promoted above"),
        };
        Self { state }
    }

    /// Number of samples in the block.
    pub fn len(&self) -> usize {
        match &self.state {
            BlockState::Owned(data) => data.len(),
            BlockState::Shared(rc) => rc.borrow().len(),
            BlockState::Borrowed(rc) => rc.borrow().len,
        }
    }

    /// Check if the block holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current ownership state.
    pub fn ownership(&self) -> Ownership {
        match &self.state {
            BlockState::Owned(_) => Ownership::Owned,
            BlockState::Shared(rc) => Ownership::Shared {
                refs: Rc::strong_count(rc),
            },
            BlockState::Borrowed(rc) => Ownership::Borrowed {
                refs: Rc::strong_count(rc),
            },
        }
    }

    /// Check if no other block aliases this block's storage.
    pub fn is_exclusive(&self) -> bool {
        match self.ownership() {
            Ownership::Owned => true,
            Ownership::Shared { refs } | Ownership::Borrowed { refs } => refs == 1,
        }
    }

    /// Read access to the samples.
    ///
    /// # Panics
    ///
    /// Panics if an [`aliased_mut`](Self::aliased_mut) guard on the same
    /// storage is alive.
    pub fn samples(&self) -> ChannelRef<'_, T> {
        match &self.state {
            BlockState::Owned(data) => ChannelRef::Plain(data),
            BlockState::Shared(rc) => ChannelRef::Cell(Ref::map(rc.borrow(), |b| &b[..])),
            BlockState::Borrowed(rc) => ChannelRef::Cell(Ref::map(rc.borrow(), |e| e.as_slice())),
        }
    }

    /// Write access that no other image can observe.
    ///
    /// Returns `None` while the storage is aliased; call
    /// [`detach`](Self::detach) first.
    pub fn exclusive_mut(&mut self) -> Option<&mut [T]> {
        match &mut self.state {
            BlockState::Owned(data) => Some(&mut data[..]),
            BlockState::Shared(rc) => Rc::get_mut(rc).map(|cell| &mut cell.get_mut()[..]),
            BlockState::Borrowed(rc) => Rc::get_mut(rc).map(|cell| cell.get_mut().as_mut_slice()),
        }
    }

    /// Write access that is visible to every image aliasing this block.
    ///
    /// # Panics
    ///
    /// Panics if any other guard on the same storage is alive.
    pub fn aliased_mut(&mut self) -> ChannelMut<'_, T> {
        match &mut self.state {
            BlockState::Owned(data) => ChannelMut::Plain(&mut data[..]),
            BlockState::Shared(rc) => {
                ChannelMut::Cell(RefMut::map(rc.borrow_mut(), |b| &mut b[..]))
            }
            BlockState::Borrowed(rc) => {
                ChannelMut::Cell(RefMut::map(rc.borrow_mut(), |e| e.as_mut_slice()))
            }
        }
    }

    /// Create a private copy of the samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the allocation fails.
    pub fn deep_copy(&self) -> Result<Self> {
        let src = self.samples();
        let mut data = try_alloc::<T>(src.len())?;
        data.copy_from_slice(&src);
        Ok(Self {
            state: BlockState::Owned(data),
        })
    }

    /// Break aliasing with every other block.
    ///
    /// Aliased storage is copied into a fresh owned allocation. A shared
    /// block that has become the last holder is turned back into an owned
    /// one without copying. A wrapped block with no other holders keeps
    /// pointing at the caller's memory. Returns `true` if samples were copied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the copy cannot be allocated.
    pub fn detach(&mut self) -> Result<bool> {
        if self.is_exclusive() {
            if let BlockState::Shared(_) = self.state {
                let placeholder = BlockState::Owned(Box::default());
                if let BlockState::Shared(rc) = std::mem::replace(&mut self.state, placeholder) {
                    match Rc::try_unwrap(rc) {
                        Ok(cell) => self.state = BlockState::Owned(cell.into_inner()),
                        Err(rc) => self.state = BlockState::Shared(rc),
                    }
                }
            }
            return Ok(false);
        }
        log::trace!("detaching channel block of {} samples", self.len());
        *self = self.deep_copy()?;
        Ok(true)
    }
}

impl<T: Sample> fmt::Debug for ChannelBlock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelBlock")
            .field("depth", &T::DEPTH)
            .field("len", &self.len())
            .field("ownership", &self.ownership())
            .finish()
    }
}
