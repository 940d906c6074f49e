//! Per-worker scratch arenas
//!
//! Canonicalization, partitions and splittings all need a few buffers the size
//! of the tree. A [`Workspace`] owns one set per role, sized once when the
//! worker starts. Trees larger than the configured length get a fresh buffer
//! for the call instead. Nothing here is global: every worker passes its own
//! workspace by reference.

use crate::algebra::{
    Color, Level, PartitionBuffers, PartitionIterator, RootedTree, SplittingBuffers,
    SplittingIterator,
};
use crate::config::Config;
use crate::Result;
use log::trace;
use std::ops::{Deref, DerefMut};

/// Level and color buffers used to swap subtree blocks
#[derive(Clone, Debug, Default)]
pub(crate) struct Scratch<C> {
    pub(crate) levels: Vec<Level>,
    pub(crate) colors: Vec<C>,
}

impl<C: Color> Scratch<C> {
    pub(crate) fn with_len(len: usize) -> Self {
        Scratch {
            levels: vec![0; len],
            colors: vec![C::default(); len],
        }
    }

    pub(crate) fn ensure_len(&mut self, len: usize) {
        if self.levels.len() < len {
            self.levels.resize(len, 0);
            self.colors.resize(len, C::default());
        }
    }

    /// Copy a tree's sequences into the front of the buffers
    pub(crate) fn load(&mut self, levels: &[Level], colors: &[C]) {
        let n = levels.len();
        self.ensure_len(n);
        self.levels[..n].copy_from_slice(levels);
        self.colors[..n].copy_from_slice(colors);
    }
}

/// A buffer borrowed from an arena, or owned for a single call
pub(crate) enum BufferSlot<'a, B> {
    Borrowed(&'a mut B),
    Owned(B),
}

impl<B> Deref for BufferSlot<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        match self {
            BufferSlot::Borrowed(buffer) => buffer,
            BufferSlot::Owned(buffer) => buffer,
        }
    }
}

impl<B> DerefMut for BufferSlot<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        match self {
            BufferSlot::Borrowed(buffer) => buffer,
            BufferSlot::Owned(buffer) => buffer,
        }
    }
}

/// Scratch arena owned by one worker
#[derive(Debug)]
pub struct Workspace<C: Color = ()> {
    buffer_length: usize,
    canonical: Scratch<C>,
    partition: PartitionBuffers<C>,
    splitting: SplittingBuffers<C>,
}

impl<C: Color> Workspace<C> {
    /// Create an arena with every buffer sized to `buffer_length`
    pub fn new(buffer_length: usize) -> Self {
        Workspace {
            buffer_length,
            canonical: Scratch::with_len(buffer_length),
            partition: PartitionBuffers::with_len(buffer_length),
            splitting: SplittingBuffers::with_len(buffer_length),
        }
    }

    /// Create an arena from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.buffer_length))
    }

    /// Largest tree order served without allocation
    pub fn buffer_length(&self) -> usize {
        self.buffer_length
    }

    fn fits(&self, order: usize) -> bool {
        if order > self.buffer_length {
            trace!(
                "order {} exceeds arena length {}, allocating per call",
                order,
                self.buffer_length
            );
            return false;
        }
        true
    }

    pub(crate) fn canonical_scratch(&mut self, order: usize) -> BufferSlot<'_, Scratch<C>> {
        if self.fits(order) {
            BufferSlot::Borrowed(&mut self.canonical)
        } else {
            BufferSlot::Owned(Scratch::with_len(order))
        }
    }

    /// Enumerate all edge partitions of `tree` using this arena
    pub fn partitions<'a, T>(&'a mut self, tree: &'a T) -> Result<PartitionIterator<'a, C>>
    where
        T: RootedTree<Color = C> + ?Sized,
    {
        let view = tree.view();
        let slot = if self.fits(view.len()) {
            BufferSlot::Borrowed(&mut self.partition)
        } else {
            BufferSlot::Owned(PartitionBuffers::with_len(view.len()))
        };
        PartitionIterator::with_buffers(view, slot)
    }

    /// Enumerate all splittings of `tree` using this arena
    pub fn splittings<'a, T>(&'a mut self, tree: &'a T) -> Result<SplittingIterator<'a, C>>
    where
        T: RootedTree<Color = C> + ?Sized,
    {
        let view = tree.view();
        let slot = if self.fits(view.len()) {
            BufferSlot::Borrowed(&mut self.splitting)
        } else {
            BufferSlot::Owned(SplittingBuffers::with_len(view.len()))
        };
        SplittingIterator::with_buffers(view, slot)
    }
}

impl<C: Color> Default for Workspace<C> {
    fn default() -> Self {
        Self::new(crate::config::BUFFER_LENGTH)
    }
}
