//! Drawing surfaces and the per-record registry.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::views::SurfaceFrame;

#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The backing element no longer exists (canvas removed, window closed).
    #[error("surface is no longer available")]
    Gone,
    #[error("drawing failed: {0}")]
    Draw(String),
}

/// Something a record's code can be painted onto.
pub trait Surface {
    fn paint(&mut self, frame: &SurfaceFrame) -> Result<(), SurfaceError>;
}

/// Keeps the last painted frame. Immediate-mode front ends read it back on
/// every repaint.
#[derive(Debug, Clone, Default)]
pub struct FrameSurface {
    frame: Option<SurfaceFrame>,
    paints: usize,
}

impl FrameSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> Option<&SurfaceFrame> {
        self.frame.as_ref()
    }

    /// How many times the surface was painted.
    pub fn paints(&self) -> usize {
        self.paints
    }
}

impl Surface for FrameSurface {
    fn paint(&mut self, frame: &SurfaceFrame) -> Result<(), SurfaceError> {
        self.frame = Some(frame.clone());
        self.paints += 1;
        Ok(())
    }
}

/// Surfaces keyed by record position.
#[derive(Debug)]
pub struct SurfaceRegistry<S> {
    entries: BTreeMap<usize, S>,
}

impl<S> Default for SurfaceRegistry<S> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<S> SurfaceRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `surface` for `index`, returning the one it replaces.
    pub fn register(&mut self, index: usize, surface: S) -> Option<S> {
        self.entries.insert(index, surface)
    }

    pub fn remove(&mut self, index: usize) -> Option<S> {
        self.entries.remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.entries.get(&index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut S> {
        self.entries.get_mut(&index)
    }

    /// Entries in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut S)> {
        self.entries.iter_mut().map(|(i, s)| (*i, s))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
