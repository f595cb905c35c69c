//! Render sink: the only surface the particle simulation draws through.
//!
//! A sink owns the visual nodes of a shared rendering container (a DOM
//! container, a terminal layer, a test recorder). The simulation creates
//! exactly one node per particle and removes it exactly once when the
//! particle dies. Other elements living in the same container are never
//! touched.

use crate::particles::ParticleKind;

/// Backend capable of displaying particle nodes.
pub trait RenderSink {
    /// Opaque handle to one node in the container.
    type Handle;

    /// Attach a new node styled for `kind` at `(x, y)`.
    fn create(&mut self, kind: ParticleKind, x: f64, y: f64, scale: f64) -> Self::Handle;

    /// Move a node and set its opacity (always within [0, 1]).
    fn update(&mut self, handle: &Self::Handle, x: f64, y: f64, opacity: f64);

    /// Detach a node. Consumes the handle so it cannot be released twice.
    fn destroy(&mut self, handle: Self::Handle);
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    type Handle = S::Handle;

    fn create(&mut self, kind: ParticleKind, x: f64, y: f64, scale: f64) -> Self::Handle {
        (**self).create(kind, x, y, scale)
    }

    fn update(&mut self, handle: &Self::Handle, x: f64, y: f64, opacity: f64) {
        (**self).update(handle, x, y, opacity)
    }

    fn destroy(&mut self, handle: Self::Handle) {
        (**self).destroy(handle)
    }
}
