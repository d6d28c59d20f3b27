/// Coverage at or above this fraction quantizes to fully inside.
pub const OPAQUE_THRESHOLD: f32 = 0.5;

/// A horizontal run of pixels `[x0, x1)` on row `y` with a uniform coverage fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub y: u32,
    pub x0: u32,
    pub x1: u32,
    /// Fraction of each pixel covered, in `[0.0, 1.0]`.
    pub coverage: f32,
}

impl Span {
    #[inline]
    pub fn new(y: u32, x0: u32, x1: u32, coverage: f32) -> Self {
        Self { y, x0, x1, coverage }
    }

    /// A fully covered span.
    #[inline]
    pub fn opaque(y: u32, x0: u32, x1: u32) -> Self { Self::new(y, x0, x1, 1.0) }

    #[inline] pub fn is_opaque(&self) -> bool { self.coverage >= OPAQUE_THRESHOLD }

    #[inline] pub fn len(&self) -> u32 { self.x1.saturating_sub(self.x0) }

    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Receives spans from a rasterizer in batches.
///
/// Spans arrive in scanline order. `done` is set on the last call for one image;
/// after it the painter may be reused for another image. The slice is scratch
/// space owned by the caller and may be rewritten by the painter.
pub trait Painter {
    fn paint(&mut self, spans: &mut [Span], done: bool);
}

impl<P: Painter + ?Sized> Painter for &mut P {
    fn paint(&mut self, spans: &mut [Span], done: bool) {
        (**self).paint(spans, done)
    }
}
