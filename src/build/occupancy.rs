use crate::raster::{Painter, Span};
use crate::tile::{Projection, FINEST_TILE};

use super::color::Rgb;

const ALPHA_SHIFT: u32 = 24;
const ALPHA_OPAQUE: u32 = 0xff;
/// Alpha value reserved for cells already resolved by a coarser tile.
const ALPHA_ERASED: u32 = 22;

/// One pixel of the occupancy grid: empty, a zone color, or the erased marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Sample(u32);

impl Sample {
    pub const EMPTY: Self = Self(0);
    pub const ERASED: Self = Self(ALPHA_ERASED << ALPHA_SHIFT);

    #[inline]
    pub fn color(color: Rgb) -> Self {
        Self(ALPHA_OPAQUE << ALPHA_SHIFT | u32::from(color.r) << 16 | u32::from(color.g) << 8 | u32::from(color.b))
    }

    #[inline] pub fn is_empty(self) -> bool { self == Self::EMPTY }

    #[inline] pub fn is_erased(self) -> bool { self.0 >> ALPHA_SHIFT == ALPHA_ERASED }

    /// The zone color, if this sample carries one.
    #[inline]
    pub fn zone_color(self) -> Option<Rgb> {
        (self.0 >> ALPHA_SHIFT == ALPHA_OPAQUE)
            .then(|| Rgb::new((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8))
    }
}

/// Generation-time raster of zone colors, one sample per pixel.
///
/// Classification erases resolved tiles by marking the top-left pixel of each
/// finest (8x8) cell they contain, so a finer pass only has to test one pixel
/// per tile.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    pixels: Vec<Sample>,
}

impl OccupancyGrid {
    /// An all-empty grid of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![Sample::EMPTY; width as usize * height as usize] }
    }

    /// An all-empty grid covering the whole world at `projection`'s scale.
    pub fn for_projection(projection: &Projection) -> Self {
        Self::new(projection.width(), projection.height())
    }

    #[inline] pub fn width(&self) -> u32 { self.width }

    #[inline] pub fn height(&self) -> u32 { self.height }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of range");
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Sample { self.pixels[self.offset(x, y)] }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, sample: Sample) {
        let offset = self.offset(x, y);
        self.pixels[offset] = sample;
    }

    /// Paint `[x0, x1)` on row `y`, clipped to the grid.
    pub fn fill_span(&mut self, y: u32, x0: u32, x1: u32, color: Rgb) {
        if y >= self.height { return }
        let x1 = x1.min(self.width);
        if x0 >= x1 { return }
        let row = self.offset(0, y);
        self.pixels[row + x0 as usize..row + x1 as usize].fill(Sample::color(color));
    }

    /// Paint the rectangle `[x0, x1) x [y0, y1)`, clipped to the grid.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb) {
        for y in y0..y1.min(self.height) {
            self.fill_span(y, x0, x1, color);
        }
    }

    /// Mark every finest cell in `[x0, x1) x [y0, y1)` as resolved.
    /// Erasing an already erased cell is a no-op.
    pub fn erase(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        for y in (y0..y1.min(self.height)).step_by(FINEST_TILE as usize) {
            for x in (x0..x1.min(self.width)).step_by(FINEST_TILE as usize) {
                self.set(x, y, Sample::ERASED);
            }
        }
    }

    /// Painter that fills every span it receives with `color`.
    /// Coverage is expected to be quantized upstream (see `SpanMerger`).
    pub fn painter(&mut self, color: Rgb) -> GridPainter<'_> {
        GridPainter { grid: self, color }
    }
}

/// Writes spans into an `OccupancyGrid` with a fixed zone color.
#[derive(Debug)]
pub struct GridPainter<'a> {
    grid: &'a mut OccupancyGrid,
    color: Rgb,
}

impl Painter for GridPainter<'_> {
    fn paint(&mut self, spans: &mut [Span], _done: bool) {
        for span in spans.iter().filter(|span| span.is_opaque()) {
            self.grid.fill_span(span.y, span.x0, span.x1, self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::SpanMerger;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn sample_kinds_are_distinct() {
        let red = Sample::color(RED);
        assert!(Sample::EMPTY.is_empty() && !Sample::EMPTY.is_erased());
        assert!(Sample::ERASED.is_erased() && !Sample::ERASED.is_empty());
        assert_eq!(red.zone_color(), Some(RED));
        assert_eq!(Sample::color(Rgb::new(0, 0, 0)).zone_color(), Some(Rgb::new(0, 0, 0)));
        assert!(!Sample::color(Rgb::new(0, 0, 0)).is_empty());
        assert_eq!(Sample::ERASED.zone_color(), None);
        assert_eq!(Sample::EMPTY.zone_color(), None);
    }

    #[test]
    fn fill_span_clips() {
        let mut grid = OccupancyGrid::new(16, 8);
        grid.fill_span(2, 10, 40, RED);
        grid.fill_span(9, 0, 4, RED);
        assert!(grid.get(9, 2).is_empty());
        assert_eq!(grid.get(10, 2).zone_color(), Some(RED));
        assert_eq!(grid.get(15, 2).zone_color(), Some(RED));
    }

    #[test]
    fn erase_marks_cell_anchors_only() {
        let mut grid = OccupancyGrid::new(32, 32);
        grid.fill_rect(0, 0, 32, 32, RED);
        grid.erase(0, 0, 16, 16);
        for (x, y) in [(0, 0), (8, 0), (0, 8), (8, 8)] {
            assert!(grid.get(x, y).is_erased());
        }
        assert_eq!(grid.get(1, 0).zone_color(), Some(RED));
        assert_eq!(grid.get(16, 0).zone_color(), Some(RED));

        grid.erase(0, 0, 16, 16);
        assert!(grid.get(8, 8).is_erased());
    }

    #[test]
    fn painter_fills_merged_spans() {
        let mut grid = OccupancyGrid::new(16, 4);
        {
            let mut painter = SpanMerger::new(grid.painter(RED));
            painter.paint(&mut [Span::new(1, 2, 4, 0.9), Span::new(1, 4, 6, 0.3)], true);
        }
        assert_eq!(grid.get(2, 1).zone_color(), Some(RED));
        assert_eq!(grid.get(3, 1).zone_color(), Some(RED));
        assert!(grid.get(4, 1).is_empty());
    }
}
