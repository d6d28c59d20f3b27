use geo::{BoundingRect, Coord, MultiPolygon};

use super::span::{Painter, Span};

/// Sample lines per pixel row.
const SUBSAMPLES: u32 = 4;

/// Scanline rasterizer producing anti-aliased coverage spans.
///
/// Filling is even-odd over every ring of the shape, so holes come out empty.
/// Coverage is sampled on `SUBSAMPLES` horizontal lines per row, with exact
/// fractional coverage along x. Only edges spanning the current sample line
/// are tested. Buffers are kept between shapes.
#[derive(Debug)]
pub struct Rasterizer {
    width: u32,
    height: u32,
    capacity: usize,
    coverage: Vec<f32>,
    crossings: Vec<f64>,
    /// Sorted by top y.
    edges: Vec<Edge>,
    /// First edge in `edges` not yet moved to `active`.
    next_edge: usize,
    active: Vec<Edge>,
    batch: Vec<Span>,
}

/// A non-horizontal polygon edge with `top.y < bottom.y`.
#[derive(Clone, Copy, Debug)]
struct Edge {
    top: Coord<f64>,
    bottom: Coord<f64>,
}

impl Edge {
    fn new(a: Coord<f64>, b: Coord<f64>) -> Self {
        if a.y < b.y { Self { top: a, bottom: b } } else { Self { top: b, bottom: a } }
    }

    #[inline]
    fn x_at(&self, y: f64) -> f64 {
        self.top.x + (y - self.top.y) * (self.bottom.x - self.top.x) / (self.bottom.y - self.top.y)
    }
}

impl Rasterizer {
    /// A rasterizer clipping to `width` x `height` that hands spans to painters
    /// in batches of at most `capacity`.
    pub fn new(width: u32, height: u32, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            width,
            height,
            capacity,
            coverage: vec![0.0; width as usize],
            crossings: Vec::new(),
            edges: Vec::new(),
            next_edge: 0,
            active: Vec::new(),
            batch: Vec::with_capacity(capacity),
        }
    }

    /// Rasterize `shape`, given in pixel coordinates, into `painter`.
    /// Always ends with one `done = true` call, even when nothing was covered.
    pub fn rasterize<P: Painter>(&mut self, shape: &MultiPolygon<f64>, painter: &mut P) {
        self.batch.clear();
        self.collect_edges(shape);

        if let Some(bounds) = shape.bounding_rect() {
            let y0 = bounds.min().y.floor().max(0.0) as u32;
            let y1 = (bounds.max().y.ceil().max(0.0) as u32).min(self.height);
            for y in y0..y1 {
                self.scan_row(y, painter);
            }
        }

        painter.paint(&mut self.batch, true);
        self.batch.clear();
    }

    fn collect_edges(&mut self, shape: &MultiPolygon<f64>) {
        self.edges.clear();
        self.active.clear();
        self.next_edge = 0;
        for polygon in &shape.0 {
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                for line in ring.lines() {
                    if line.start.y != line.end.y {
                        self.edges.push(Edge::new(line.start, line.end));
                    }
                }
            }
        }
        self.edges.sort_unstable_by(|a, b| a.top.y.total_cmp(&b.top.y));
    }

    fn scan_row<P: Painter>(&mut self, y: u32, painter: &mut P) {
        let width = f64::from(self.width);
        let weight = 1.0 / SUBSAMPLES as f32;
        let (mut lo, mut hi) = (self.width, 0);

        for k in 0..SUBSAMPLES {
            let sy = f64::from(y) + (f64::from(k) + 0.5) / f64::from(SUBSAMPLES);

            // Sample lines only move down, so the active set is updated incrementally.
            while let Some(edge) = self.edges.get(self.next_edge).filter(|edge| edge.top.y <= sy) {
                self.active.push(*edge);
                self.next_edge += 1;
            }
            self.active.retain(|edge| edge.bottom.y > sy);

            self.crossings.clear();
            self.crossings.extend(self.active.iter().map(|edge| edge.x_at(sy)));
            self.crossings.sort_by(f64::total_cmp);

            for pair in self.crossings.chunks_exact(2) {
                let (xa, xb) = (pair[0].clamp(0.0, width), pair[1].clamp(0.0, width));
                if xb <= xa { continue }

                let first = xa.floor() as u32;
                let last = (xb.ceil() as u32).min(self.width);
                for px in first..last {
                    let left = f64::from(px).max(xa);
                    let right = f64::from(px + 1).min(xb);
                    if right > left {
                        self.coverage[px as usize] += (right - left) as f32 * weight;
                    }
                }
                lo = lo.min(first);
                hi = hi.max(last);
            }
        }

        // Run-length encode the touched part of the row, clearing it as we go.
        let mut x = lo;
        while x < hi {
            let value = self.coverage[x as usize];
            let start = x;
            while x < hi && self.coverage[x as usize] == value {
                self.coverage[x as usize] = 0.0;
                x += 1;
            }
            if value > 0.0 {
                self.push(Span::new(y, start, x, value.min(1.0)), painter);
            }
        }
    }

    fn push<P: Painter>(&mut self, span: Span, painter: &mut P) {
        if self.batch.len() == self.capacity {
            painter.paint(&mut self.batch, false);
            self.batch.clear();
        }
        self.batch.push(span);
    }
}
