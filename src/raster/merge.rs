use super::span::{Painter, Span};

/// The opaque run being accumulated, not yet handed downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Run {
    y: u32,
    x0: u32,
    x1: u32,
}

impl Run {
    #[inline]
    fn of(span: &Span) -> Self { Self { y: span.y, x0: span.x0, x1: span.x1 } }

    #[inline]
    fn touches(&self, span: &Span) -> bool { self.y == span.y && self.x1 == span.x0 }

    #[inline]
    fn span(self) -> Span { Span::opaque(self.y, self.x0, self.x1) }
}

/// Wraps another painter, quantizing every span's coverage to fully opaque or
/// fully transparent and merging touching opaque spans on the same row.
///
/// The open run is carried between calls, so a run that continues into the next
/// batch is still emitted once. The final run is only emitted on `done`.
#[derive(Debug)]
pub struct SpanMerger<P> {
    inner: P,
    run: Option<Run>,
}

impl<P: Painter> SpanMerger<P> {
    pub fn new(inner: P) -> Self { Self { inner, run: None } }

    #[inline] pub fn inner(&self) -> &P { &self.inner }

    #[inline] pub fn into_inner(self) -> P { self.inner }
}

impl<P: Painter> Painter for SpanMerger<P> {
    fn paint(&mut self, spans: &mut [Span], done: bool) {
        // Compact in place: every flushed run lands at or before the span that caused it.
        let mut j = 0;
        for i in 0..spans.len() {
            let span = spans[i];
            if !span.is_opaque() { continue }

            if let Some(run) = self.run.as_mut().filter(|run| run.touches(&span)) {
                run.x1 = span.x1;
                continue;
            }
            if let Some(previous) = self.run.replace(Run::of(&span)) {
                spans[j] = previous.span();
                j += 1;
            }
        }

        if !done {
            self.inner.paint(&mut spans[..j], false);
            return;
        }

        // Taking the run resets the merger for the next image.
        match self.run.take() {
            None => self.inner.paint(&mut spans[..j], true),
            Some(last) if j < spans.len() => {
                spans[j] = last.span();
                self.inner.paint(&mut spans[..=j], true);
            }
            Some(last) => {
                // No room left in the caller's buffer: the last run goes out on its own.
                self.inner.paint(spans, false);
                self.inner.paint(&mut [last.span()], true);
            }
        }
    }
}
