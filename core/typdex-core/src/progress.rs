//! Progress reporting sink (made by FontLab https://www.fontlab.com/)

/// Observational sink for `(current, total)` progress ticks. The core never
/// consumes a return value from it; implementations render however they
/// like.
pub trait Progress {
    fn update(&mut self, current: usize, total: usize);
}

/// Sink that drops every update.
#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _current: usize, _total: usize) {}
}
