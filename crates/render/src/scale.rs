use crate::palette::{Palette, Rgb};

/// Evenly divides a pixel range into `count` touching bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    range: (f64, f64),
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64)) -> Self {
        Self { count, range }
    }

    pub fn step(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.range.1 - self.range.0) / self.count as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.step()
    }

    pub fn position(&self, pos: usize) -> f64 {
        self.range.0 + self.step() * pos as f64
    }

    pub fn center(&self, pos: usize) -> f64 {
        self.position(pos) + self.bandwidth() / 2.0
    }

    /// Band containing pixel `y`, if any.
    pub fn invert(&self, y: f64) -> Option<usize> {
        let step = self.step();
        if step <= 0.0 || y < self.range.0 || y >= self.range.1 {
            return None;
        }
        let pos = ((y - self.range.0) / step).floor() as usize;
        (pos < self.count).then_some(pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return self.range.0;
        }
        let t = (value - self.domain.0) / span;
        self.range.0 + t * (self.range.1 - self.range.0)
    }
}

/// Maps `[0, max]` onto a sequential palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialScale {
    max: f64,
    palette: Palette,
}

impl SequentialScale {
    /// `max` must already be clamped away from zero
    /// (see `flowmap_index::weight_domain_max`).
    pub fn new(palette: Palette, max: f64) -> Self {
        Self { max, palette }
    }

    pub fn color(&self, value: f64) -> Rgb {
        self.palette.interpolate(value / self.max)
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }
}
