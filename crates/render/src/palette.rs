use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn hex(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

const BLUES: [Rgb; 9] = [
    Rgb::hex(0xf7fbff),
    Rgb::hex(0xdeebf7),
    Rgb::hex(0xc6dbef),
    Rgb::hex(0x9ecae1),
    Rgb::hex(0x6baed6),
    Rgb::hex(0x4292c6),
    Rgb::hex(0x2171b5),
    Rgb::hex(0x08519c),
    Rgb::hex(0x08306b),
];

const PURPLES: [Rgb; 9] = [
    Rgb::hex(0xfcfbfd),
    Rgb::hex(0xefedf5),
    Rgb::hex(0xdadaeb),
    Rgb::hex(0xbcbddc),
    Rgb::hex(0x9e9ac8),
    Rgb::hex(0x807dba),
    Rgb::hex(0x6a51a3),
    Rgb::hex(0x54278f),
    Rgb::hex(0x3f007d),
];

const RD_PU: [Rgb; 9] = [
    Rgb::hex(0xfff7f3),
    Rgb::hex(0xfde0dd),
    Rgb::hex(0xfcc5c0),
    Rgb::hex(0xfa9fb5),
    Rgb::hex(0xf768a1),
    Rgb::hex(0xdd3497),
    Rgb::hex(0xae017e),
    Rgb::hex(0x7a0177),
    Rgb::hex(0x49006a),
];

/// Sequential single-hue palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Input nodes and copy edges.
    Blues,
    /// Output nodes.
    Purples,
    /// Non-copy edges.
    RdPu,
}

impl Palette {
    fn stops(self) -> &'static [Rgb; 9] {
        match self {
            Palette::Blues => &BLUES,
            Palette::Purples => &PURPLES,
            Palette::RdPu => &RD_PU,
        }
    }

    /// Piecewise-linear interpolation across the palette stops; `t` is
    /// clamped to `[0, 1]`.
    pub fn interpolate(self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (stops.len() - 1) as f64;
        let lower = scaled.floor() as usize;
        if lower >= stops.len() - 1 {
            return stops[stops.len() - 1];
        }
        stops[lower].lerp(stops[lower + 1], scaled - lower as f64)
    }
}
