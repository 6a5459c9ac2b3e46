use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Count gradient: low counts navy, high counts maroon
// ---------------------------------------------------------------------------

/// Linear colour ramp used by the ranking charts.
#[derive(Debug, Clone, Copy)]
pub struct CountGradient {
    low: LinSrgb,
    high: LinSrgb,
}

impl Default for CountGradient {
    fn default() -> Self {
        Self::new((0x00, 0x00, 0x80), (0x80, 0x00, 0x00))
    }
}

impl CountGradient {
    pub fn new(low: (u8, u8, u8), high: (u8, u8, u8)) -> Self {
        let lin = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
            Srgb::new(r, g, b).into_format::<f32>().into_linear()
        };
        Self {
            low: lin(low),
            high: lin(high),
        }
    }

    /// Colour for `count` on a scale from 0 to `max`.
    pub fn color_for(&self, count: usize, max: usize) -> Color32 {
        let t = if max == 0 {
            0.0
        } else {
            (count as f32 / max as f32).clamp(0.0, 1.0)
        };
        to_color32(Srgb::from_linear(self.low.mix(self.high, t)))
    }
}

// ---------------------------------------------------------------------------
// Category colours for the map
// ---------------------------------------------------------------------------

/// Maps the distinct values of one dimension to distinct colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(values: &[String]) -> Self {
        let palette = generate_palette(values.len());
        let mapping = values.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}
