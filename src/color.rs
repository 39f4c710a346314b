use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Colour maps
// ---------------------------------------------------------------------------

/// Matplotlib's inferno sampled at eleven evenly spaced stops.
const INFERNO_STOPS: [[u8; 3]; 11] = [
    [0x00, 0x00, 0x04],
    [0x16, 0x0b, 0x39],
    [0x42, 0x0a, 0x68],
    [0x6a, 0x17, 0x6e],
    [0x93, 0x26, 0x67],
    [0xbc, 0x37, 0x54],
    [0xdd, 0x51, 0x3a],
    [0xf3, 0x78, 0x19],
    [0xfc, 0xa5, 0x0a],
    [0xf6, 0xd7, 0x46],
    [0xfc, 0xff, 0xa4],
];

/// Continuous colour maps available to the contour panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColormapKind {
    /// Perceptually uniform black → purple → orange → pale yellow.
    Inferno,
    /// Hue sweep from violet to red.
    Rainbow,
}

impl ColormapKind {
    /// Colour at `t` in `[0, 1]`; out-of-range input is clamped.
    pub fn sample(self, t: f32) -> Color32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            ColormapKind::Inferno => sample_stops(&INFERNO_STOPS, t),
            ColormapKind::Rainbow => {
                let hsl = Hsl::new(270.0 * (1.0 - t), 1.0, 0.5);
                let rgb: Srgb = hsl.into_color();
                to_color32(rgb)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColormapKind::Inferno => "inferno",
            ColormapKind::Rainbow => "rainbow",
        }
    }
}

/// Interpolate between neighbouring stops in linear RGB.
fn sample_stops(stops: &[[u8; 3]], t: f32) -> Color32 {
    let scaled = t * (stops.len() - 1) as f32;
    let lower = (scaled.floor() as usize).min(stops.len() - 1);
    let upper = (lower + 1).min(stops.len() - 1);
    let frac = scaled - lower as f32;

    let a = stop_to_linear(stops[lower]);
    let b = stop_to_linear(stops[upper]);
    to_color32(Srgb::from_linear(a.mix(b, frac)))
}

fn stop_to_linear([r, g, b]: [u8; 3]) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}
