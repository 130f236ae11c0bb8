//! Colors shared by the interactive and static renderers, as plain RGB.

pub type Rgb = (u8, u8, u8);

/// One color per bar/box position, cool to warm like the source figures.
pub const CATEGORY_COLORS: [Rgb; 5] = [
    (91, 155, 213),  // Blue
    (112, 173, 71),  // Green
    (237, 125, 49),  // Orange
    (155, 89, 182),  // Purple
    (149, 165, 166), // Grey
];

/// Line colors, indexed by series position.
pub const SERIES_COLORS: [Rgb; 4] = [
    (52, 152, 219), // Blue
    (231, 76, 60),  // Red
    (46, 204, 113), // Green
    (243, 156, 18), // Orange
];

pub const MISSING: Rgb = (200, 200, 200);

const COOL: Rgb = (59, 76, 192);
const NEUTRAL: Rgb = (221, 221, 221);
const WARM: Rgb = (180, 4, 38);

pub fn category_color(index: usize) -> Rgb {
    CATEGORY_COLORS[index % CATEGORY_COLORS.len()]
}

pub fn series_color(index: usize) -> Rgb {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Diverging color for a correlation in [-1, 1]; `NaN` is grey.
pub fn coolwarm(value: f64) -> Rgb {
    if value.is_nan() {
        return MISSING;
    }
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        lerp(NEUTRAL, COOL, -v)
    } else {
        lerp(NEUTRAL, WARM, v)
    }
}

/// Dark text on light cells, light text on saturated ones.
pub fn text_on(value: f64) -> Rgb {
    if value.is_nan() || value.abs() < 0.6 {
        (30, 30, 30)
    } else {
        (255, 255, 255)
    }
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    (mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}
