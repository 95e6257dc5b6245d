//! Glyph ramps and color gradients.
//!
//! Both lookups take a blend of normalized height and layer factor, so
//! crests and near layers come out denser and brighter.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        Color::Rgb(r, g, b)
    }
}

/// Sparsest to densest, used for points and edges.
pub const SHADE_GLYPHS: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Block densities for filled spans.
pub const FILL_GLYPHS: [char; 4] = ['░', '▒', '▓', '█'];

/// Stands in for the shaded glyph on steep segments.
pub const VERTICAL_GLYPH: char = '|';

pub const PARTICLE_GLYPH: char = '•';
pub const PARTICLE_COLOR: Rgb = Rgb(240, 250, 255);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub threshold: f64,
    pub color: Rgb,
}

const fn stop(threshold: f64, r: u8, g: u8, b: u8) -> ColorStop {
    ColorStop {
        threshold,
        color: Rgb(r, g, b),
    }
}

/// Deep blue through cyan to near white. The last stop catches everything.
pub const OCEAN_GRADIENT: &[ColorStop] = &[
    stop(0.15, 30, 50, 120),
    stop(0.30, 50, 80, 160),
    stop(0.45, 70, 120, 200),
    stop(0.60, 100, 160, 220),
    stop(0.75, 140, 200, 235),
    stop(0.90, 180, 225, 245),
    stop(2.00, 220, 245, 255),
];

pub const GREYSCALE_GRADIENT: &[ColorStop] = &[
    stop(0.20, 60, 60, 60),
    stop(0.40, 100, 100, 100),
    stop(0.60, 145, 145, 145),
    stop(0.80, 195, 195, 195),
    stop(2.00, 245, 245, 245),
];

pub fn line_shade(normalized_z: f64, layer_factor: f64) -> f64 {
    normalized_z * 0.7 + layer_factor * 0.3
}

pub fn fill_shade(normalized_z: f64, layer_factor: f64) -> f64 {
    normalized_z * 0.6 + layer_factor * 0.4
}

/// Position of `shade` on a ramp of `len` entries. `shade` is clamped first.
pub fn glyph_index(shade: f64, len: usize) -> usize {
    let last = len.saturating_sub(1);
    let idx = (shade.clamp(0.0, 1.0) * last as f64).floor() as usize;
    idx.min(last)
}

/// # Panics
/// Panics if `palette` is empty.
pub fn glyph_for(shade: f64, palette: &[char]) -> char {
    palette[glyph_index(shade, palette.len())]
}

pub fn shade_glyph(normalized_z: f64, layer_factor: f64) -> char {
    glyph_for(line_shade(normalized_z, layer_factor), &SHADE_GLYPHS)
}

pub fn fill_glyph(normalized_z: f64, layer_factor: f64) -> char {
    glyph_for(fill_shade(normalized_z, layer_factor), &FILL_GLYPHS)
}

/// First stop whose threshold exceeds `t`, else the last one.
pub fn gradient_index(t: f64, stops: &[ColorStop]) -> usize {
    stops
        .iter()
        .position(|s| t < s.threshold)
        .unwrap_or(stops.len().saturating_sub(1))
}

/// # Panics
/// Panics if `stops` is empty.
pub fn color_for(normalized_z: f64, layer_factor: f64, stops: &[ColorStop]) -> Rgb {
    let t = normalized_z * 0.6 + layer_factor * 0.4;
    stops[gradient_index(t, stops)].color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_ends() {
        assert_eq!(shade_glyph(0.0, 0.0), ' ');
        assert_eq!(shade_glyph(1.0, 1.0), '@');
        assert_eq!(fill_glyph(0.0, 0.0), '░');
        assert_eq!(fill_glyph(1.0, 1.0), '█');
    }

    #[test]
    fn out_of_range_shade_is_clamped() {
        assert_eq!(glyph_for(-0.3, &SHADE_GLYPHS), ' ');
        assert_eq!(glyph_for(1.0000001, &SHADE_GLYPHS), '@');
        assert_eq!(glyph_for(f64::INFINITY, &FILL_GLYPHS), '█');
    }

    #[test]
    fn index_floors() {
        // 0.5 * 9 = 4.5
        assert_eq!(glyph_index(0.5, 10), 4);
        assert_eq!(glyph_index(0.34, 4), 1);
        assert_eq!(glyph_index(0.7, 1), 0);
    }

    #[test]
    fn gradient_walks_stops() {
        assert_eq!(color_for(0.0, 0.0, OCEAN_GRADIENT), Rgb(30, 50, 120));
        // t = 0.5 * 0.6 + 0.5 * 0.4 = 0.5
        assert_eq!(color_for(0.5, 0.5, OCEAN_GRADIENT), Rgb(100, 160, 220));
        assert_eq!(color_for(1.0, 1.0, OCEAN_GRADIENT), Rgb(220, 245, 255));
        assert_eq!(gradient_index(5.0, OCEAN_GRADIENT), OCEAN_GRADIENT.len() - 1);
    }

    #[test]
    fn greyscale_is_a_drop_in() {
        assert_eq!(color_for(1.0, 1.0, GREYSCALE_GRADIENT), Rgb(245, 245, 245));
        assert_eq!(color_for(0.0, 0.0, GREYSCALE_GRADIENT), Rgb(60, 60, 60));
    }

    #[test]
    fn rgb_into_terminal_color() {
        assert_eq!(Color::from(Rgb(1, 2, 3)), Color::Rgb(1, 2, 3));
    }
}
