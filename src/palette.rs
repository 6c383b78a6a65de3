//! Display colors for cluster centers.
//!
//! Colors are generated rather than drawn from a fixed list, so any number
//! of centers gets its own color. Hues are spaced by the golden ratio, which
//! keeps neighbouring center indices visually apart.

use ndarray::ArrayView2;
use plotters::style::{Color, HSLColor, RGBColor};
use std::collections::BTreeMap;

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;
const SATURATION: f64 = 0.65;
const LIGHTNESS: f64 = 0.5;

/// Color for the center with the given index
pub fn color_for_index(index: usize) -> RGBColor {
    let hue = (index as f64 * GOLDEN_RATIO_CONJUGATE).fract();
    let rgba = HSLColor(hue, SATURATION, LIGHTNESS).to_rgba();
    RGBColor(rgba.0, rgba.1, rgba.2)
}

/// One color per center, in center order
pub fn colors_for_centers(centers: &ArrayView2<f64>) -> Vec<RGBColor> {
    (0..centers.nrows()).map(color_for_index).collect()
}

/// Colors for centers that already carry an identifier
pub fn colors_for_ids(ids: &[usize]) -> BTreeMap<usize, RGBColor> {
    ids.iter().map(|&id| (id, color_for_index(id))).collect()
}

/// `#rrggbb` form of a color, for templates and other text outputs
pub fn to_hex(color: &RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}
