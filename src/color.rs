use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};
use rusty_cloudy::NodeId;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` evenly spaced hues starting at blue, so a single leaf keeps the
/// familiar plot colour.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    const START_HUE: f32 = 210.0;
    let step = 360.0 / n.max(1) as f32;
    (0..n)
        .map(|i| {
            let hsl = Hsl::new(START_HUE + i as f32 * step, 0.7, 0.55);
            let rgb: Srgb<u8> = Srgb::<f32>::from_color(hsl).into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: partition leaf → Color32
// ---------------------------------------------------------------------------

/// Maps partition leaves to distinct colours, in traversal order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<NodeId, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(leaves: &[NodeId]) -> Self {
        let palette = generate_palette(leaves.len());
        ColorMap {
            mapping: leaves.iter().copied().zip(palette).collect(),
            default_color: Color32::LIGHT_BLUE,
        }
    }

    pub fn color_for(&self, leaf: NodeId) -> Color32 {
        self.mapping
            .get(&leaf)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let colours = generate_palette(4);
        assert_eq!(colours.len(), 4);
        assert_ne!(colours[0], colours[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_leaf_gets_default_colour() {
        let map = ColorMap::new(&[3, 4]);
        assert_ne!(map.color_for(3), map.color_for(4));
        assert_eq!(map.color_for(99), Color32::LIGHT_BLUE);
    }
}
