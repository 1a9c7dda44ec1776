use std::collections::HashMap;

use crate::{foundation::core::Rgba8, frame::indexed::Palette};

/// Map each pixel to its nearest palette entry.
///
/// Fully transparent pixels go to the palette's transparent slot when it has one. Every other
/// pixel goes to the closest non-slot entry by squared RGBA distance, lowest index on ties; a
/// palette holding only the slot maps everything to it. `pixels` must be empty when `palette`
/// is.
pub fn map_to_palette(pixels: &[Rgba8], palette: &Palette) -> Vec<u8> {
    let slot = palette.transparent_slot();
    let mut cache = HashMap::<Rgba8, u8>::new();
    pixels
        .iter()
        .map(|&p| {
            if p[3] == 0
                && let Some(slot) = slot
            {
                return slot;
            }
            *cache.entry(p).or_insert_with(|| nearest(p, palette))
        })
        .collect()
}

fn nearest(color: Rgba8, palette: &Palette) -> u8 {
    let slot = palette.transparent_slot();
    let mut best = slot.unwrap_or(0);
    let mut best_dist = u32::MAX;
    for (i, &entry) in palette.colors().iter().enumerate() {
        let i = i as u8;
        if Some(i) == slot {
            continue;
        }
        let d = distance_sq(color, entry);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

fn distance_sq(a: Rgba8, b: Rgba8) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mapping.rs"]
mod tests;
