//! Palette selection for indexed frames.
//!
//! [`Quantizer`] is the seam: the delta encoder only asks for "at most N colors for these
//! pixels, with or without a transparent slot" and never looks at how the palette was built.
//! [`MedianCut`] is the stock implementation.

use std::collections::HashMap;

use crate::{
    foundation::core::Rgba8,
    foundation::error::{GifFramesError, GifFramesResult},
    frame::indexed::{MAX_PALETTE_LEN, Palette},
};

/// Reduces a pixel set to a bounded [`Palette`].
pub trait Quantizer: Send + Sync {
    /// Build a palette of at most `max_colors` entries for `pixels`.
    ///
    /// When `reserve_transparent` is set, one of those entries is a fully transparent slot and
    /// fully transparent pixels are left out of color selection.
    fn quantize(
        &self,
        pixels: &[Rgba8],
        max_colors: usize,
        reserve_transparent: bool,
    ) -> GifFramesResult<Palette>;
}

/// How a median-cut bucket is collapsed to one palette color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Pixel-weighted mean of the bucket, rounded per channel.
    #[default]
    Mean,
    /// Most frequent color of the bucket.
    Mode,
}

/// Median-cut quantizer over RGBA space.
#[derive(Clone, Copy, Debug, Default)]
pub struct MedianCut {
    /// Bucket representative strategy.
    pub aggregation: Aggregation,
}

impl MedianCut {
    /// Median cut with the given aggregation.
    pub fn new(aggregation: Aggregation) -> Self {
        Self { aggregation }
    }
}

#[derive(Clone, Copy, Debug)]
struct Bucket {
    start: usize,
    end: usize,
}

impl Quantizer for MedianCut {
    fn quantize(
        &self,
        pixels: &[Rgba8],
        max_colors: usize,
        reserve_transparent: bool,
    ) -> GifFramesResult<Palette> {
        if max_colors == 0 || max_colors > MAX_PALETTE_LEN {
            return Err(GifFramesError::validation(format!(
                "max_colors must be within 1..={MAX_PALETTE_LEN}, got {max_colors}"
            )));
        }
        let budget = max_colors - usize::from(reserve_transparent);

        let mut hist = HashMap::<Rgba8, u32>::new();
        for &p in pixels {
            if reserve_transparent && p[3] == 0 {
                continue;
            }
            *hist.entry(p).or_insert(0) += 1;
        }
        let mut entries: Vec<(Rgba8, u32)> = hist.into_iter().collect();
        entries.sort_unstable_by_key(|&(c, _)| c);

        let mut buckets = Vec::<Bucket>::new();
        if !entries.is_empty() && budget > 0 {
            buckets.push(Bucket {
                start: 0,
                end: entries.len(),
            });
        }
        while buckets.len() < budget {
            let Some(pick) = widest_bucket(&entries, &buckets) else {
                break;
            };
            let Bucket { start, end } = buckets[pick];
            let channel = widest_channel(&entries[start..end]);
            let split = median_split(&mut entries[start..end], channel) + start;
            buckets[pick] = Bucket { start, end: split };
            buckets.insert(pick + 1, Bucket { start: split, end });
        }

        let mut colors = Vec::<Rgba8>::with_capacity(buckets.len() + 1);
        for b in &buckets {
            let rep = match self.aggregation {
                Aggregation::Mean => mean_color(&entries[b.start..b.end]),
                Aggregation::Mode => mode_color(&entries[b.start..b.end]),
            };
            if !colors.contains(&rep) {
                colors.push(rep);
            }
        }

        if reserve_transparent {
            Palette::with_transparent_slot(colors)
        } else {
            Palette::new(colors)
        }
    }
}

fn channel_range(entries: &[(Rgba8, u32)], channel: usize) -> u8 {
    let (lo, hi) = entries
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
            (lo.min(c[channel]), hi.max(c[channel]))
        });
    hi.saturating_sub(lo)
}

fn widest_channel(entries: &[(Rgba8, u32)]) -> usize {
    let mut best = 0usize;
    let mut best_range = 0u8;
    for ch in 0..4 {
        let r = channel_range(entries, ch);
        if r > best_range {
            best = ch;
            best_range = r;
        }
    }
    best
}

/// Splittable bucket with the widest channel range; ties prefer more pixels, then lower index.
fn widest_bucket(entries: &[(Rgba8, u32)], buckets: &[Bucket]) -> Option<usize> {
    let mut best: Option<(usize, u8, u64)> = None;
    for (i, b) in buckets.iter().enumerate() {
        if b.end - b.start < 2 {
            continue;
        }
        let slice = &entries[b.start..b.end];
        let range = channel_range(slice, widest_channel(slice));
        let weight: u64 = slice.iter().map(|&(_, n)| u64::from(n)).sum();
        let better = match best {
            None => true,
            Some((_, r, w)) => range > r || (range == r && weight > w),
        };
        if better {
            best = Some((i, range, weight));
        }
    }
    best.map(|(i, _, _)| i)
}

/// Sort by `channel` and return the weighted-median split point, always leaving both halves
/// non-empty.
fn median_split(entries: &mut [(Rgba8, u32)], channel: usize) -> usize {
    entries.sort_unstable_by_key(|&(c, _)| (c[channel], c));
    let total: u64 = entries.iter().map(|&(_, n)| u64::from(n)).sum();
    let half = total.div_ceil(2);
    let mut acc = 0u64;
    let mut split = entries.len() / 2;
    for (i, &(_, n)) in entries.iter().enumerate() {
        acc += u64::from(n);
        if acc >= half {
            split = i + 1;
            break;
        }
    }
    split.clamp(1, entries.len() - 1)
}

fn mean_color(entries: &[(Rgba8, u32)]) -> Rgba8 {
    let mut sums = [0u64; 4];
    let mut total = 0u64;
    for &(c, n) in entries {
        let n = u64::from(n);
        for ch in 0..4 {
            sums[ch] += u64::from(c[ch]) * n;
        }
        total += n;
    }
    let mut out = [0u8; 4];
    for ch in 0..4 {
        out[ch] = ((sums[ch] + total / 2) / total) as u8;
    }
    out
}

fn mode_color(entries: &[(Rgba8, u32)]) -> Rgba8 {
    let mut best = entries[0];
    for &e in &entries[1..] {
        if e.1 > best.1 || (e.1 == best.1 && e.0 < best.0) {
            best = e;
        }
    }
    best.0
}

#[cfg(test)]
#[path = "../../tests/unit/encode/quantize.rs"]
mod tests;
