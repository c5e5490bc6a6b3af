//! Initial placement and colour for new bubbles.
//!
//! Positions fall inside the default canvas, velocities are small enough to keep any downstream
//! animation calm, and colours are pastel HSL tones. Calls are independent: bubbles may start on
//! top of one another.

use crate::properties::Layout;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::ops::RangeInclusive;

pub const X_RANGE: RangeInclusive<f64> = 50.0..=800.0;
pub const Y_RANGE: RangeInclusive<f64> = 50.0..=600.0;
pub const VELOCITY_RANGE: RangeInclusive<f64> = -2.0..=2.0;
pub const SATURATION_RANGE: RangeInclusive<f64> = 60.0..=100.0;
pub const LIGHTNESS_RANGE: RangeInclusive<f64> = 60.0..=80.0;
/// Hue is drawn from the half-open interval `[0, HUE_MAX)`.
pub const HUE_MAX: f64 = 360.0;

/// Source of bubble layouts.
#[derive(Debug, Clone)]
pub struct LayoutGenerator<R: Rng = StdRng> {
    rng: R,
}

impl Default for LayoutGenerator<StdRng> {
    fn default() -> Self {
        LayoutGenerator {
            rng: StdRng::from_entropy(),
        }
    }
}

impl LayoutGenerator<StdRng> {
    /// A reproducible generator, for tests and benchmarks.
    pub fn seeded(seed: u64) -> Self {
        LayoutGenerator {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> LayoutGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        LayoutGenerator { rng }
    }

    pub fn new_layout(&mut self) -> Layout {
        let x = self.rng.gen_range(X_RANGE);
        let y = self.rng.gen_range(Y_RANGE);
        let vx = self.rng.gen_range(VELOCITY_RANGE);
        let vy = self.rng.gen_range(VELOCITY_RANGE);
        let color = self.pastel_color();
        Layout {
            x,
            y,
            vx,
            vy,
            color,
        }
    }

    /// `hsl(H, S%, L%)` with a uniform hue and a pastel saturation/lightness band.
    pub fn pastel_color(&mut self) -> String {
        let hue = self.rng.gen_range(0.0..HUE_MAX);
        let saturation = self.rng.gen_range(SATURATION_RANGE);
        let lightness = self.rng.gen_range(LIGHTNESS_RANGE);
        format_hsl(hue, saturation, lightness)
    }
}

pub fn format_hsl(hue: f64, saturation: f64, lightness: f64) -> String {
    format!("hsl({hue:.2}, {saturation:.1}%, {lightness:.1}%)")
}
