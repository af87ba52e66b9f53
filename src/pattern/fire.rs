//! Fire simulation
//!
//! One byte of heat per pixel. Every frame the cells cool a little, heat
//! drifts away from the base and new sparks ignite near it. The heat is
//! then mapped onto a three band color ramp.

use embassy_time::Instant;

use super::Pattern;
use crate::{
    buffer::SegmentBuffer,
    color::Rgb,
    math8::{qsub8, scale8},
};

/// Longest supported flame
pub const MAX_FIRE_LEN: usize = 256;
/// Default chance (out of 255) of a new spark each frame
pub const DEFAULT_INTENSITY: u8 = 30;

const MAX_COOLDOWN: u32 = 12;
const SPARK_ZONE: usize = 7;
const MAX_SPARK: u32 = 64;
const DEFAULT_SEED: u64 = 0x5eed_f1a3;

/// Color ramp used to render the heat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePalette {
    /// Black, red, yellow, white
    Warm,
    /// Black, blue, cyan, white
    Cold,
}

/// Small deterministic generator for the flame noise (`SplitMix64`)
#[derive(Debug, Clone)]
pub struct FireRng {
    state: u64,
}

impl FireRng {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub const fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        #[allow(clippy::cast_possible_truncation)]
        {
            ((z ^ (z >> 31)) >> 32) as u32
        }
    }

    /// Uniform-ish value in `0..bound`, 0 when `bound` is 0
    pub const fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32() % bound
    }
}

/// F-f-f-f-flames
#[derive(Debug, Clone)]
pub struct FirePattern {
    heat: [u8; MAX_FIRE_LEN],
    len: usize,
    intensity: u8,
    palette: FirePalette,
    rng: FireRng,
}

impl FirePattern {
    /// Create a warm flame of `length` pixels (capped at [`MAX_FIRE_LEN`])
    pub const fn new(length: usize) -> Self {
        Self::with_palette(length, FirePalette::Warm)
    }

    /// Create a cold (blue) flame of `length` pixels
    pub const fn cold(length: usize) -> Self {
        Self::with_palette(length, FirePalette::Cold)
    }

    const fn with_palette(length: usize, palette: FirePalette) -> Self {
        Self {
            heat: [0; MAX_FIRE_LEN],
            len: if length > MAX_FIRE_LEN {
                MAX_FIRE_LEN
            } else {
                length
            },
            intensity: DEFAULT_INTENSITY,
            palette,
            rng: FireRng::new(DEFAULT_SEED),
        }
    }

    /// Set the spark chance (out of 255)
    #[must_use]
    pub const fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = intensity;
        self
    }

    /// Reseed the flame noise
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.rng = FireRng::new(seed);
        self
    }

    pub const fn palette(&self) -> FirePalette {
        self.palette
    }

    pub const fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Current heat map
    pub fn heat(&self) -> &[u8] {
        &self.heat[..self.len]
    }

    /// Map a heat value onto the flame palette
    pub const fn heat_to_color(&self, heat: u8) -> Rgb {
        // Scale heat down from 0-255 to 0-191
        let t192 = scale8(heat, 191);
        // Ramp within the current third, 0..252
        let ramp = (t192 & 0x3F) << 2;

        match self.palette {
            FirePalette::Warm => {
                if t192 > 0x80 {
                    Rgb::new(255, 255, ramp)
                } else if t192 > 0x40 {
                    Rgb::new(255, ramp, 0)
                } else {
                    Rgb::new(ramp, 0, 0)
                }
            }
            FirePalette::Cold => {
                if t192 > 0x80 {
                    Rgb::new(ramp, 255, 255)
                } else if t192 > 0x40 {
                    Rgb::new(0, ramp, 255)
                } else {
                    Rgb::new(0, 0, ramp)
                }
            }
        }
    }

    /// Advance the simulation by one frame
    #[allow(clippy::cast_possible_truncation)]
    pub fn step(&mut self) {
        let len = self.len;
        if len == 0 {
            return;
        }

        // Cool down every cell a little
        for i in 1..len {
            let cooldown = self.rng.below(MAX_COOLDOWN) as u8;
            self.heat[i] = qsub8(self.heat[i], cooldown);
        }

        // Heat drifts up and diffuses slightly
        for k in (2..len).rev() {
            let sum = u16::from(self.heat[k - 1]) + 2 * u16::from(self.heat[k - 2]);
            self.heat[k] = (sum / 3) as u8;
        }

        // Randomly ignite new sparks near the base
        if self.rng.below(255) < u32::from(self.intensity) {
            let y = self.rng.below(SPARK_ZONE.min(len) as u32) as usize;
            let spark = self.rng.below(MAX_SPARK) as u8;
            // Wraps, so the base never settles at full heat
            self.heat[y] = self.heat[y].wrapping_add(spark);
        }
    }
}

impl Pattern for FirePattern {
    fn initialize(&mut self, _now: Instant, _buffer: &mut SegmentBuffer<'_>) {}

    fn update(&mut self, _now: Instant, buffer: &mut SegmentBuffer<'_>) {
        self.step();
        for i in 1..self.len {
            buffer.set(i, self.heat_to_color(self.heat[i]));
        }
    }
}
