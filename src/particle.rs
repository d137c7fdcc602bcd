//! Decorative particle styling — randomized once at page load.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Style assigned to one particle element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleStyle {
    /// Square side length in px.
    pub size_px: f64,
    /// Float animation duration in seconds.
    pub duration_secs: f64,
}

/// Style `count` particles: sizes in [2, 6) px, durations in [5, 15) s.
pub fn style_particles<R: Rng>(count: usize, rng: &mut R) -> Vec<ParticleStyle> {
    (0..count)
        .map(|_| ParticleStyle {
            size_px: rng.gen_range(2.0..6.0),
            duration_secs: rng.gen_range(5.0..15.0),
        })
        .collect()
}

/// Seeded variant so a page can reproduce a layout across reloads.
pub fn seeded_styles(count: usize, seed: u64) -> Vec<ParticleStyle> {
    let mut rng = StdRng::seed_from_u64(seed);
    style_particles(count, &mut rng)
}
