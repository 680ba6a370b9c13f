// Tunables for the effect, every field has the default the page ships with

/// Half-open ranges each particle draws its motion coefficients from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoefficientRanges {
    pub cursor_proximity: (f64, f64),
    pub push_factor: (f64, f64),
    pub pull_factor: (f64, f64),
    pub damp_factor: (f64, f64),
}

impl Default for CoefficientRanges {
    fn default() -> Self {
        CoefficientRanges {
            cursor_proximity: (100.0, 200.0),
            push_factor: (0.01, 0.02),
            pull_factor: (0.002, 0.006),
            damp_factor: (0.8, 0.95),
        }
    }
}

/// What a particle does while the cursor is out of its reach.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum IdleMode {
    /// Only the pull home acts on it.
    Rest,
    /// Jitter by simplex noise sampled at the particle's own coordinates.
    Drift { frequency: f64, amplitude: f64 },
}

impl IdleMode {
    pub fn drift() -> Self {
        IdleMode::Drift {
            frequency: 0.1,
            amplitude: 0.4,
        }
    }
}

impl Default for IdleMode {
    fn default() -> Self {
        IdleMode::Rest
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub ranges: CoefficientRanges,
    pub idle: IdleMode,
    // radius follows velocity when set
    pub breathe: bool,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        ParticleConfig {
            ranges: CoefficientRanges::default(),
            idle: IdleMode::default(),
            breathe: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EffectConfig {
    pub fps: f64,
    pub target_width: f64,
    /// Luminance (0..=255) a pixel has to exceed to become a particle.
    pub color_threshold: f64,
    pub particle: ParticleConfig,
}

impl Default for EffectConfig {
    fn default() -> Self {
        EffectConfig {
            fps: 40.0,
            target_width: 800.0,
            color_threshold: 50.0,
            particle: ParticleConfig::default(),
        }
    }
}

impl EffectConfig {
    /// Milliseconds to wait between frames, never less than one.
    pub fn frame_interval_ms(&self) -> i32 {
        frame_interval_ms(self.fps)
    }
}

pub fn frame_interval_ms(fps: f64) -> i32 {
    if fps.is_finite() && fps > 0.0 {
        ((1000.0 / fps).round() as i32).max(1)
    } else {
        1
    }
}
