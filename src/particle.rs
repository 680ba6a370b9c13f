// Particle anchored to the pixel it was sampled from. Every frame it is pulled
// back toward that anchor and pushed away from the cursor when it gets close.

use crate::color::Color;
use crate::config::{CoefficientRanges, IdleMode, ParticleConfig};
use crate::surface::Surface;
use crate::utils::random_in_range;
use noise::{NoiseFn, OpenSimplex};
use rand::Rng;
use vecmath::Vector2;

/// Where a particle starts, what it looks like.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSeed {
    pub pos: Vector2<f64>,
    pub color: Color,
    pub radius: f64,
}

impl ParticleSeed {
    pub fn at(x: f64, y: f64) -> Self {
        ParticleSeed {
            pos: [x, y],
            color: Color::GRAY,
            radius: 0.5,
        }
    }
}

/// Per particle motion character, drawn once at construction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coefficients {
    pub cursor_proximity: f64,
    pub push_factor: f64,
    pub pull_factor: f64,
    pub damp_factor: f64,
}

impl Coefficients {
    pub fn draw<R: Rng + ?Sized>(ranges: &CoefficientRanges, rng: &mut R) -> Self {
        let mut pick = |(from, to): (f64, f64)| random_in_range(&mut *rng, from, to);
        Coefficients {
            cursor_proximity: pick(ranges.cursor_proximity),
            push_factor: pick(ranges.push_factor),
            pull_factor: pick(ranges.pull_factor),
            damp_factor: pick(ranges.damp_factor),
        }
    }
}

/// Simplex jitter for particles the cursor can't reach.
pub struct Drift {
    noise: OpenSimplex,
    frequency: f64,
    amplitude: f64,
}

impl Drift {
    pub fn new<R: Rng + ?Sized>(frequency: f64, amplitude: f64, rng: &mut R) -> Self {
        Drift {
            noise: OpenSimplex::new(rng.gen()),
            frequency,
            amplitude,
        }
    }

    /// Never more than `amplitude` either way.
    pub fn offset(&self, x: f64, y: f64) -> f64 {
        let sample = self.noise.get([x * self.frequency, y * self.frequency]);
        self.amplitude * sample.max(-1.0).min(1.0)
    }
}

/// Behaviour shared by every particle of a field.
pub struct Dynamics {
    pub breathe: bool,
    pub drift: Option<Drift>,
}

impl Dynamics {
    pub fn from_config<R: Rng + ?Sized>(config: &ParticleConfig, rng: &mut R) -> Self {
        let drift = match config.idle {
            IdleMode::Rest => None,
            IdleMode::Drift {
                frequency,
                amplitude,
            } => Some(Drift::new(frequency, amplitude, rng)),
        };
        Dynamics {
            breathe: config.breathe,
            drift,
        }
    }

    pub fn still() -> Self {
        Dynamics {
            breathe: false,
            drift: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub acc: Vector2<f64>,
    pub radius: f64,
    pub color: Color,
    initial_pos: Vector2<f64>,
    initial_radius: f64,
    coefficients: Coefficients,
    fill_style: String,
}

impl Particle {
    pub fn new(seed: ParticleSeed, coefficients: Coefficients) -> Particle {
        Particle {
            pos: seed.pos,
            vel: [0.0, 0.0],
            acc: [0.0, 0.0],
            radius: seed.radius,
            color: seed.color,
            initial_pos: seed.pos,
            initial_radius: seed.radius,
            coefficients,
            fill_style: seed.color.to_css(),
        }
    }

    pub fn from_seed<R: Rng + ?Sized>(
        seed: ParticleSeed,
        ranges: &CoefficientRanges,
        rng: &mut R,
    ) -> Particle {
        Particle::new(seed, Coefficients::draw(ranges, rng))
    }

    pub fn initial_pos(&self) -> Vector2<f64> {
        self.initial_pos
    }

    pub fn initial_radius(&self) -> f64 {
        self.initial_radius
    }

    pub fn speed(&self) -> f64 {
        vecmath::vec2_len(self.vel)
    }

    pub fn update(&mut self, cursor: Vector2<f64>, dynamics: &Dynamics) {
        let Coefficients {
            cursor_proximity,
            push_factor,
            pull_factor,
            damp_factor,
        } = self.coefficients;

        // Pull home, proportional to how far the particle has strayed
        let to_home = vecmath::vec2_sub(self.initial_pos, self.pos);
        self.acc = vecmath::vec2_scale(to_home, self.radius * pull_factor);

        // Push away from the cursor while inside its reach. A cursor sitting exactly
        // on the particle has no direction to push in, so it is ignored.
        let from_cursor = vecmath::vec2_sub(self.pos, cursor);
        let distance = vecmath::vec2_len(from_cursor);
        if distance < cursor_proximity {
            if distance > 0.0 {
                let strength = (cursor_proximity - distance) * push_factor;
                let push = vecmath::vec2_scale(from_cursor, strength / distance);
                self.acc = vecmath::vec2_add(self.acc, push);
            }
        } else if let Some(drift) = &dynamics.drift {
            self.pos[0] += drift.offset(self.pos[0], self.pos[1] / self.radius);
            self.pos[1] += drift.offset(self.pos[1], self.pos[0]);
        }

        self.vel = vecmath::vec2_add(self.vel, self.acc);
        self.vel = vecmath::vec2_scale(self.vel, damp_factor);
        self.pos = vecmath::vec2_add(self.pos, self.vel);

        if dynamics.breathe {
            self.radius = (self.initial_radius + (self.vel[0] + self.vel[1]) / 5.0).abs();
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.save();
        surface.translate(self.pos[0], self.pos[1]);
        surface.fill_disc(self.radius, &self.fill_style);
        surface.restore();
    }
}
