// The set of particles currently on screen, rebuilt whenever a new image comes in

use crate::config::ParticleConfig;
use crate::particle::{Dynamics, Particle, ParticleSeed};
use crate::surface::Surface;
use rand::Rng;
use vecmath::Vector2;

pub struct ParticleField {
    config: ParticleConfig,
    dynamics: Dynamics,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(config: ParticleConfig, rng: &mut R) -> Self {
        ParticleField {
            dynamics: Dynamics::from_config(&config, rng),
            config,
            particles: Vec::new(),
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Swaps the motion settings. Existing particles keep their coefficients.
    pub fn reconfigure<R: Rng + ?Sized>(&mut self, config: ParticleConfig, rng: &mut R) {
        self.dynamics = Dynamics::from_config(&config, rng);
        self.config = config;
    }

    /// Throws away the current particles and builds one per seed, in seed order.
    pub fn rebuild<R: Rng + ?Sized>(&mut self, seeds: Vec<ParticleSeed>, rng: &mut R) {
        let ranges = self.config.ranges;
        self.particles = seeds
            .into_iter()
            .map(|seed| Particle::from_seed(seed, &ranges, &mut *rng))
            .collect();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn update(&mut self, cursor: Vector2<f64>) {
        for particle in &mut self.particles {
            particle.update(cursor, &self.dynamics);
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for particle in &self.particles {
            particle.draw(surface);
        }
    }

    /// One full pass: clear, then update and draw each particle in turn.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S, cursor: Vector2<f64>) {
        surface.clear();
        let dynamics = &self.dynamics;
        for particle in &mut self.particles {
            particle.update(cursor, dynamics);
            particle.draw(surface);
        }
    }
}
