use crate::config::Config;
use crate::force::Force;
use crate::geometry::{Circle, Rectangle};
use crate::region_tree::Point;
use crate::trail::Trail;
use crate::types::ParticleId;
use glam::DVec2;
use log::trace;
use rand::Rng;

/// A point mass with a bounded trail of recent positions.
#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Accumulated `force / mass` for the current tick. Reset by [`Particle::update`].
    pub acc: DVec2,
    pub mass: f64,
    pub radius: f64,
    pub trail: Trail,
}

impl Particle {
    pub fn new(pos: DVec2, vel: DVec2, mass: f64, cfg: &Config) -> Self {
        Self {
            pos,
            vel,
            acc: DVec2::ZERO,
            mass,
            radius: Self::radius_for(mass, cfg),
            trail: Trail::with_capacity(cfg.max_path_length),
        }
    }

    pub fn at_rest(pos: DVec2, mass: f64, cfg: &Config) -> Self {
        Self::new(pos, DVec2::ZERO, mass, cfg)
    }

    /// `sqrt(mass) * radius_scale`, capped at `max_radius`.
    pub fn radius_for(mass: f64, cfg: &Config) -> f64 {
        (mass.sqrt() * cfg.radius_scale).min(cfg.max_radius)
    }

    /// Recomputes the radius after the mass was changed.
    pub fn fix_size(&mut self, cfg: &Config) {
        self.radius = Self::radius_for(self.mass, cfg);
    }

    /// Pairwise attraction exerted on `self` by `other`.
    ///
    /// Magnitude is `g * m1 * m2 / d^2` with `d` floored at `softening`.
    /// The direction vector is the offset divided by the same floored `d`, so
    /// below the floor the force shrinks linearly to zero instead of growing.
    pub fn attract(&self, other: &Particle, g: f64, softening: f64) -> Force {
        let delta = other.pos - self.pos;
        let d = delta.length().max(softening);
        // Single product of both masses keeps a.attract(b) == -b.attract(a) bit for bit.
        let magnitude = g * (self.mass * other.mass) / (d * d);

        Force::from_vec(delta / d * magnitude).unwrap_or_else(|| {
            trace!("dropping non-finite attraction between {:?} and {:?}", self.pos, other.pos);
            Force::ZERO
        })
    }

    /// Adds `force / mass` to the acceleration accumulator.
    pub fn apply_force(&mut self, force: Force) {
        if force.is_zero() {
            return;
        }
        self.acc += force.vec() / self.mass;
    }

    /// Advances one step of semi-implicit Euler, then caps the speed, wraps
    /// the position onto the torus, records the trail and clears the
    /// accumulated acceleration.
    ///
    /// ### Returns
    /// `true` if the position wrapped across a domain edge.
    pub fn update(&mut self, dt: f64, cfg: &Config) -> bool {
        self.vel += self.acc * dt;
        self.pos += self.vel * dt;
        self.vel = clamp_speed(self.vel, cfg.max_speed);

        let (pos, wrapped) = wrap_position(self.pos, cfg.world_size());
        self.pos = pos;

        if wrapped {
            self.trail.push_break();
        }
        self.trail.push_point(self.pos);

        self.acc = DVec2::ZERO;
        wrapped
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        self.pos.distance(other.pos)
    }

    /// `true` if the two discs overlap.
    pub fn intersects(&self, other: &Particle) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }

    pub fn to_point(&self, id: ParticleId) -> Point<ParticleId> {
        Point::new(self.pos, id)
    }

    /// `true` if any part of the particle's disc overlaps `viewport`.
    pub fn overlaps_viewport(&self, viewport: &Rectangle) -> bool {
        Circle::centered_at(self.pos, self.radius).intersects_rect(viewport)
    }

    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}

/// Scales `v` down to `max_speed` if it is longer, keeping its direction.
pub fn clamp_speed(v: DVec2, max_speed: f64) -> DVec2 {
    let speed = v.length();
    if speed > max_speed {
        v / speed * max_speed
    } else {
        v
    }
}

/// Maps a position back into `[0, size]` per axis by modulo.
///
/// Coordinates already inside the closed domain are left untouched, so a
/// particle resting exactly on the far edge does not jump to zero.
pub fn wrap_position(pos: DVec2, size: DVec2) -> (DVec2, bool) {
    let (x, wx) = wrap_axis(pos.x, size.x);
    let (y, wy) = wrap_axis(pos.y, size.y);
    (DVec2::new(x, y), wx || wy)
}

fn wrap_axis(v: f64, extent: f64) -> (f64, bool) {
    if v < 0.0 || v > extent {
        (v.rem_euclid(extent), true)
    } else {
        (v, false)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    pub particles: Vec<Particle>,
}

impl ParticleSet {
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Scatters `cfg.particle_count` particles in a square of side
    /// `cfg.spawn_spread` around the world center, with uniform random mass
    /// and velocity. Spawns falling outside the world wrap onto the torus.
    pub fn spawn(cfg: &Config, rng: &mut impl Rng) -> Self {
        let center = cfg.world_center();
        let size = cfg.world_size();

        let particles = (0..cfg.particle_count)
            .map(|_| {
                let offset = DVec2::new(rng.random::<f64>() - 0.5, rng.random::<f64>() - 0.5)
                    * cfg.spawn_spread;
                let (pos, _) = wrap_position(center + offset, size);

                let mass = if cfg.mass_min < cfg.mass_max {
                    rng.random_range(cfg.mass_min..cfg.mass_max)
                } else {
                    cfg.mass_min
                };

                let s = cfg.initial_speed;
                let vel = DVec2::new(rng.random_range(-s..=s), rng.random_range(-s..=s));

                Particle::new(pos, vel, mass, cfg)
            })
            .collect();

        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
