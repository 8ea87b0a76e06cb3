//! Tick orchestration over a particle set and its region tree.

use crate::{
    config::Config,
    error::{Result, SimError},
    force_buffer::ForceBuffer,
    geometry::Rectangle,
    particle::{Particle, ParticleSet},
    phases,
    region_tree::RegionTree,
    types::ParticleId,
};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Counters describing one call to [`Simulation::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub inserted: usize,
    pub candidates: u64,
    pub interactions: u64,
    pub skipped: u64,
    pub wraps: usize,
}

/// Owns the particles, the region tree and the per-tick scratch buffers.
///
/// The host drives it with [`Simulation::tick`] once per frame and reads
/// positions, radii and trails back through [`Simulation::particles`].
#[derive(Debug)]
pub struct Simulation {
    cfg: Config,
    particles: ParticleSet,
    tree: RegionTree<ParticleId>,
    acc: ForceBuffer,
    ticks: u64,
    elapsed: f64,
}

impl Simulation {
    /// Validates `cfg` and spawns `cfg.particle_count` random particles.
    ///
    /// Uses a seeded [`StdRng`] when `cfg.seed` is set, the thread rng otherwise.
    pub fn new(cfg: Config) -> Result<Self> {
        match cfg.seed {
            Some(seed) => Self::with_rng(cfg, &mut StdRng::seed_from_u64(seed)),
            None => Self::with_rng(cfg, &mut rand::rng()),
        }
    }

    pub fn with_rng(cfg: Config, rng: &mut impl Rng) -> Result<Self> {
        cfg.validate()?;
        let particles = ParticleSet::spawn(&cfg, rng);
        Ok(Self::build(cfg, particles))
    }

    /// Starts from explicit particles. `cfg.particle_count` is ignored.
    pub fn from_particles(cfg: Config, particles: Vec<Particle>) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::build(cfg, ParticleSet::from_particles(particles)))
    }

    fn build(cfg: Config, particles: ParticleSet) -> Self {
        if cfg.query_narrower_than_range() {
            warn!(
                "query radius {} is smaller than effective range {}; partners in between are never found",
                cfg.effective_query_radius(),
                cfg.effective_range
            );
        }
        debug!(
            "simulation with {} particles in {}x{} world, query radius {}",
            particles.len(),
            cfg.world_width,
            cfg.world_height,
            cfg.effective_query_radius()
        );

        let tree = RegionTree::new(cfg.world_boundary(), cfg.node_capacity);
        let acc = ForceBuffer::with_len(particles.len());
        Self {
            cfg,
            particles,
            tree,
            acc,
            ticks: 0,
            elapsed: 0.0,
        }
    }

    /// Advances the simulation by `dt`.
    ///
    /// Runs the rebuild, force, apply and integration phases in that order.
    ///
    /// ### Parameters
    /// - `dt` - Time step; zero is allowed and only rebuilds and records trails.
    ///
    /// ### Returns
    /// Counters for this tick, see [`TickStats`].
    ///
    /// ### Errors
    /// - [`SimError::InvalidTimestep`] if `dt` is negative or not finite.
    /// - [`SimError::OutOfDomain`] if a particle could not be indexed. The
    ///   particles are left untouched in that case.
    pub fn tick(&mut self, dt: f64) -> Result<TickStats> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(SimError::InvalidTimestep(dt));
        }

        let inserted = phases::rebuild_phase(&mut self.tree, &self.particles)?;
        let forces = phases::force_phase(&self.tree, &self.particles, &self.cfg, &mut self.acc);
        phases::apply_phase(&mut self.particles, &self.acc);
        let wraps = phases::integration_phase(&mut self.particles, &self.cfg, dt);

        self.ticks += 1;
        self.elapsed += dt;

        let stats = TickStats {
            inserted,
            candidates: forces.candidates,
            interactions: forces.interactions,
            skipped: forces.skipped,
            wraps,
        };
        trace!("tick {}: {:?}", self.ticks, stats);
        Ok(stats)
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// The tree as built by the last tick.
    pub fn tree(&self) -> &RegionTree<ParticleId> {
        &self.tree
    }

    pub fn world_boundary(&self) -> Rectangle {
        self.cfg.world_boundary()
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Particles whose disc overlaps `viewport`, with their ids.
    pub fn visible_particles<'a>(
        &'a self,
        viewport: &'a Rectangle,
    ) -> impl Iterator<Item = (ParticleId, &'a Particle)> + 'a {
        self.particles
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.overlaps_viewport(viewport))
    }
}
