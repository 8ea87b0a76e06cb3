//! Per-tick simulation phases.
//!
//! One tick runs, strictly in order:
//! 1. [`rebuild_phase`]: clear the region tree and insert every particle.
//! 2. [`force_phase`]: for each particle, query the tree around it and sum
//!    the attraction of every partner within the effective range into a
//!    [`ForceBuffer`]. The tree and the particles are only read here.
//! 3. [`apply_phase`]: move each buffered net force into its particle's
//!    acceleration accumulator.
//! 4. [`integration_phase`]: integrate, cap speed, wrap and record trails.
//!
//! The tree is complete before any query starts, and all forces are
//! collected before any particle moves.

use crate::{
    config::Config,
    error::{Result, SimError},
    force::Force,
    force_buffer::ForceBuffer,
    geometry::{Circle, Shape},
    particle::ParticleSet,
    region_tree::{Point, RegionTree},
    types::ParticleId,
};
use log::error;
use rayon::prelude::*;

/// Counters gathered by [`force_phase`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForceStats {
    /// Points returned by the broad-phase queries, self included.
    pub candidates: u64,
    /// Pairs that passed the effective-range check and contributed a force.
    pub interactions: u64,
    /// Points without a resolvable particle.
    pub skipped: u64,
}

impl ForceStats {
    fn merge(self, other: ForceStats) -> ForceStats {
        ForceStats {
            candidates: self.candidates + other.candidates,
            interactions: self.interactions + other.interactions,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Clears `tree` and inserts one point per particle.
///
/// Each point carries the particle's index as its payload, so the force
/// phase can resolve neighbors back to particles.
///
/// ### Parameters
/// - `tree` - Tree to rebuild; its root boundary must be the world domain.
/// - `particles` - Particles to index, in id order.
///
/// ### Returns
/// The number of inserted points.
///
/// ### Errors
/// [`SimError::OutOfDomain`] for the first particle the tree rejects. The
/// tree is left partially built in that case.
pub fn rebuild_phase(tree: &mut RegionTree<ParticleId>, particles: &ParticleSet) -> Result<usize> {
    tree.clear();

    for (id, p) in particles.iter().enumerate() {
        if !tree.insert(p.to_point(id)) {
            error!(
                "particle {} at {:?} is outside the world boundary {:?}",
                id,
                p.pos,
                tree.boundary()
            );
            return Err(SimError::OutOfDomain {
                particle: id,
                position: p.pos,
            });
        }
    }

    Ok(particles.len())
}

/// Sums the attraction on every particle from its neighbors.
///
/// The buffer is resized (and cleared) to `particles.len()` first. With
/// `cfg.parallel` the particles are split across the rayon pool; each
/// worker writes only its own buffer slots, and per-particle sums follow
/// the query order either way, so both paths produce identical forces.
///
/// ### Parameters
/// - `tree` - Tree built by [`rebuild_phase`] this tick; only read.
/// - `particles` - Particles the tree was built from; only read.
/// - `cfg` - Supplies gravity, softening, the effective range, the query
///   radius (see [`Config::effective_query_radius`]) and the parallel switch.
/// - `acc` - Scratch buffer receiving the net force and partner count per particle.
///
/// ### Returns
/// Candidate, interaction and skipped-point counts summed over all particles.
pub fn force_phase(
    tree: &RegionTree<ParticleId>,
    particles: &ParticleSet,
    cfg: &Config,
    acc: &mut ForceBuffer,
) -> ForceStats {
    acc.ensure_len(particles.len());
    let (forces, counts) = acc.slots_mut();

    if cfg.parallel {
        forces
            .par_iter_mut()
            .zip(counts.par_iter_mut())
            .enumerate()
            .map_init(Vec::new, |scratch, (id, (force, count))| {
                let (net, stats) = accumulate_neighbors(id, tree, particles, cfg, scratch);
                *force = net;
                *count = stats.interactions as u32;
                stats
            })
            .reduce(ForceStats::default, ForceStats::merge)
    } else {
        let mut scratch = Vec::new();
        let mut total = ForceStats::default();
        for (id, (force, count)) in forces.iter_mut().zip(counts.iter_mut()).enumerate() {
            let (net, stats) = accumulate_neighbors(id, tree, particles, cfg, &mut scratch);
            *force = net;
            *count = stats.interactions as u32;
            total = total.merge(stats);
        }
        total
    }
}

/// Net attraction on particle `id` from every tree point within the
/// query circle and within `cfg.effective_range`.
///
/// The query radius only narrows the candidates; the effective range is
/// checked on the true distance.
fn accumulate_neighbors(
    id: ParticleId,
    tree: &RegionTree<ParticleId>,
    particles: &ParticleSet,
    cfg: &Config,
    scratch: &mut Vec<Point<ParticleId>>,
) -> (Force, ForceStats) {
    let me = &particles.particles[id];
    let range = Shape::Circle(Circle::centered_at(me.pos, cfg.effective_query_radius()));

    scratch.clear();
    tree.query_into(&range, scratch);

    let mut net = Force::ZERO;
    let mut stats = ForceStats {
        candidates: scratch.len() as u64,
        ..ForceStats::default()
    };

    for point in scratch.iter() {
        // A point may carry no particle, or a stale id; neither is an error.
        let Some((other_id, other)) = point
            .payload
            .and_then(|oid| particles.get(oid).map(|p| (oid, p)))
        else {
            stats.skipped += 1;
            continue;
        };

        if other_id == id || me.distance_to(other) > cfg.effective_range {
            continue;
        }

        net += me.attract(other, cfg.gravity, cfg.softening);
        stats.interactions += 1;
    }

    (net, stats)
}

/// Moves the buffered net forces into the particles' acceleration accumulators.
///
/// ### Parameters
/// - `particles` - Particles to update; `acc` must be indexed by the same ids.
/// - `acc` - Buffer filled by [`force_phase`].
pub fn apply_phase(particles: &mut ParticleSet, acc: &ForceBuffer) {
    for (id, p) in particles.particles.iter_mut().enumerate() {
        p.apply_force(acc.net(id));
    }
}

/// Integrates every particle by `dt`.
///
/// ### Parameters
/// - `particles` - Particles to move; their acceleration accumulators are cleared.
/// - `cfg` - Supplies the speed cap, the world size for the wrap and the trail length.
/// - `dt` - Time step, already validated by the caller.
///
/// ### Returns
/// The number of particles that wrapped across a domain edge.
pub fn integration_phase(particles: &mut ParticleSet, cfg: &Config, dt: f64) -> usize {
    particles
        .particles
        .iter_mut()
        .map(|p| p.update(dt, cfg))
        .filter(|&wrapped| wrapped)
        .count()
}
