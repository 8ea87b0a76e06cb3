/// Identifier for a node in a [`crate::region_tree::RegionTree`].
///
/// This is an index into the tree's node arena, and is only meaningful
/// until the next [`crate::region_tree::RegionTree::clear`].
pub type NodeId = usize;

/// Identifier for a particle in a [`crate::particle::ParticleSet`].
///
/// Particles are never created or destroyed after initialization, so an
/// id stays valid for the lifetime of the set.
pub type ParticleId = usize;
