use crate::force::Force;
use crate::types::ParticleId;

/// Per-particle scratch accumulators for one force phase.
///
/// For each `ParticleId`, this buffer stores:
///
/// - The net force collected from all interaction partners.
/// - The number of partners that contributed.
///
/// Each slot is written by exactly one worker during the force phase, so
/// the phase can hand out disjoint `&mut` slots without locking.
#[derive(Debug, Default)]
pub struct ForceBuffer {
    force: Vec<Force>,
    /// Number of contributing partners for each particle.
    pub count: Vec<u32>,
}

impl ForceBuffer {
    /// Creates a buffer of `len` zeroed slots.
    pub fn with_len(len: usize) -> Self {
        Self {
            force: vec![Force::ZERO; len],
            count: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// Resizes to `len` if needed and zeroes every slot.
    pub fn ensure_len(&mut self, len: usize) {
        if self.force.len() != len {
            self.force.resize(len, Force::ZERO);
            self.count.resize(len, 0);
        }
        self.clear();
    }

    /// Zeroes every slot, keeping the length.
    pub fn clear(&mut self) {
        self.force.fill(Force::ZERO);
        self.count.fill(0);
    }

    /// Disjoint mutable views of the force and count columns, index-aligned.
    pub fn slots_mut(&mut self) -> (&mut [Force], &mut [u32]) {
        (&mut self.force, &mut self.count)
    }

    /// Net force collected for `id`.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn net(&self, id: ParticleId) -> Force {
        self.force[id]
    }

    pub fn total_interactions(&self) -> u64 {
        self.count.iter().map(|&c| u64::from(c)).sum()
    }
}
