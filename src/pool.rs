//! Fixed-capacity particle storage.
//!
//! Expired particles free their slot in the frame they expire and the next
//! spawn reuses it, so a steady trail allocates nothing once warmed up.

use rayon::prelude::*;
use tracing::trace;

use crate::particle::Particle;

// Below this many slots the aging pass is not worth splitting across threads.
const PARALLEL_MIN_LEN: usize = 512;

pub struct ParticlePool {
    slots: Vec<Option<Particle>>,
    free: Vec<usize>,
    capacity: usize,
    live: usize,
}

impl ParticlePool {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity.min(1024)),
            free: Vec::new(),
            capacity,
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Store `particle`, returning its slot.
    ///
    /// When every slot is live, the particle closest to expiry is replaced.
    pub fn spawn(&mut self, particle: Particle) -> usize {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(particle);
            self.live += 1;
            return slot;
        }

        if self.slots.len() < self.capacity {
            self.slots.push(Some(particle));
            self.live += 1;
            return self.slots.len() - 1;
        }

        let slot = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|p| (i, p.remaining_life)))
            .min_by_key(|&(_, life)| life)
            .map_or(0, |(i, _)| i);
        trace!(slot, "particle pool full, replacing oldest");
        self.slots[slot] = Some(particle);
        slot
    }

    pub fn get(&self, slot: usize) -> Option<&Particle> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().flatten()
    }

    /// Advance every live particle by one frame.
    ///
    /// `visit` sees each updated particle in reverse slot order, including
    /// those that expired this frame; expired slots are freed right after.
    pub fn step(&mut self, mut visit: impl FnMut(&Particle)) {
        self.slots
            .par_iter_mut()
            .with_min_len(PARALLEL_MIN_LEN)
            .flatten()
            .for_each(Particle::advance);

        for i in (0..self.slots.len()).rev() {
            let Some(particle) = &self.slots[i] else {
                continue;
            };
            visit(particle);
            if particle.is_expired() {
                self.slots[i] = None;
                self.free.push(i);
                self.live -= 1;
            }
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}
