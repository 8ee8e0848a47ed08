use rand::Rng;

use crate::config::PALETTE;
use crate::simulation::entity::{Entity, Point, Velocity};
use crate::simulation::physics::Bounds;

/// Fixed set of ball slots with an active-count cursor.
///
/// All slots are allocated up front. Adding a ball reinitializes the first
/// inactive slot; removing one only lowers the cursor, leaving the slot's data
/// in place until it is reused. At least one ball is always active.
pub struct Population {
    slots: Vec<Entity>,
    active: usize,
}

impl Population {
    /// Create `capacity` slots (at least one) with the first ball at (1,1)
    /// heading down-right.
    pub fn new(capacity: usize, tail_capacity: usize) -> Self {
        let slots = (0..capacity.max(1))
            .map(|slot| {
                Entity::new(
                    Point::new(1, 1),
                    Velocity::new(1, 1),
                    PALETTE[slot % PALETTE.len()],
                    tail_capacity,
                )
            })
            .collect();

        Self { slots, active: 1 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &[Entity] {
        &self.slots[..self.active]
    }

    pub fn active_mut(&mut self) -> &mut [Entity] {
        &mut self.slots[..self.active]
    }

    /// Activate another ball at a random interior cell of `bounds` with a
    /// random diagonal direction. Returns false when already full.
    pub fn add<R: Rng>(&mut self, bounds: Bounds, rng: &mut R) -> bool {
        if self.active == self.slots.len() {
            return false;
        }

        let position = Point::new(
            rng.gen_range(1..=(bounds.width - 2).max(1)),
            rng.gen_range(1..=(bounds.height - 2).max(1)),
        );
        let velocity = Velocity::new(random_direction(rng), random_direction(rng));

        self.slots[self.active].respawn(position, velocity);
        self.active += 1;
        true
    }

    /// Deactivate the most recently added ball. Returns false when only one
    /// ball is left.
    pub fn remove(&mut self) -> bool {
        if self.active == 1 {
            return false;
        }
        self.active -= 1;
        true
    }
}

fn random_direction<R: Rng>(rng: &mut R) -> i32 {
    if rng.gen::<bool>() {
        1
    } else {
        -1
    }
}
