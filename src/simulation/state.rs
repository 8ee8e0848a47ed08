use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{
    Variant, DEFAULT_BOUNDS_HEIGHT, DEFAULT_BOUNDS_WIDTH, MAX_SPEED_MS, MIN_SPEED_MS,
    POPULATION_CAPACITY,
};
use crate::simulation::entity::Point;
use crate::simulation::physics::{self, Bounds};
use crate::simulation::population::Population;

/// Redraw interval in milliseconds, kept within `[MIN_SPEED_MS, MAX_SPEED_MS]`.
///
/// Written by key handling and read by the frame timer thread.
#[derive(Debug)]
pub struct Speed {
    millis: AtomicU64,
}

impl Speed {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis.clamp(MIN_SPEED_MS, MAX_SPEED_MS)),
        }
    }

    pub fn millis(&self) -> u64 {
        self.millis.load(Ordering::Relaxed)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.millis())
    }

    /// Shorten the interval by one millisecond, returning the new value
    pub fn faster(&self) -> u64 {
        self.update(|ms| ms.saturating_sub(1).max(MIN_SPEED_MS))
    }

    /// Lengthen the interval by one millisecond, returning the new value
    pub fn slower(&self) -> u64 {
        self.update(|ms| (ms + 1).min(MAX_SPEED_MS))
    }

    fn update(&self, f: impl Fn(u64) -> u64) -> u64 {
        let previous = self
            .millis
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |ms| Some(f(ms)))
            .unwrap_or_else(|ms| ms);
        f(previous)
    }
}

/// Everything one animation needs between frames
pub struct SimulationState {
    variant: Variant,
    population: Population,
    speed: Arc<Speed>,
    bounds: Bounds,
    rng: StdRng,
}

impl SimulationState {
    pub fn new(variant: Variant) -> Self {
        Self::with_rng(variant, StdRng::from_entropy())
    }

    /// Deterministic spawning for headless runs and tests
    pub fn with_rng(variant: Variant, rng: StdRng) -> Self {
        let capacity = if variant.multi_ball() {
            POPULATION_CAPACITY
        } else {
            1
        };

        Self {
            variant,
            population: Population::new(capacity, variant.tail_capacity()),
            speed: Arc::new(Speed::new(variant.initial_speed_ms())),
            bounds: Bounds::new(DEFAULT_BOUNDS_WIDTH, DEFAULT_BOUNDS_HEIGHT),
            rng,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn speed(&self) -> &Arc<Speed> {
        &self.speed
    }

    /// Box size seen by the latest frame
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Advance every active ball by one frame inside `bounds`, returning the
    /// drawn head positions in population order.
    pub fn step(&mut self, bounds: Bounds) -> Vec<Point> {
        if bounds != self.bounds {
            log::debug!(
                "Box resized from {}x{} to {}x{}",
                self.bounds.width,
                self.bounds.height,
                bounds.width,
                bounds.height
            );
            self.bounds = bounds;
        }

        self.population
            .active_mut()
            .iter_mut()
            .map(|entity| physics::advance(entity, bounds))
            .collect()
    }

    /// Spawn a ball inside the latest box. Returns false at capacity.
    pub fn add_entity(&mut self) -> bool {
        self.population.add(self.bounds, &mut self.rng)
    }

    /// Drop the newest ball. Returns false when only one is left.
    pub fn remove_entity(&mut self) -> bool {
        self.population.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CLASSIC_REFRESH_MS, DEFAULT_SPEED_MS};

    #[test]
    fn test_speed_floor() {
        let speed = Speed::new(DEFAULT_SPEED_MS);
        for _ in 0..30 {
            speed.faster();
        }
        assert_eq!(speed.millis(), 1);
        assert_eq!(speed.faster(), 1);
    }

    #[test]
    fn test_speed_ceiling() {
        let speed = Speed::new(DEFAULT_SPEED_MS);
        for _ in 0..200 {
            speed.slower();
        }
        assert_eq!(speed.millis(), 100);
        assert_eq!(speed.interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_speed_step_returns_new_value() {
        let speed = Speed::new(15);
        assert_eq!(speed.faster(), 14);
        assert_eq!(speed.slower(), 15);
        assert_eq!(speed.slower(), 16);
    }

    #[test]
    fn test_speed_new_clamps() {
        assert_eq!(Speed::new(0).millis(), MIN_SPEED_MS);
        assert_eq!(Speed::new(500).millis(), MAX_SPEED_MS);
    }

    #[test]
    fn test_initial_state() {
        let state = SimulationState::with_rng(Variant::Speed, StdRng::seed_from_u64(1));
        assert_eq!(state.speed().millis(), DEFAULT_SPEED_MS);
        assert_eq!(state.population().active_count(), 1);
        assert_eq!(state.population().active()[0].position, Point::new(1, 1));

        let classic = SimulationState::with_rng(Variant::Classic, StdRng::seed_from_u64(1));
        assert_eq!(classic.speed().millis(), CLASSIC_REFRESH_MS);
    }

    #[test]
    fn test_single_ball_variants_cannot_grow() {
        let mut state = SimulationState::with_rng(Variant::Tail, StdRng::seed_from_u64(1));
        assert!(!state.add_entity());
        assert_eq!(state.population().active_count(), 1);
    }

    #[test]
    fn test_step_only_advances_active_balls() {
        let mut state = SimulationState::with_rng(Variant::MultiBall, StdRng::seed_from_u64(5));
        state.add_entity();
        state.add_entity();
        state.remove_entity();

        let heads = state.step(Bounds::new(30, 20));

        assert_eq!(heads.len(), 2);
        assert_eq!(state.population().active()[0].tail.len(), 1);
        assert_eq!(state.population().active()[1].tail.len(), 1);
    }

    #[test]
    fn test_spawn_uses_latest_bounds() {
        let mut state = SimulationState::with_rng(Variant::MultiBall, StdRng::seed_from_u64(9));
        let bounds = Bounds::new(5, 4);
        state.step(bounds);
        assert_eq!(state.bounds(), bounds);

        while state.add_entity() {}
        for entity in state.population().active() {
            assert!(entity.position.x <= 3 && entity.position.y <= 2);
        }
    }
}
