use std::collections::VecDeque;

use crate::config::TAIL_FADE_STEP;
use crate::simulation::entity::{Point, Rgb};

/// Most-recent-first history of a ball's previous positions.
///
/// Backed by a ring buffer: recording is O(1) and the oldest entry falls off
/// once `capacity` positions are held. A capacity of zero disables the tail.
#[derive(Clone, Debug)]
pub struct Tail {
    positions: VecDeque<Point>,
    capacity: usize,
}

impl Tail {
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, position: Point) {
        if self.capacity == 0 {
            return;
        }
        if self.positions.len() == self.capacity {
            self.positions.pop_back();
        }
        self.positions.push_front(position);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slot `index`, 0 being the most recent
    pub fn get(&self, index: usize) -> Option<Point> {
        self.positions.get(index).copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Point> + '_ {
        self.positions.iter().copied()
    }

    /// Each slot paired with `base` faded to that slot's intensity
    pub fn faded(&self, base: Rgb) -> impl DoubleEndedIterator<Item = (Point, Rgb)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(move |(index, &point)| (point, base.scaled(intensity_percent(index, self.capacity))))
    }
}

/// Brightness of tail slot `index` in percent: `(capacity - index) * 10`,
/// clamped to `[0, 100]`.
pub fn intensity_percent(index: usize, capacity: usize) -> u8 {
    (capacity.saturating_sub(index) * TAIL_FADE_STEP).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_most_recent_first() {
        let mut tail = Tail::new(3);
        tail.record(Point::new(1, 1));
        tail.record(Point::new(2, 2));

        assert_eq!(tail.len(), 2);
        assert_eq!(tail.get(0), Some(Point::new(2, 2)));
        assert_eq!(tail.get(1), Some(Point::new(1, 1)));
        assert_eq!(tail.get(2), None);
    }

    #[test]
    fn test_oldest_discarded_at_capacity() {
        let mut tail = Tail::new(3);
        for i in 0..5 {
            tail.record(Point::new(i, i));
        }

        assert_eq!(tail.len(), 3);
        let positions: Vec<Point> = tail.iter().collect();
        assert_eq!(positions, vec![Point::new(4, 4), Point::new(3, 3), Point::new(2, 2)]);
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut tail = Tail::new(0);
        tail.record(Point::new(1, 1));
        assert!(tail.is_empty());
    }

    #[test]
    fn test_intensity_decreases_by_ten() {
        let intensities: Vec<u8> = (0..10).map(|i| intensity_percent(i, 10)).collect();
        assert_eq!(intensities, vec![100, 90, 80, 70, 60, 50, 40, 30, 20, 10]);
        assert!(intensities.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_intensity_clamped() {
        assert_eq!(intensity_percent(12, 10), 0);
        assert_eq!(intensity_percent(0, 15), 100);
    }

    #[test]
    fn test_faded_channels_never_exceed_base() {
        let base = Rgb::new(255, 128, 3);
        let mut tail = Tail::new(10);
        for i in 0..10 {
            tail.record(Point::new(i, 1));
        }

        for (index, (_, color)) in tail.faded(base).enumerate() {
            let percent = u16::from(intensity_percent(index, 10));
            assert!(color.r <= base.r && color.g <= base.g && color.b <= base.b);
            assert_eq!(u16::from(color.r), 255 * percent / 100);
            assert_eq!(u16::from(color.g), 128 * percent / 100);
            assert_eq!(u16::from(color.b), 3 * percent / 100);
        }
    }
}
