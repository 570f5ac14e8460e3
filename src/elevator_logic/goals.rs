//! Pending stops of one car, one bit per floor.

use crate::config;

use super::bits::{highest_set_bit, lowest_set_bit};

/// Set of floors a car still has to stop at.
///
/// Floors must lie in `0..config::NUM_FLOORS`; anything else is a caller bug
/// and panics instead of silently wrapping the shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalSet(u16);

fn bit(floor: u8) -> u16 {
    assert!(
        floor < config::NUM_FLOORS,
        "floor {} is outside 0..{}",
        floor,
        config::NUM_FLOORS
    );
    1 << floor
}

impl GoalSet {
    /// An empty set
    pub fn new() -> Self {
        Self(0)
    }

    /// Wraps a raw bit pattern, bit `n` meaning floor `n`
    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[allow(missing_docs)]
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Adds `floor`. Setting an already set floor is a no-op.
    pub fn set(&mut self, floor: u8) {
        self.0 |= bit(floor);
    }

    /// Removes `floor`. Clearing an absent floor is a no-op.
    pub fn clear(&mut self, floor: u8) {
        self.0 &= !bit(floor);
    }

    #[allow(missing_docs)]
    pub fn contains(self, floor: u8) -> bool {
        self.0 & bit(floor) != 0
    }

    #[allow(missing_docs)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Closest goal strictly above `floor`
    pub fn nearest_above(self, floor: u8) -> Option<u8> {
        // u32 so that floor 15 yields an empty mask instead of overflowing
        let at_or_below = ((1u32 << (u32::from(floor) + 1)) - 1) as u16;
        lowest_set_bit(self.0 & !at_or_below)
    }

    /// Closest goal strictly below `floor`
    pub fn nearest_below(self, floor: u8) -> Option<u8> {
        let below = bit(floor) - 1;
        highest_set_bit(self.0 & below)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_three_floors() {
        let mut goals = GoalSet::new();
        goals.set(3);
        goals.set(4);
        goals.set(7);
        assert_eq!(goals.bits(), 152);
        assert!(goals.contains(4));
        assert!(!goals.contains(5));
    }

    #[test]
    fn set_and_clear_are_idempotent() {
        let mut goals = GoalSet::new();
        goals.set(5);
        goals.set(5);
        assert_eq!(goals.bits(), 1 << 5);

        goals.clear(5);
        goals.clear(5);
        assert!(goals.is_empty());
    }

    #[test]
    fn operations_on_distinct_floors_commute() {
        let mut a = GoalSet::new();
        a.set(2);
        a.set(9);
        a.clear(2);

        let mut b = GoalSet::new();
        b.set(9);
        b.clear(2);
        b.set(2);
        b.clear(2);

        assert_eq!(a, b);
    }

    #[test]
    fn nearest_above_skips_current_and_lower_floors() {
        let goals = GoalSet::from_bits((1 << 0) | (1 << 3) | (1 << 5) | (1 << 6));
        assert_eq!(goals.nearest_above(3), Some(5));
        assert_eq!(goals.nearest_above(6), None);
        assert_eq!(goals.nearest_above(15), None);
    }

    #[test]
    fn nearest_below_skips_current_and_higher_floors() {
        let goals = GoalSet::from_bits(0b1100_0111);
        assert_eq!(goals.nearest_below(4), Some(2));
        assert_eq!(goals.nearest_below(0), None);
        assert_eq!(goals.nearest_below(7), Some(6));
    }

    #[test]
    #[should_panic]
    fn out_of_range_floor_panics() {
        GoalSet::new().set(config::NUM_FLOORS);
    }
}
