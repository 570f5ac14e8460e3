//! Highest / lowest set bit of a 16-bit word.
//!
//! Both scans narrow the word by halves (8, 4, 2, 1 bits), so they take four
//! mask-and-shift steps regardless of which bits are set. `None` means the
//! word was zero.

/// (mask of the low half, width of that half) for each narrowing step
const STAGES: [(u16, u8); 4] = [(0x00FF, 8), (0x000F, 4), (0x0003, 2), (0x0001, 1)];

/// Index of the most significant set bit of `word`.
///
/// ## Example
/// ```
/// use elevatorfleet::elevator_logic::bits::highest_set_bit;
///
/// assert_eq!(highest_set_bit(0b0101_1000), Some(6));
/// assert_eq!(highest_set_bit(0), None);
/// ```
pub fn highest_set_bit(mut word: u16) -> Option<u8> {
    if word == 0 {
        return None;
    }
    let mut index = 0;
    for (low_mask, width) in STAGES {
        // Anything above the low half? Then the answer lives up there.
        if word & !low_mask != 0 {
            word >>= width;
            index |= width;
        }
    }
    Some(index)
}

/// Index of the least significant set bit of `word`.
///
/// ## Example
/// ```
/// use elevatorfleet::elevator_logic::bits::lowest_set_bit;
///
/// assert_eq!(lowest_set_bit(0b0101_1000), Some(3));
/// assert_eq!(lowest_set_bit(0), None);
/// ```
pub fn lowest_set_bit(mut word: u16) -> Option<u8> {
    if word == 0 {
        return None;
    }
    let mut index = 0;
    for (low_mask, width) in STAGES {
        // Low half empty? Then the answer lives in the high half.
        if word & low_mask == 0 {
            word >>= width;
            index |= width;
        }
    }
    Some(index)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_word_has_no_bits() {
        assert_eq!(highest_set_bit(0), None);
        assert_eq!(lowest_set_bit(0), None);
    }

    #[test]
    fn scattered_bits() {
        let word = (1 << 3) | (1 << 4) | (1 << 6);
        assert_eq!(lowest_set_bit(word), Some(3));
        assert_eq!(highest_set_bit(word), Some(6));
    }

    #[test]
    fn single_bits_at_every_position() {
        for n in 0..16u8 {
            let word = 1u16 << n;
            assert_eq!(highest_set_bit(word), Some(n));
            assert_eq!(lowest_set_bit(word), Some(n));
        }
    }

    #[test]
    fn full_word() {
        assert_eq!(highest_set_bit(u16::MAX), Some(15));
        assert_eq!(lowest_set_bit(u16::MAX), Some(0));
    }

    #[test]
    fn agrees_with_hardware_counts_for_every_word() {
        for word in 1..=u16::MAX {
            assert_eq!(highest_set_bit(word), Some(15 - word.leading_zeros() as u8));
            assert_eq!(lowest_set_bit(word), Some(word.trailing_zeros() as u8));
        }
    }
}
