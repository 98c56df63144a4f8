//! Two-digit BCD unlock counter
//!
//! Each call updates exactly one digit: `ones` rolls 9 -> 0 and bumps
//! `tens`, otherwise `ones` advances. When `tens` reaches 4 both digits
//! reset on the same call, so the display wraps after 40 unlocks.

/// `tens` value that triggers the wrap back to 00
pub const TENS_WRAP: u8 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BcdCounter {
    ones: u8,
    tens: u8,
}

impl BcdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one and return the new display value
    pub fn increment(&mut self) -> u8 {
        if self.ones == 9 {
            self.ones = 0;
            self.tens += 1;
        } else {
            self.ones += 1;
        }

        if self.tens == TENS_WRAP {
            self.tens = 0;
            self.ones = 0;
        }

        self.display()
    }

    /// Packed bus value, `tens` in the high nibble
    pub fn display(&self) -> u8 {
        (self.tens << 4) | self.ones
    }

    pub fn ones(&self) -> u8 {
        self.ones
    }

    pub fn tens(&self) -> u8 {
        self.tens
    }

    /// Decimal value shown on the bank
    pub fn value(&self) -> u8 {
        self.tens * 10 + self.ones
    }

    #[cfg(test)]
    pub(crate) fn from_digits(tens: u8, ones: u8) -> Self {
        Self { ones, tens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ones_advance() {
        let mut bcd = BcdCounter::new();
        assert_eq!(bcd.increment(), 0x01);
        assert_eq!(bcd.increment(), 0x02);
    }

    #[test]
    fn test_rollover_does_not_also_bump_ones() {
        let mut bcd = BcdCounter::from_digits(0, 9);
        assert_eq!(bcd.increment(), 0x10);
        assert_eq!((bcd.tens(), bcd.ones()), (1, 0));
    }

    #[test]
    fn test_thirty_eight_to_thirty_nine() {
        let mut bcd = BcdCounter::from_digits(3, 8);
        assert_eq!(bcd.increment(), 0x39);
        assert_eq!((bcd.tens(), bcd.ones()), (3, 9));
    }

    #[test]
    fn test_thirty_nine_wraps_on_same_call() {
        let mut bcd = BcdCounter::from_digits(3, 9);
        assert_eq!(bcd.increment(), 0x00);
        assert_eq!((bcd.tens(), bcd.ones()), (0, 0));
    }

    #[test]
    fn test_forty_increments_return_to_zero() {
        let mut bcd = BcdCounter::new();
        for n in 1..40u8 {
            bcd.increment();
            assert_eq!(bcd.value(), n);
            assert!(bcd.ones() <= 9);
            assert!(bcd.display() <= 0x3F);
        }
        assert_eq!(bcd.increment(), 0x00);
    }
}
