//! Trading signals and position sides.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    /// 1 for BUY, -1 for SELL, 0 for HOLD.
    pub fn value(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => f.pad("BUY"),
            Signal::Sell => f.pad("SELL"),
            Signal::Hold => f.pad("HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PositionSide {
    Long,
    Short,
    #[default]
    Flat,
}

impl PositionSide {
    /// 1 for LONG, -1 for SHORT, 0 for FLAT.
    pub fn value(self) -> i8 {
        match self {
            PositionSide::Long => 1,
            PositionSide::Short => -1,
            PositionSide::Flat => 0,
        }
    }

    /// Side after acting on `signal`; HOLD keeps the current side.
    pub fn apply(self, signal: Signal) -> PositionSide {
        match signal {
            Signal::Buy => PositionSide::Long,
            Signal::Sell => PositionSide::Short,
            Signal::Hold => self,
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::Long => f.pad("LONG"),
            PositionSide::Short => f.pad("SHORT"),
            PositionSide::Flat => f.pad("FLAT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_values() {
        assert_eq!(Signal::Buy.value(), 1);
        assert_eq!(Signal::Sell.value(), -1);
        assert_eq!(Signal::Hold.value(), 0);
        assert_eq!(Signal::default(), Signal::Hold);
    }

    #[test]
    fn signal_display() {
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!(Signal::Sell.to_string(), "SELL");
        assert_eq!(Signal::Hold.to_string(), "HOLD");
    }

    #[test]
    fn position_transitions() {
        assert_eq!(PositionSide::Flat.apply(Signal::Buy), PositionSide::Long);
        assert_eq!(PositionSide::Long.apply(Signal::Sell), PositionSide::Short);
        assert_eq!(PositionSide::Short.apply(Signal::Hold), PositionSide::Short);
        assert_eq!(PositionSide::Long.apply(Signal::Buy), PositionSide::Long);
    }

    #[test]
    fn position_display_and_value() {
        assert_eq!(PositionSide::Flat.to_string(), "FLAT");
        assert_eq!(PositionSide::Short.value(), -1);
        assert_eq!(PositionSide::Long.value(), 1);
    }
}
