//! Converts a signed target position into entry/exit deltas per book.
//!
//! The classification is an ordered rule table: the first matching rule wins.
//!
//! | # | rule           | condition                                | deltas                        |
//! |---|----------------|------------------------------------------|-------------------------------|
//! | 1 | short to long  | target > 0, previous short != 0          | short out = prev, long in = n |
//! | 2 | long to short  | target < 0, previous long != 0           | long out = prev, short in = n |
//! | 3 | short grows    | target < 0, n > previous short           | short in = n - prev           |
//! | 4 | short declines | target < 0, n < previous short           | short out = prev - n          |
//! | 5 | long grows     | target > 0, n > previous long            | long in = n - prev            |
//! | 6 | long declines  | target > 0, n < previous long            | long out = prev - n           |
//! | 7 | short to zero  | target == 0, previous short != 0         | short out = prev              |
//! | 8 | long to zero   | target == 0, previous long != 0          | long out = prev               |
//! | - | hold           | otherwise                                | none                          |
//!
//! `n` is the magnitude of the target.

use crate::domain::Sign;
use serde::{Deserialize, Serialize};

/// Which rule classified a bar's signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    ShortToLong,
    LongToShort,
    ShortGrows,
    ShortDeclines,
    LongGrows,
    LongDeclines,
    ShortToZero,
    LongToZero,
    Hold,
}

/// Entry and exit sizes for both books. All non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionDeltas {
    pub short_in: usize,
    pub short_out: usize,
    pub long_in: usize,
    pub long_out: usize,
}

/// Magnitude of a signed target as a lot count.
pub fn target_size(target: i64) -> usize {
    usize::try_from(target.unsigned_abs()).unwrap_or(usize::MAX)
}

impl Transition {
    /// Classify a target against the previous ending sizes.
    pub fn classify(target: i64, prev_short: usize, prev_long: usize) -> Self {
        let size = target_size(target);
        match Sign::of(target) {
            Sign::Positive if prev_short != 0 => Transition::ShortToLong,
            Sign::Negative if prev_long != 0 => Transition::LongToShort,
            Sign::Negative if size > prev_short => Transition::ShortGrows,
            Sign::Negative if size < prev_short => Transition::ShortDeclines,
            Sign::Positive if size > prev_long => Transition::LongGrows,
            Sign::Positive if size < prev_long => Transition::LongDeclines,
            Sign::Zero if prev_short != 0 => Transition::ShortToZero,
            Sign::Zero if prev_long != 0 => Transition::LongToZero,
            _ => Transition::Hold,
        }
    }

    /// Deltas this transition produces.
    pub fn deltas(self, target: i64, prev_short: usize, prev_long: usize) -> PositionDeltas {
        let size = target_size(target);
        let none = PositionDeltas::default();
        match self {
            Transition::ShortToLong => PositionDeltas {
                short_out: prev_short,
                long_in: size,
                ..none
            },
            Transition::LongToShort => PositionDeltas {
                long_out: prev_long,
                short_in: size,
                ..none
            },
            Transition::ShortGrows => PositionDeltas {
                short_in: size - prev_short,
                ..none
            },
            Transition::ShortDeclines => PositionDeltas {
                short_out: prev_short - size,
                ..none
            },
            Transition::LongGrows => PositionDeltas {
                long_in: size - prev_long,
                ..none
            },
            Transition::LongDeclines => PositionDeltas {
                long_out: prev_long - size,
                ..none
            },
            Transition::ShortToZero => PositionDeltas {
                short_out: prev_short,
                ..none
            },
            Transition::LongToZero => PositionDeltas {
                long_out: prev_long,
                ..none
            },
            Transition::Hold => none,
        }
    }
}

impl PositionDeltas {
    /// First bar: the target seeds entry of the book matching its sign.
    pub fn bootstrap(target: i64) -> Self {
        let size = target_size(target);
        match Sign::of(target) {
            Sign::Negative => PositionDeltas {
                short_in: size,
                ..Self::default()
            },
            Sign::Positive => PositionDeltas {
                long_in: size,
                ..Self::default()
            },
            Sign::Zero => Self::default(),
        }
    }

    pub fn has_entry(&self) -> bool {
        self.short_in != 0 || self.long_in != 0
    }

    pub fn has_exit(&self) -> bool {
        self.short_out != 0 || self.long_out != 0
    }
}

/// Classify and compute deltas in one step.
pub fn interpret(target: i64, prev_short: usize, prev_long: usize) -> (Transition, PositionDeltas) {
    let transition = Transition::classify(target, prev_short, prev_long);
    (transition, transition.deltas(target, prev_short, prev_long))
}
