use std::fmt;

use rand::Rng;

use crate::misc::TinyVec;

/// Values still playable this turn. Four entries at most, for a double.
pub type DiceValues = TinyVec<u8, 4>;

/// The two dice of a turn together with how much of them has been played.
/// A double can be played four times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dice {
    Double {
        value: u8,
        used: u8,
    },
    Single {
        value_1: u8,
        value_2: u8,
        used: DiceUsage,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiceUsage {
    BothAvailable,
    OnlyFirstAvailable,
    OnlySecondAvailable,
    BothUsed,
}

impl Dice {
    pub const fn new(a: u8, b: u8) -> Dice {
        if a == b {
            Dice::Double { value: a, used: 0 }
        } else {
            Dice::Single { value_1: a, value_2: b, used: DiceUsage::BothAvailable }
        }
    }

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Dice {
        let a = rng.random_range(1..=6);
        let b = rng.random_range(1..=6);
        Dice::new(a, b)
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Dice::Double { .. })
    }

    pub fn is_used(&self) -> bool {
        match self {
            Dice::Double { used, .. } => *used >= 4,
            Dice::Single { used, .. } => *used == DiceUsage::BothUsed,
        }
    }

    /// The multiset of values that can still be played.
    pub fn remaining(&self) -> DiceValues {
        let mut values = DiceValues::new();
        match *self {
            Dice::Double { value, used } => {
                for _ in used..4 {
                    values.push(value);
                }
            }
            Dice::Single { value_1, value_2, used } => {
                if matches!(used, DiceUsage::BothAvailable | DiceUsage::OnlyFirstAvailable) {
                    values.push(value_1);
                }
                if matches!(used, DiceUsage::BothAvailable | DiceUsage::OnlySecondAvailable) {
                    values.push(value_2);
                }
            }
        }
        values
    }

    pub fn contains(&self, die: u8) -> bool {
        self.remaining().contains(&die)
    }

    /// Marks one die of value `die` as played, or `None` if no such die is left.
    pub fn use_die(&self, die: u8) -> Option<Dice> {
        if !self.contains(die) {
            return None;
        }
        let mut new_dice = *self;
        match &mut new_dice {
            Dice::Double { used, .. } => *used += 1,
            Dice::Single { value_1, used, .. } => {
                *used = match (*value_1 == die, *used) {
                    (true, DiceUsage::BothAvailable) => DiceUsage::OnlySecondAvailable,
                    (false, DiceUsage::BothAvailable) => DiceUsage::OnlyFirstAvailable,
                    _ => DiceUsage::BothUsed,
                };
            }
        }
        Some(new_dice)
    }

    /// The 21 distinct rolls with their weight out of 36 equally likely
    /// outcomes: 1 for a double, 2 for the two orders of any other pair.
    pub const ALL_WITH_WEIGHT: [(Dice, f64); 21] = [
        (Dice::new(1, 1), 1.0),
        (Dice::new(1, 2), 2.0),
        (Dice::new(1, 3), 2.0),
        (Dice::new(1, 4), 2.0),
        (Dice::new(1, 5), 2.0),
        (Dice::new(1, 6), 2.0),
        (Dice::new(2, 2), 1.0),
        (Dice::new(2, 3), 2.0),
        (Dice::new(2, 4), 2.0),
        (Dice::new(2, 5), 2.0),
        (Dice::new(2, 6), 2.0),
        (Dice::new(3, 3), 1.0),
        (Dice::new(3, 4), 2.0),
        (Dice::new(3, 5), 2.0),
        (Dice::new(3, 6), 2.0),
        (Dice::new(4, 4), 1.0),
        (Dice::new(4, 5), 2.0),
        (Dice::new(4, 6), 2.0),
        (Dice::new(5, 5), 1.0),
        (Dice::new(5, 6), 2.0),
        (Dice::new(6, 6), 1.0),
    ];

    pub const TOTAL_WEIGHT: f64 = 36.0;
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dice::Double { value, .. } => write!(f, "{}/{}", value, value),
            Dice::Single { value_1, value_2, .. } => write!(f, "{}/{}", value_1, value_2),
        }
    }
}
