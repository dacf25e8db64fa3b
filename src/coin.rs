use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};

/// An amount of scroogecoin in its smallest unit.
/// Negative amounts are representable so that malformed outputs can be rejected by validation
/// instead of at construction time.
/// `+`, `-` and `sum` saturate at the bounds of `i64`; use `checked_add`/`checked_sub` to detect
/// overflow.
#[derive(
    Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize,
)]
pub struct Coin(i64);

impl Coin {
    pub const fn new(amount: i64) -> Self {
        Coin(amount)
    }

    pub const fn zero() -> Self {
        Self::new(0)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Add for Coin {
    type Output = Coin;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sum<Coin> for Coin {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Coin::saturating_add)
    }
}

impl Sub for Coin {
    type Output = Coin;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl From<i64> for Coin {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} SCR", self.0)
    }
}
