//! Three-valued constants used as input patterns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// A single pattern position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trit {
    /// Must be low.
    Zero,
    /// Must be high.
    One,
    /// Don't care.
    X,
}

impl Trit {
    /// Whether a concrete bit value is accepted by this position.
    #[must_use]
    pub const fn matches(self, value: bool) -> bool {
        match self {
            Self::Zero => !value,
            Self::One => value,
            Self::X => true,
        }
    }

    /// Whether the position constrains its bit.
    #[must_use]
    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::X)
    }
}

impl From<bool> for Trit {
    fn from(value: bool) -> Self {
        if value { Self::One } else { Self::Zero }
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "0"),
            Self::One => write!(f, "1"),
            Self::X => write!(f, "x"),
        }
    }
}

/// An ordered vector of trits, bit 0 first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Const {
    trits: Vec<Trit>,
}

impl Const {
    /// Low `width` bits of `value`, bit 0 first.
    #[must_use]
    pub fn from_uint(value: u64, width: usize) -> Self {
        let trits = (0..width)
            .map(|i| Trit::from(i < 64 && (value >> i) & 1 == 1))
            .collect();
        Self { trits }
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trits.len()
    }

    /// Whether the constant has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trits.is_empty()
    }

    /// The positions, in order.
    #[must_use]
    pub fn trits(&self) -> &[Trit] {
        &self.trits
    }

    /// Appends one position.
    pub fn push(&mut self, trit: Trit) {
        self.trits.push(trit);
    }

    /// Replaces the position at `index`.
    pub fn set(&mut self, index: usize, trit: Trit) {
        self.trits[index] = trit;
    }

    /// Whether every input matched by `other` is also matched by `self`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .trits
                .iter()
                .zip(&other.trits)
                .all(|(a, b)| *a == Trit::X || a == b)
    }

    /// Whether the concrete bit vector `values` is matched.
    #[must_use]
    pub fn matches(&self, values: &[bool]) -> bool {
        self.len() == values.len()
            && self
                .trits
                .iter()
                .zip(values)
                .all(|(t, v)| t.matches(*v))
    }
}

impl Index<usize> for Const {
    type Output = Trit;

    fn index(&self, index: usize) -> &Trit {
        &self.trits[index]
    }
}

impl From<Vec<Trit>> for Const {
    fn from(trits: Vec<Trit>) -> Self {
        Self { trits }
    }
}

impl FromIterator<Trit> for Const {
    fn from_iter<I: IntoIterator<Item = Trit>>(iter: I) -> Self {
        Self {
            trits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Const {
    /// Most significant position first, as in Verilog literals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'b", self.trits.len())?;
        for trit in self.trits.iter().rev() {
            write!(f, "{trit}")?;
        }
        Ok(())
    }
}
