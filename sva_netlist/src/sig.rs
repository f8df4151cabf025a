//! Single-bit and multi-bit signal handles.

use contracts::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Index of a wire inside a [`crate::Module`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WireId {
    /// The underlying raw integer index.
    inner: u32,
}

impl WireId {
    /// Creates a wire id from a raw integer.
    #[ensures(ret.inner == id)]
    pub fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// Returns the index as a usize for array access.
    #[ensures(ret == self.inner as usize)]
    pub fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.inner)
    }
}

impl From<usize> for WireId {
    #[inline]
    #[requires(u32::try_from(id).is_ok(), "id must fit in 32 bits")]
    fn from(id: usize) -> Self {
        Self { inner: id as u32 }
    }
}

/// A single-bit signal: a constant or a wire.
///
/// Constants sort before wires, so a sorted [`SigSpec`] keeps them at the front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SigBit {
    /// A constant driver.
    Const(bool),
    /// The value carried by a wire.
    Wire(WireId),
}

impl SigBit {
    /// Constant false.
    pub const ZERO: Self = Self::Const(false);
    /// Constant true.
    pub const ONE: Self = Self::Const(true);

    /// Get the wire if this bit is not a constant.
    #[must_use]
    pub const fn as_wire(&self) -> Option<WireId> {
        match self {
            Self::Wire(id) => Some(*id),
            Self::Const(_) => None,
        }
    }
}

impl From<WireId> for SigBit {
    fn from(id: WireId) -> Self {
        Self::Wire(id)
    }
}

impl From<bool> for SigBit {
    fn from(value: bool) -> Self {
        Self::Const(value)
    }
}

impl fmt::Display for SigBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => write!(f, "{}", if *value { "1'b1" } else { "1'b0" }),
            Self::Wire(id) => write!(f, "{id}"),
        }
    }
}

/// An ordered group of bits, e.g. a conjunction of control signals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SigSpec {
    bits: Vec<SigBit>,
}

impl SigSpec {
    /// An empty spec.
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Number of bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the spec has no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bits, in order.
    #[must_use]
    pub fn bits(&self) -> &[SigBit] {
        &self.bits
    }

    /// Appends one bit.
    #[ensures(self.len() == old(self.len()) + 1)]
    pub fn append(&mut self, bit: SigBit) {
        self.bits.push(bit);
    }

    /// Appends every bit of `other`.
    pub fn extend(&mut self, other: &Self) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Sorts the bits and drops duplicates, giving a canonical form for
    /// order-insensitive uses such as conjunctions.
    pub fn sort_and_unify(&mut self) {
        self.bits.sort_unstable();
        self.bits.dedup();
    }

    /// Canonical copy, see [`Self::sort_and_unify`].
    #[must_use]
    pub fn sorted_unified(mut self) -> Self {
        self.sort_and_unify();
        self
    }

    /// Whether `bit` occurs in the spec.
    #[must_use]
    pub fn contains(&self, bit: SigBit) -> bool {
        self.bits.contains(&bit)
    }

    /// Position of `bit`, if present.
    #[must_use]
    pub fn position(&self, bit: SigBit) -> Option<usize> {
        self.bits.iter().position(|b| *b == bit)
    }

    /// Iterates the bits.
    pub fn iter(&self) -> std::slice::Iter<'_, SigBit> {
        self.bits.iter()
    }
}

impl Index<usize> for SigSpec {
    type Output = SigBit;

    fn index(&self, index: usize) -> &SigBit {
        &self.bits[index]
    }
}

impl From<SigBit> for SigSpec {
    fn from(bit: SigBit) -> Self {
        Self { bits: vec![bit] }
    }
}

impl From<Vec<SigBit>> for SigSpec {
    fn from(bits: Vec<SigBit>) -> Self {
        Self { bits }
    }
}

impl FromIterator<SigBit> for SigSpec {
    fn from_iter<I: IntoIterator<Item = SigBit>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SigSpec {
    type Item = &'a SigBit;
    type IntoIter = std::slice::Iter<'a, SigBit>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.iter()
    }
}

impl fmt::Display for SigSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bits.is_empty() {
            return write!(f, "{{}}");
        }

        if self.bits.len() == 1 {
            return write!(f, "{}", self.bits[0]);
        }

        write!(f, "{{")?;
        for (i, bit) in self.bits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{bit}")?;
        }
        write!(f, "}}")
    }
}
