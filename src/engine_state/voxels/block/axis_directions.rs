//! # Axis Directions
//!
//! Bit flags naming the six faces of a block. A block's visibility mask is a union of
//! these flags; UV lookups and face templates take exactly one of them.

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// A set of block faces packed into the low six bits of a byte.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct AxisDirections(u8);

impl AxisDirections {
    /// No faces.
    pub const NONE: Self = Self(0);
    /// The face pointing along +X.
    pub const X_POSITIVE: Self = Self(1);
    /// The face pointing along -X.
    pub const X_NEGATIVE: Self = Self(2);
    /// The face pointing along +Y (top).
    pub const Y_POSITIVE: Self = Self(4);
    /// The face pointing along -Y (bottom).
    pub const Y_NEGATIVE: Self = Self(8);
    /// The face pointing along +Z.
    pub const Z_POSITIVE: Self = Self(16);
    /// The face pointing along -Z.
    pub const Z_NEGATIVE: Self = Self(32);
    /// Every face.
    pub const ALL: Self = Self(63);

    /// The six single-face flags in mask order.
    pub const FACES: [Self; 6] = [
        Self::X_POSITIVE,
        Self::X_NEGATIVE,
        Self::Y_POSITIVE,
        Self::Y_NEGATIVE,
        Self::Z_POSITIVE,
        Self::Z_NEGATIVE,
    ];

    /// The raw bit pattern.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` when every face in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` when no face is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of faces set.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// The faces in this set, in [`AxisDirections::FACES`] order.
    pub fn iter(self) -> impl Iterator<Item = AxisDirections> {
        Self::FACES.into_iter().filter(move |face| self.contains(*face))
    }

    /// Offset to the neighbouring cell across a single face.
    pub fn neighbour_offset(self) -> Option<(i32, i32, i32)> {
        match self {
            Self::X_POSITIVE => Some((1, 0, 0)),
            Self::X_NEGATIVE => Some((-1, 0, 0)),
            Self::Y_POSITIVE => Some((0, 1, 0)),
            Self::Y_NEGATIVE => Some((0, -1, 0)),
            Self::Z_POSITIVE => Some((0, 0, 1)),
            Self::Z_NEGATIVE => Some((0, 0, -1)),
            _ => None,
        }
    }
}

impl BitOr for AxisDirections {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AxisDirections {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AxisDirections {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for AxisDirections {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

impl std::fmt::Debug for AxisDirections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const NAMES: [&str; 6] = ["+X", "-X", "+Y", "-Y", "+Z", "-Z"];
        let names: Vec<&str> = Self::FACES
            .iter()
            .zip(NAMES)
            .filter(|(face, _)| self.contains(**face))
            .map(|(_, name)| name)
            .collect();
        write!(f, "AxisDirections({})", names.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_the_union_of_faces() {
        let union = AxisDirections::FACES
            .iter()
            .fold(AxisDirections::NONE, |acc, face| acc | *face);
        assert_eq!(union, AxisDirections::ALL);
        assert_eq!(AxisDirections::ALL.count(), 6);
    }

    #[test]
    fn complement_stays_within_six_faces() {
        assert_eq!((!AxisDirections::ALL).bits(), 0);
        assert_eq!(!AxisDirections::NONE, AxisDirections::ALL);
        assert_eq!((!AxisDirections::Y_POSITIVE).count(), 5);
    }

    #[test]
    fn iter_yields_only_set_faces() {
        let mask = AxisDirections::Y_POSITIVE | AxisDirections::Z_NEGATIVE;
        let faces: Vec<_> = mask.iter().collect();
        assert_eq!(faces, vec![AxisDirections::Y_POSITIVE, AxisDirections::Z_NEGATIVE]);
    }
}
