//! Decomposition sequences
//!
//! Each entry lists the atom indices to apply, in order, for one size of a
//! structuring element. The composition of the atoms (their Minkowski sum)
//! equals the requested element.
//!
//! - generic entries serve rectangles (index `(size - 3) / 2` for odd sizes
//!   3..=63) and diamonds (index `radius - 2`); even rectangle sides append
//!   atom 0, the two-pixel finalizer
//! - octagon and disc entries are indexed by `radius - 2`, radius 2..=32

use crate::atom::Family;
use std::fmt;

/// Longest sequence in any table.
pub const MAX_STEPS: usize = 7;

/// Largest rectangle side.
pub const MAX_SIDE: usize = 63;

/// Isotropic radius range.
pub const MIN_RADIUS: usize = 2;
/// Isotropic radius range.
pub const MAX_RADIUS: usize = 32;

pub(crate) const GENERIC: [&[u8]; 31] = [
    &[1],
    &[1, 2],
    &[1, 2, 2],
    &[1, 2, 3],
    &[1, 2, 3, 2],
    &[1, 2, 3, 3],
    &[1, 2, 3, 4],
    &[1, 2, 3, 5],
    &[1, 2, 3, 5, 2],
    &[1, 2, 3, 5, 3],
    &[1, 2, 3, 5, 4],
    &[1, 2, 3, 5, 5],
    &[1, 2, 3, 4, 6],
    &[1, 2, 3, 5, 6],
    &[1, 2, 3, 5, 7],
    &[1, 2, 3, 5, 8],
    &[1, 2, 3, 5, 8, 2],
    &[1, 2, 3, 5, 8, 3],
    &[1, 2, 3, 5, 8, 4],
    &[1, 2, 3, 5, 8, 5],
    &[1, 2, 3, 5, 7, 6],
    &[1, 2, 3, 5, 8, 6],
    &[1, 2, 3, 5, 8, 7],
    &[1, 2, 3, 5, 8, 8],
    &[1, 2, 3, 4, 6, 9],
    &[1, 2, 3, 4, 7, 9],
    &[1, 2, 3, 5, 7, 9],
    &[1, 2, 3, 5, 8, 9],
    &[1, 2, 3, 5, 7, 10],
    &[1, 2, 3, 5, 7, 11],
    &[1, 2, 3, 5, 8, 11],
];

pub(crate) const OCTAGON: [&[u8]; 31] = [
    &[0, 1],
    &[0, 1, 3],
    &[0, 1, 3, 3],
    &[0, 1, 3, 4],
    &[0, 1, 3, 4, 3],
    &[0, 1, 3, 4, 4],
    &[0, 1, 3, 4, 5],
    &[0, 1, 3, 4, 6],
    &[0, 1, 3, 4, 6, 3],
    &[0, 1, 3, 4, 5, 5],
    &[0, 1, 3, 4, 6, 5],
    &[0, 1, 2, 3, 5, 7],
    &[0, 1, 3, 4, 5, 7],
    &[0, 1, 3, 4, 6, 7],
    &[0, 1, 3, 4, 6, 8],
    &[0, 1, 3, 4, 6, 9],
    &[0, 1, 3, 4, 6, 9, 3],
    &[0, 1, 3, 4, 6, 9, 4],
    &[0, 1, 3, 4, 6, 9, 5],
    &[0, 1, 3, 4, 6, 9, 6],
    &[0, 1, 3, 4, 6, 8, 7],
    &[0, 1, 3, 4, 6, 9, 7],
    &[0, 1, 3, 4, 6, 9, 8],
    &[0, 1, 3, 4, 6, 9, 9],
    &[0, 1, 3, 4, 5, 7, 10],
    &[0, 1, 3, 4, 5, 8, 10],
    &[0, 1, 3, 4, 6, 8, 10],
    &[0, 1, 3, 4, 6, 9, 10],
    &[0, 1, 3, 4, 5, 9, 11],
    &[0, 1, 3, 4, 6, 8, 12],
    &[0, 1, 3, 4, 6, 9, 12],
];

pub(crate) const DISC: [&[u8]; 31] = [
    &[0],
    &[0, 0],
    &[3],
    &[3, 0],
    &[0, 4, 0],
    &[3, 4],
    &[0, 4, 4],
    &[0, 3, 5],
    &[0, 4, 5, 0],
    &[0, 4, 6, 0],
    &[0, 4, 7, 0],
    &[0, 4, 7, 1],
    &[0, 4, 7, 4],
    &[0, 4, 8, 4],
    &[0, 4, 8, 5],
    &[0, 4, 8, 5, 0],
    &[0, 4, 8, 5, 1],
    &[0, 4, 8, 5, 4],
    &[0, 4, 9, 5, 2],
    &[0, 4, 9, 6, 2],
    &[0, 4, 9, 8, 1],
    &[0, 4, 9, 8, 4],
    &[0, 4, 8, 10, 4],
    &[0, 4, 8, 10, 5],
    &[0, 4, 7, 11, 4],
    &[0, 4, 8, 11, 4],
    &[0, 4, 8, 11, 5],
    &[0, 4, 7, 11, 4, 4],
    &[0, 4, 8, 11, 4, 4],
    &[0, 4, 8, 11, 5, 4],
    &[0, 4, 9, 11, 5, 4],
];

/// Octagon areas in pixels, indexed by radius.
pub const OCTAGON_AREA: [usize; 32] = [
    0, 0, 9, 21, 37, 69, 97, 145, 185, 249, 301, 357, 445, 513, 585, 697, 817, 909, 1005, 1149,
    1257, 1417, 1537, 1661, 1845, 1981, 2121, 2329, 2545, 2705, 2869, 3109,
];

/// Disc areas in pixels, indexed by radius.
pub const DISC_AREA: [usize; 32] = [
    0, 0, 5, 13, 29, 49, 73, 105, 141, 197, 245, 317, 377, 441, 521, 597, 701, 789, 881, 993,
    1121, 1265, 1381, 1525, 1653, 1821, 1977, 2121, 2313, 2453, 2613, 2829,
];

/// Atom sequence over one atom table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    family: Family,
    steps: [u8; MAX_STEPS],
    len: usize,
    copy_padding: bool,
}

impl Sequence {
    fn from_entry(family: Family, entry: &[u8]) -> Self {
        let mut steps = [0; MAX_STEPS];
        steps[..entry.len()].copy_from_slice(entry);
        Sequence {
            family,
            steps,
            len: entry.len(),
            copy_padding: family == Family::Octagon,
        }
    }

    /// Sequence for one side of a rectangle, `size` in 1..=63.
    ///
    /// Size 1 gives an empty sequence and size 2 the lone finalizer.
    pub(crate) fn line(family: Family, size: usize) -> Self {
        let mut seq = if (3..=MAX_SIDE).contains(&size) {
            Self::from_entry(family, GENERIC[(size - 3) / 2])
        } else {
            Self::from_entry(family, &[])
        };
        if size % 2 == 0 {
            // The slot after the last entry is atom 0
            seq.len += 1;
        }
        seq
    }

    pub(crate) fn diamond(radius: usize) -> Self {
        Self::from_entry(Family::Diamond, GENERIC[radius - MIN_RADIUS])
    }

    pub(crate) fn octagon(radius: usize) -> Self {
        Self::from_entry(Family::Octagon, OCTAGON[radius - MIN_RADIUS])
    }

    pub(crate) fn disc(radius: usize) -> Self {
        Self::from_entry(Family::Disc, DISC[radius - MIN_RADIUS])
    }

    /// Atom table the steps index.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Atom indices in application order.
    pub fn steps(&self) -> &[u8] {
        &self.steps[..self.len]
    }

    /// Whether the second step takes its top and bottom padding rows from
    /// the original source instead of clamping. Octagon sequences start
    /// with a horizontal then a vertical line, and the vertical line must
    /// see the real source rows beyond the image.
    pub fn copies_padding(&self) -> bool {
        self.copy_padding
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atoms = self.family.atoms();
        for (k, &idx) in self.steps().iter().enumerate() {
            if k > 0 {
                f.write_str(" + ")?;
            }
            f.write_str(atoms[idx as usize].name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_sequences() {
        assert!(Sequence::line(Family::Horizontal, 1).is_empty());
        assert_eq!(Sequence::line(Family::Horizontal, 2).steps(), &[0]);
        assert_eq!(Sequence::line(Family::Horizontal, 3).steps(), &[1]);
        assert_eq!(Sequence::line(Family::Horizontal, 4).steps(), &[1, 0]);
        assert_eq!(Sequence::line(Family::Vertical, 9).steps(), &[1, 2, 3]);
        assert_eq!(Sequence::line(Family::Vertical, 63).steps(), &[1, 2, 3, 5, 8, 11]);
        assert_eq!(Sequence::line(Family::Vertical, 62).steps(), &[1, 2, 3, 5, 7, 11, 0]);
    }

    #[test]
    fn test_indices_stay_in_tables() {
        let tables: [(&[&[u8]; 31], Family); 3] = [
            (&GENERIC, Family::Horizontal),
            (&OCTAGON, Family::Octagon),
            (&DISC, Family::Disc),
        ];
        for (table, family) in tables {
            let count = family.atoms().len();
            for entry in table.iter() {
                assert!(entry.len() <= MAX_STEPS);
                assert!(entry.iter().all(|&i| (i as usize) < count));
            }
        }
    }

    #[test]
    fn test_only_octagons_copy_padding() {
        assert!(Sequence::octagon(5).copies_padding());
        assert!(!Sequence::disc(5).copies_padding());
        assert!(!Sequence::diamond(5).copies_padding());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Sequence::line(Family::Horizontal, 6).to_string(),
            "line_1x3 + line_1x3_p + line_1x2"
        );
    }
}
