//! Structuring-element atoms
//!
//! An atom is a small structuring element given as a list of pixel offsets
//! `(dx, dy)`. Erosion with an atom computes `AND src(p + o)`, dilation
//! `OR src(p - o)`. Its padding is the largest offset component, i.e. the
//! number of pixels the source must be padded with on every side.
//!
//! Large shapes are composed from atoms in sequence. Most atoms are stored
//! as perimeter sets: only the offsets on the rim of the shape are kept,
//! because the earlier atoms of every sequence they appear in already fill
//! the interior. A perimeter line keeps its two end points; any other
//! perimeter atom is `B \ (B ⊖ D)`, the shape `B` minus its erosion by a
//! small diamond `D` whose radius is the rim width.
//!
//! # Atom tables
//!
//! | family     | index 0          | index 1    | perimeter atoms (radius) |
//! |------------|------------------|------------|--------------------------|
//! | horizontal | 1x2 finalizer    | 1x3        | 1, 2, 3, 4, 6, 7, 8, 12, 14, 15 |
//! | vertical   | 2x1 finalizer    | 3x1        | same |
//! | diamond    | unused           | 3x3 diamond | same |
//! | octagon    | 1x3, then 3x1    | index 2: 3x3 square | octagons 5x5 to 31x31 |
//! | disc       | 3x3 diamond      | index 3: 7x7 disc | discs 9x9 to 25x25 |

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

/// Pixel offset `(dx, dy)`.
pub type Offset = (isize, isize);

type Set = BTreeSet<Offset>;

/// One atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    name: String,
    pad: usize,
    offsets: Vec<Offset>,
    full: Vec<Offset>,
}

impl Atom {
    fn new(name: impl Into<String>, full: Set, rim: Option<isize>) -> Self {
        let offsets = match rim {
            Some(rim) => perimeter(&full, rim),
            None => full.clone(),
        };
        Self::with_offsets(name, full, offsets)
    }

    /// Line atom visiting its two end points only.
    fn line_ends(name: impl Into<String>, full: Set) -> Self {
        let ends = [full.first(), full.last()].into_iter().flatten().copied().collect();
        Self::with_offsets(name, full, ends)
    }

    fn with_offsets(name: impl Into<String>, full: Set, offsets: Set) -> Self {
        let pad = full
            .iter()
            .map(|&(dx, dy)| dx.unsigned_abs().max(dy.unsigned_abs()))
            .max()
            .unwrap_or(0);
        Atom {
            name: name.into(),
            pad,
            offsets: offsets.into_iter().collect(),
            full: full.into_iter().collect(),
        }
    }

    /// Kernel name, e.g. `line_1x5_p`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required source padding in pixels.
    pub fn pad(&self) -> usize {
        self.pad
    }

    /// Offsets the kernel visits.
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// Offsets of the complete shape the atom stands for.
    pub fn full(&self) -> &[Offset] {
        &self.full
    }

    /// Whether only the rim of the shape is visited.
    pub fn is_perimeter(&self) -> bool {
        self.offsets.len() < self.full.len()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (pad {})", self.name, self.pad)
    }
}

/// Atom table selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Horizontal,
    Vertical,
    Diamond,
    Octagon,
    Disc,
}

impl Family {
    /// Atom table of this family.
    pub fn atoms(self) -> &'static [Atom] {
        let tables = TABLES.get_or_init(AtomTables::build);
        match self {
            Family::Horizontal => &tables.horizontal,
            Family::Vertical => &tables.vertical,
            Family::Diamond => &tables.diamond,
            Family::Octagon => &tables.octagon,
            Family::Disc => &tables.disc,
        }
    }
}

/// Radii of the generic line and diamond atoms at indices 2 and up.
const GENERIC_RADII: [isize; 10] = [1, 2, 3, 4, 6, 7, 8, 12, 14, 15];

/// (square half-side, diamond radius) of the octagon atoms at indices 4
/// and up; each is a square dilated by a diamond.
const OCTAGON_PARTS: [(isize, isize); 9] =
    [(1, 1), (1, 2), (2, 2), (2, 4), (3, 4), (3, 5), (5, 7), (6, 8), (6, 9)];

/// Row half-widths (from the centre row outwards) of the disc atoms at
/// indices 3 and up.
const DISC_PROFILES: [&[isize]; 9] = [
    &[3, 2, 2, 0],
    &[3, 2, 2, 0],
    &[4, 3, 3, 3, 0],
    &[5, 4, 4, 4, 4, 0],
    &[6, 5, 5, 5, 5, 4, 0],
    &[7, 6, 6, 6, 6, 5, 4, 0],
    &[8, 7, 7, 7, 7, 7, 6, 5, 0],
    &[9, 8, 8, 8, 8, 8, 7, 6, 5, 0],
    &[12, 11, 11, 11, 11, 11, 11, 10, 9, 8, 7, 6, 0],
];

/// Rim width of the perimeter disc atoms.
const DISC_RIM: isize = 2;

static TABLES: OnceLock<AtomTables> = OnceLock::new();

struct AtomTables {
    horizontal: Vec<Atom>,
    vertical: Vec<Atom>,
    diamond: Vec<Atom>,
    octagon: Vec<Atom>,
    disc: Vec<Atom>,
}

impl AtomTables {
    fn build() -> Self {
        let mut horizontal = vec![
            Atom::new("line_1x2", [(0, 0), (1, 0)].into(), None),
            Atom::new("line_1x3", hline(1), None),
        ];
        let mut vertical = vec![
            Atom::new("line_2x1", [(0, 0), (0, 1)].into(), None),
            Atom::new("line_3x1", vline(1), None),
        ];
        let mut diamond = vec![
            Atom::new("none", [(0, 0)].into(), None),
            Atom::new("diamond_3x3", diamond_set(1), None),
        ];
        for r in GENERIC_RADII {
            let n = 2 * r + 1;
            horizontal.push(Atom::line_ends(format!("line_1x{n}_p"), hline(r)));
            vertical.push(Atom::line_ends(format!("line_{n}x1_p"), vline(r)));
            diamond.push(Atom::new(format!("diamond_{n}x{n}_p"), diamond_set(r), Some(1)));
        }

        let mut octagon = vec![
            Atom::new("line_1x3", hline(1), None),
            Atom::new("line_3x1", vline(1), None),
            Atom::new("square_3x3_p", square(1), Some(1)),
            Atom::new("diamond_3x3_p", diamond_set(1), Some(1)),
        ];
        for (s, d) in OCTAGON_PARTS {
            let n = 2 * (s + d) + 1;
            let shape = minkowski(&square(s), &diamond_set(d));
            octagon.push(Atom::new(format!("octagon_{n}x{n}_p"), shape, Some(1)));
        }

        let mut disc = vec![
            Atom::new("diamond_3x3", diamond_set(1), None),
            Atom::new("diamond_5x5_p", diamond_set(2), Some(DISC_RIM)),
            Atom::new("diamond_7x7_p", diamond_set(3), Some(DISC_RIM)),
        ];
        for (k, widths) in DISC_PROFILES.iter().enumerate() {
            let n = 2 * widths[0] + 1;
            let atom = if k == 0 {
                Atom::new(format!("disc_{n}x{n}"), profile(widths), None)
            } else {
                Atom::new(format!("disc_{n}x{n}_p"), profile(widths), Some(DISC_RIM))
            };
            disc.push(atom);
        }

        AtomTables {
            horizontal,
            vertical,
            diamond,
            octagon,
            disc,
        }
    }
}

fn hline(r: isize) -> Set {
    (-r..=r).map(|x| (x, 0)).collect()
}

fn vline(r: isize) -> Set {
    (-r..=r).map(|y| (0, y)).collect()
}

fn square(r: isize) -> Set {
    (-r..=r).flat_map(|y| (-r..=r).map(move |x| (x, y))).collect()
}

/// `|dx| + |dy| <= r`
pub(crate) fn diamond_set(r: isize) -> Set {
    square(r)
        .into_iter()
        .filter(|&(x, y)| x.abs() + y.abs() <= r)
        .collect()
}

/// Symmetric shape whose row `±y` spans `-widths[y]..=widths[y]`.
fn profile(widths: &[isize]) -> Set {
    let mut set = Set::new();
    for (y, &w) in widths.iter().enumerate() {
        let y = y as isize;
        for x in -w..=w {
            set.insert((x, y));
            set.insert((x, -y));
        }
    }
    set
}

/// Minkowski sum `a ⊕ b`.
pub(crate) fn minkowski(a: &Set, b: &Set) -> Set {
    a.iter()
        .flat_map(|&(ax, ay)| b.iter().map(move |&(bx, by)| (ax + bx, ay + by)))
        .collect()
}

/// Offsets of `shape` within distance `rim` of its outside.
fn perimeter(shape: &Set, rim: isize) -> Set {
    let probe = diamond_set(rim);
    shape
        .iter()
        .copied()
        .filter(|&(x, y)| probe.iter().any(|&(dx, dy)| !shape.contains(&(x + dx, y + dy))))
        .collect()
}
