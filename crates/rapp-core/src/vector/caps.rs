//! Backend capability descriptor
//!
//! Three operation pairs of the vector contract are semantically
//! equivalent: `cmpgt`/`cmpge`, `avgt`/`avgr` and `getmaskw`/`getmaskv`.
//! A backend records which members of each pair it implements natively and
//! which one it prefers. Every backend checks its descriptor in a `const`
//! assertion, so an invalid combination fails the build:
//!
//! - a hint may only name a natively implemented operation,
//! - at most one side of a pair may be hinted,
//! - when both sides are native, exactly one must be hinted.

/// Native implementation and preference flags for one operation pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pair {
    /// First member implemented natively
    pub first: bool,
    /// Second member implemented natively
    pub second: bool,
    /// First member preferred
    pub hint_first: bool,
    /// Second member preferred
    pub hint_second: bool,
}

impl Pair {
    /// Neither member native, no hint.
    pub const NONE: Pair = Pair {
        first: false,
        second: false,
        hint_first: false,
        hint_second: false,
    };

    /// Only the first member native.
    pub const FIRST: Pair = Pair {
        first: true,
        ..Pair::NONE
    };

    /// Only the second member native.
    pub const SECOND: Pair = Pair {
        second: true,
        ..Pair::NONE
    };

    /// Both native, first preferred.
    pub const BOTH_PREFER_FIRST: Pair = Pair {
        first: true,
        second: true,
        hint_first: true,
        hint_second: false,
    };

    /// Both native, second preferred.
    pub const BOTH_PREFER_SECOND: Pair = Pair {
        first: true,
        second: true,
        hint_first: false,
        hint_second: true,
    };

    /// Check the hint rules for this pair.
    pub const fn is_valid(&self) -> bool {
        if self.hint_first && !self.first {
            return false;
        }
        if self.hint_second && !self.second {
            return false;
        }
        if self.hint_first && self.hint_second {
            return false;
        }
        if self.first && self.second && !(self.hint_first || self.hint_second) {
            return false;
        }
        true
    }

    /// Whether the first member should be used when both are available.
    pub const fn prefers_first(&self) -> bool {
        self.hint_first || (self.first && !self.second)
    }
}

/// Capability descriptor of a vector backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caps {
    /// Unaligned load cursor (`LDINIT`/`LOADU`) supported
    pub loadu: bool,
    /// `cmpgt` (first) / `cmpge` (second)
    pub cmp: Pair,
    /// `avgt` (first) / `avgr` (second)
    pub avg: Pair,
    /// `getmaskw` (first) / `getmaskv` (second)
    pub getmask: Pair,
}

impl Caps {
    /// Validate all hint pairs.
    pub const fn is_valid(&self) -> bool {
        self.cmp.is_valid() && self.avg.is_valid() && self.getmask.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sides_are_valid() {
        assert!(Pair::NONE.is_valid());
        assert!(Pair::FIRST.is_valid());
        assert!(Pair::SECOND.is_valid());
        assert!(Pair::BOTH_PREFER_FIRST.is_valid());
        assert!(Pair::BOTH_PREFER_SECOND.is_valid());
    }

    #[test]
    fn test_hint_on_missing_op_rejected() {
        let p = Pair {
            first: true,
            second: false,
            hint_first: false,
            hint_second: true,
        };
        assert!(!p.is_valid());
    }

    #[test]
    fn test_double_hint_rejected() {
        let p = Pair {
            first: true,
            second: true,
            hint_first: true,
            hint_second: true,
        };
        assert!(!p.is_valid());
    }

    #[test]
    fn test_both_without_hint_rejected() {
        let p = Pair {
            first: true,
            second: true,
            ..Pair::NONE
        };
        assert!(!p.is_valid());
    }

    #[test]
    fn test_preference() {
        assert!(Pair::FIRST.prefers_first());
        assert!(!Pair::SECOND.prefers_first());
        assert!(Pair::BOTH_PREFER_FIRST.prefers_first());
        assert!(!Pair::BOTH_PREFER_SECOND.prefers_first());
    }
}
