//! Buffer overlap checks
//!
//! Safe Rust cannot alias a mutable destination with another buffer, so
//! these checks only matter where buffers arrive as raw addresses (the C
//! ABI). Each buffer is described by its first-row address `p`, its row
//! dimension `d` and an access window `[p + lo, p + d*(h-1) + hi)` that the
//! operation may touch. Two buffers are accepted when one window ends
//! before the other begins.
//!
//! # See also
//!
//! `rapp_util.h` (`RAPP_VALIDATE_RESTRICT*`)

/// One buffer's access window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Address of the first row
    pub addr: usize,
    /// Row dimension in bytes (0 for flat buffers)
    pub dim: usize,
    /// Window start relative to `addr`
    pub lo: isize,
    /// Window end relative to the last row
    pub hi: isize,
}

impl Window {
    /// Window `[addr + lo, addr + dim*(height-1) + hi)`.
    pub fn new(addr: usize, dim: usize, lo: isize, hi: isize) -> Self {
        Window { addr, dim, lo, hi }
    }

    /// Window `[addr, addr + dim*(height-1) + len)`.
    pub fn plus(addr: usize, dim: usize, len: usize) -> Self {
        Window::new(addr, dim, 0, len as isize)
    }

    fn first(&self) -> i128 {
        self.addr as i128 + self.lo as i128
    }

    fn end(&self, height: usize) -> i128 {
        self.addr as i128 + (self.dim as i128) * (height as i128 - 1) + self.hi as i128
    }
}

/// Whether two windows over `height` rows are disjoint.
pub fn disjoint(a: Window, b: Window, height: usize) -> bool {
    a.end(height) <= b.first() || b.end(height) <= a.first()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_rows() {
        let a = Window::plus(1000, 64, 16);
        let b = Window::plus(1000 + 4 * 64, 64, 16);
        assert!(disjoint(a, b, 4));
        assert!(!disjoint(a, b, 5));
    }

    #[test]
    fn test_negative_lead() {
        let a = Window::plus(2000, 0, 100);
        let b = Window::new(2116, 32, -16, 16);
        assert!(disjoint(a, b, 1));
        let b = Window::new(2115, 32, -16, 16);
        assert!(!disjoint(a, b, 1));
    }

    #[test]
    fn test_symmetric() {
        let a = Window::new(500, 16, -8, 24);
        let b = Window::plus(300, 16, 16);
        assert_eq!(disjoint(a, b, 3), disjoint(b, a, 3));
    }
}
