//! Aligned byte buffers
//!
//! `Vec<u8>` gives no alignment guarantee beyond one byte, so
//! [`AlignedBuf`] over-allocates by one alignment block and exposes the
//! aligned window inside it. The window is zero-initialized.

use crate::platform::ALIGNMENT;

/// Heap buffer whose first byte is [`ALIGNMENT`]-aligned.
#[derive(Debug)]
pub struct AlignedBuf {
    data: Vec<u8>,
    head: usize,
    len: usize,
}

impl AlignedBuf {
    /// Allocate `len` zeroed bytes.
    pub fn new(len: usize) -> Self {
        let data = vec![0u8; len + ALIGNMENT];
        let head = (ALIGNMENT - data.as_ptr() as usize % ALIGNMENT) % ALIGNMENT;
        AlignedBuf { data, head, len }
    }

    /// Usable length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Aligned contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.head..self.head + self.len]
    }

    /// Aligned contents, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[self.head..self.head + self.len]
    }
}

impl Clone for AlignedBuf {
    fn clone(&self) -> Self {
        let mut out = AlignedBuf::new(self.len);
        out.as_mut_slice().copy_from_slice(self.as_slice());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        for len in [0, 1, 15, 16, 17, 1000] {
            let buf = AlignedBuf::new(len);
            assert_eq!(buf.len(), len);
            assert_eq!(buf.as_slice().as_ptr() as usize % ALIGNMENT, 0);
            assert!(buf.as_slice().iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_clone_is_aligned_copy() {
        let mut buf = AlignedBuf::new(40);
        buf.as_mut_slice()[7] = 0x5a;
        let copy = buf.clone();
        assert_eq!(copy.as_slice()[7], 0x5a);
        assert_eq!(copy.as_slice().as_ptr() as usize % ALIGNMENT, 0);
    }
}
