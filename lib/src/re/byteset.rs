use std::fmt::{Debug, Display, Formatter};

use bitvec::array::BitArray;
use bitvec::order::Lsb0;

/// A set of byte values.
///
/// Internally this is a 256-bits bitmap where the N-th bit is set if byte N
/// belongs to the set. Character classes in the syntax tree and class labels
/// in the automaton are both represented with this type.
#[derive(Clone)]
pub struct ByteSet(BitArray<[u8; 32], Lsb0>);

impl ByteSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(BitArray::new([0_u8; 32]))
    }

    /// Creates a set that contains every byte in `lo..=hi`.
    pub fn from_range(lo: u8, hi: u8) -> Self {
        let mut set = Self::new();
        set.insert_range(lo, hi);
        set
    }

    /// Adds a byte to the set.
    #[inline]
    pub fn insert(&mut self, byte: u8) {
        self.0.set(byte as usize, true);
    }

    /// Adds all the bytes in `lo..=hi` to the set. Does nothing if
    /// `lo > hi`.
    pub fn insert_range(&mut self, lo: u8, hi: u8) {
        if lo <= hi {
            self.0[lo as usize..=hi as usize].fill(true);
        }
    }

    /// Returns true if `byte` belongs to the set.
    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.0[byte as usize]
    }

    /// Number of bytes in the set.
    #[inline]
    pub fn count(&self) -> usize {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.not_any()
    }

    /// Returns an iterator over the bytes in the set, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter_ones().map(|i| i as u8)
    }

    /// If the set is a single contiguous run of byte values returns the
    /// first and last byte in the run.
    pub fn as_range(&self) -> Option<(u8, u8)> {
        let first = self.0.first_one()?;
        let last = self.0.last_one()?;
        if last - first + 1 == self.count() {
            Some((first as u8, last as u8))
        } else {
            None
        }
    }

    /// Returns the contiguous runs of bytes in the set as `(first, last)`
    /// pairs, in ascending order.
    pub fn ranges(&self) -> Vec<(u8, u8)> {
        let mut ranges: Vec<(u8, u8)> = Vec::new();
        for byte in self.iter() {
            match ranges.last_mut() {
                Some((_, last)) if *last as usize + 1 == byte as usize => {
                    *last = byte
                }
                _ => ranges.push((byte, byte)),
            }
        }
        ranges
    }

    /// Makes the set closed under ASCII case folding: for every ASCII
    /// letter in the set its counterpart in the other case is added.
    pub fn fold_ascii_case(&mut self) {
        for byte in b'A'..=b'Z' {
            let lower = byte.to_ascii_lowercase();
            if self.contains(byte) || self.contains(lower) {
                self.insert(byte);
                self.insert(lower);
            }
        }
    }
}

impl Default for ByteSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ByteSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.data == other.0.data
    }
}

impl Eq for ByteSet {}

impl FromIterator<u8> for ByteSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::new();
        for byte in iter {
            set.insert(byte);
        }
        set
    }
}

impl Display for ByteSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, (lo, hi)) in self.ranges().into_iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if lo == hi {
                write!(f, "{:#04x}", lo)?;
            } else {
                write!(f, "{:#04x}-{:#04x}", lo, hi)?;
            }
        }
        write!(f, "]")
    }
}

impl Debug for ByteSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ByteSet{}", self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::ByteSet;

    #[test]
    fn byte_set() {
        let mut s = ByteSet::new();

        assert!(s.is_empty());
        assert_eq!(s.as_range(), None);

        s.insert_range(b'a', b'c');

        assert_eq!(s.count(), 3);
        assert!(s.contains(b'b'));
        assert!(!s.contains(b'd'));
        assert_eq!(s.as_range(), Some((b'a', b'c')));

        s.insert(b'x');

        assert_eq!(s.as_range(), None);
        assert_eq!(s.ranges(), vec![(b'a', b'c'), (b'x', b'x')]);
        assert_eq!(s.to_string(), "[0x61-0x63 0x78]");
        assert_eq!(s.iter().collect::<Vec<_>>(), b"abcx".to_vec());
    }

    #[test]
    fn full_range() {
        let s = ByteSet::from_range(0x00, 0xff);
        assert_eq!(s.count(), 256);
        assert_eq!(s.as_range(), Some((0x00, 0xff)));
        assert_eq!(s.to_string(), "[0x00-0xff]");
    }

    #[test]
    fn fold_case() {
        let mut s: ByteSet = b"aZ0".iter().copied().collect();
        s.fold_ascii_case();
        assert_eq!(s.iter().collect::<Vec<_>>(), b"0AZaz".to_vec());
    }
}
