use std::borrow::Borrow;
use std::fmt;

/// An ordered byte string, the key type every [`Range`] is built from.
///
/// Keys compare lexicographically byte by byte. When one key is a proper
/// prefix of the other, the shorter key sorts first.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Comparable(Vec<u8>);

impl Comparable {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Comparable {
        Comparable(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Comparable {
    fn from(bytes: Vec<u8>) -> Self {
        Comparable(bytes)
    }
}

impl From<&[u8]> for Comparable {
    fn from(bytes: &[u8]) -> Self {
        Comparable(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Comparable {
    fn from(bytes: &[u8; N]) -> Self {
        Comparable(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Comparable {
    fn from(bytes: [u8; N]) -> Self {
        Comparable(bytes.to_vec())
    }
}

impl From<&str> for Comparable {
    fn from(text: &str) -> Self {
        Comparable(text.as_bytes().to_vec())
    }
}

impl Borrow<[u8]> for Comparable {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Comparable {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Comparable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl fmt::Debug for Comparable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "b\"{}\"", self.0.escape_ascii())
    }
}

/// A span of keys from `start` to `end`.
///
/// A range is well formed when `start <= end`. Degenerate ranges where both
/// bounds are equal are allowed. Whether the bounds are inclusive or not is
/// up to the [`Overlapper`](crate::Overlapper) a tree is built with.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Range {
    /// The lower bound of the range.
    pub start: Comparable,
    /// The upper bound of the range.
    pub end: Comparable,
}

/// Shorthand to construct a new `Range`.
pub fn range(start: impl Into<Comparable>, end: impl Into<Comparable>) -> Range {
    Range::new(start, end)
}

impl Range {
    pub fn new(start: impl Into<Comparable>, end: impl Into<Comparable>) -> Range {
        Range {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Whether `start <= end`.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Whether the range is degenerate, i.e. `start == end`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Overlap treating both bounds of both ranges as inclusive.
    pub fn overlaps_inclusive(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Overlap treating the end of both ranges as exclusive.
    pub fn overlaps_exclusive(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}
