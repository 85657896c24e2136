//! Policies deciding when two ranges intersect.

use std::fmt;

use crate::range::Range;

/// Decides whether two ranges are considered overlapping.
///
/// Implementations must be symmetric. Queries prune subtrees whose largest
/// end sorts before the query start and stop scanning once interval starts
/// pass the query end, so `overlaps(a, b)` must never hold unless the two
/// ranges also overlap when both ends are treated as inclusive.
pub trait Overlapper: fmt::Debug + Send + Sync {
    fn overlaps(&self, a: &Range, b: &Range) -> bool;
}

/// Both ends inclusive: `[a.start, a.end]` meets `[b.start, b.end]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InclusiveOverlapper;

impl Overlapper for InclusiveOverlapper {
    fn overlaps(&self, a: &Range, b: &Range) -> bool {
        a.overlaps_inclusive(b)
    }
}

/// End exclusive: `[a.start, a.end)` meets `[b.start, b.end)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExclusiveOverlapper;

impl Overlapper for ExclusiveOverlapper {
    fn overlaps(&self, a: &Range, b: &Range) -> bool {
        a.overlaps_exclusive(b)
    }
}

impl<O: Overlapper + ?Sized> Overlapper for &O {
    fn overlaps(&self, a: &Range, b: &Range) -> bool {
        (**self).overlaps(a, b)
    }
}

impl<O: Overlapper + ?Sized> Overlapper for Box<O> {
    fn overlaps(&self, a: &Range, b: &Range) -> bool {
        (**self).overlaps(a, b)
    }
}
