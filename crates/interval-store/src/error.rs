use crate::interval::Id;
use crate::range::{Comparable, Range};

/// The smallest B-tree degree accepted.
pub const MIN_DEGREE: usize = 2;

/// The largest B-tree degree accepted, so that `2 * degree` fits a `usize`.
pub const MAX_DEGREE: usize = usize::MAX / 2;

/// Reasons a tree operation is rejected. A rejected operation leaves the tree
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("inverted range: start {start} sorts after end {end}")]
    InvertedRange { start: Comparable, end: Comparable },
    #[error("interval {id} over {range} is already stored")]
    Duplicate { range: Range, id: Id },
    #[error("no interval {id} over {range} is stored")]
    NotFound { range: Range, id: Id },
    #[error("B-tree degree {0} is outside {min}..={max}", min = MIN_DEGREE, max = MAX_DEGREE)]
    InvalidDegree(usize),
}

impl Error {
    pub(crate) fn inverted(range: &Range) -> Error {
        Error::InvertedRange {
            start: range.start.clone(),
            end: range.end.clone(),
        }
    }

    pub(crate) fn duplicate(range: &Range, id: Id) -> Error {
        Error::Duplicate { range: range.clone(), id }
    }

    pub(crate) fn not_found(range: &Range, id: Id) -> Error {
        Error::NotFound { range: range.clone(), id }
    }
}
