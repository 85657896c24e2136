//! Interval generators for exercising `interval-store`.
//!
//! Provides a concrete [`Interval`] type plus deterministic and randomized
//! batches of them.

use interval_store::{Comparable, Id, Interval, Range};
use rand::Rng;

/// The longest key `random_gen_n` produces by default.
pub const DEFAULT_MAX_LEN: usize = 1024;

/// A plain interval owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fixture {
    pub range: Range,
    pub id: Id,
}

impl Fixture {
    pub fn new(range: Range, id: Id) -> Fixture {
        Fixture { range, id }
    }
}

impl Interval for Fixture {
    fn range(&self) -> &Range {
        &self.range
    }

    fn id(&self) -> Id {
        self.id
    }
}

/// Encode `n` as a four-byte big-endian key, so keys sort like the numbers.
pub fn to_bytes(n: u32) -> Comparable {
    Comparable::new(n.to_be_bytes())
}

/// `n` intervals `[i, i + 10]` with id `i`, in ascending order.
pub fn gen_n(n: u32) -> Vec<Fixture> {
    (0..n)
        .map(|i| Fixture::new(Range::new(to_bytes(i), to_bytes(i.saturating_add(10))), i as Id))
        .collect()
}

/// `n` intervals over random byte strings of length `1..=max_len`, with
/// sequential ids.
///
/// The two bounds of every range differ, and are ordered so that the range
/// is well formed.
pub fn random_gen_n<R: Rng + ?Sized>(rng: &mut R, n: usize, max_len: usize) -> Vec<Fixture> {
    let max_len = max_len.max(1);
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let a = random_key(rng, max_len);
        let b = random_key(rng, max_len);
        let range = match a.cmp(&b) {
            std::cmp::Ordering::Equal => continue,
            std::cmp::Ordering::Less => Range { start: a, end: b },
            std::cmp::Ordering::Greater => Range { start: b, end: a },
        };
        let id = out.len() as Id;
        out.push(Fixture::new(range, id));
    }
    out
}

fn random_key<R: Rng + ?Sized>(rng: &mut R, max_len: usize) -> Comparable {
    let len = rng.gen_range(1..=max_len);
    let mut bytes = vec![0; len];
    rng.fill(&mut bytes[..]);
    Comparable::new(bytes)
}
