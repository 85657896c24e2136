use std::rc::Rc;

use crate::{
    range, BackendKind, Config, Error, ExclusiveOverlapper, InclusiveOverlapper, Interval,
    OverlapKind, Range, State, Tree,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Iv(Range, u64);

impl Interval for Iv {
    fn range(&self) -> &Range {
        &self.0
    }
    fn id(&self) -> u64 {
        self.1
    }
}

fn iv(start: u8, end: u8, id: u64) -> Iv {
    Iv(range([start], [end]), id)
}

fn trees() -> Vec<Tree<Iv>> {
    vec![
        Tree::llrb(InclusiveOverlapper),
        Tree::btree(InclusiveOverlapper, 2).expect("degree 2"),
        Tree::btree(InclusiveOverlapper, 3).expect("degree 3"),
        Tree::btree(InclusiveOverlapper, 32).expect("degree 32"),
    ]
}

fn ids<'a>(found: impl IntoIterator<Item = &'a Iv>) -> Vec<u64> {
    let mut ids: Vec<u64> = found.into_iter().map(|iv| iv.1).collect();
    ids.sort_unstable();
    ids
}

fn scenario() -> Vec<Iv> {
    vec![iv(1, 2, 0), iv(4, 6, 1), iv(0, 2, 2), iv(1, 6, 3), iv(5, 15, 4), iv(25, 30, 5)]
}

#[test]
fn test_scenario() {
    for fast in [false, true] {
        for mut t in trees() {
            for iv in scenario() {
                t.insert(iv, fast).expect("fresh interval");
            }
            assert_eq!(t.is_clean(), !fast);
            t.adjust_ranges();
            assert_eq!(t.len(), 6);
            assert_eq!(ids(t.get(&range([2u8], [5u8]))), [0, 1, 2, 3, 4]);
            assert_eq!(ids(t.get(&range([16u8], [24u8]))), Vec::<u64>::new());
            assert_eq!(ids(t.get(&range([15u8], [25u8]))), [4, 5]);
        }
    }
}

#[test]
fn test_exclusive_scenario() {
    let mut t = Tree::btree(ExclusiveOverlapper, 2).expect("degree 2");
    for iv in scenario() {
        t.insert(iv, false).expect("fresh interval");
    }
    assert_eq!(ids(t.get(&range([2u8], [5u8]))), [1, 3]);

    // the same tree answers inclusively on request
    assert_eq!(
        ids(t.get_with_overlapper(&range([2u8], [5u8]), &InclusiveOverlapper)),
        [0, 1, 2, 3, 4]
    );
}

#[test]
fn test_results_are_ascending() {
    for mut t in trees() {
        for iv in scenario() {
            t.insert(iv, false).expect("fresh interval");
        }
        let starts: Vec<&Range> = t
            .get(&range([0u8], [30u8]))
            .into_iter()
            .map(|iv| &iv.0)
            .collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(t.iter().len(), 6);
    }
}

#[test]
fn test_duplicate_ranges() {
    for mut t in trees() {
        t.insert(iv(3, 7, 0), false).expect("first");
        t.insert(iv(3, 7, 1), false).expect("same range, other id");
        assert_eq!(ids(t.lookup(&range([3u8], [7u8]))), [0, 1]);
        assert_eq!(ids(t.get(&range([5u8], [5u8]))), [0, 1]);

        assert_eq!(t.delete(&iv(3, 7, 1), false), Ok(iv(3, 7, 1)));
        assert_eq!(ids(t.get(&range([5u8], [5u8]))), [0]);
        assert!(t.contains(&iv(3, 7, 0)));
        assert!(!t.contains(&iv(3, 7, 1)));
    }
}

#[test]
fn test_degenerate_ranges() {
    for mut t in trees() {
        t.insert(iv(4, 4, 0), false).expect("degenerate");
        t.insert(iv(2, 6, 1), false).expect("fresh");
        t.insert(iv(5, 9, 2), false).expect("fresh");
        assert_eq!(ids(t.get(&range([4u8], [4u8]))), [0, 1]);
        assert_eq!(ids(t.get(&range([0u8], [4u8]))), [0, 1]);
        assert_eq!(ids(t.get(&range([5u8], [5u8]))), [1, 2]);
        assert_eq!(
            ids(t.get_with_overlapper(&range([4u8], [4u8]), &ExclusiveOverlapper)),
            [1]
        );
    }
}

#[test]
fn test_errors() {
    for mut t in trees() {
        t.insert(iv(1, 3, 0), false).expect("fresh");
        assert_eq!(
            t.insert(iv(1, 3, 0), false),
            Err(Error::Duplicate { range: range([1u8], [3u8]), id: 0 })
        );
        assert_eq!(
            t.insert(iv(3, 1, 1), true),
            Err(Error::InvertedRange { start: [3u8].into(), end: [1u8].into() })
        );
        assert_eq!(
            t.delete(&iv(1, 3, 1), false),
            Err(Error::NotFound { range: range([1u8], [3u8]), id: 1 })
        );
        assert_eq!(t.len(), 1);
        // rejected fast operations change nothing either
        assert!(t.is_clean());
    }
    assert!(matches!(Tree::<Iv>::btree(InclusiveOverlapper, 1), Err(Error::InvalidDegree(1))));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        Error::Duplicate { range: range("a", "b"), id: 4 }.to_string(),
        "interval 4 over [a, b] is already stored"
    );
    assert_eq!(
        Error::InvalidDegree(1).to_string(),
        format!("B-tree degree 1 is outside 2..={}", usize::MAX / 2)
    );
}

#[test]
fn test_state_transitions() {
    for mut t in trees() {
        assert_eq!(t.state(), State::Clean);
        t.insert(iv(1, 2, 0), true).expect("fresh");
        assert_eq!(t.state(), State::Dirty);
        t.insert(iv(2, 3, 1), false).expect("fresh");
        assert_eq!(t.state(), State::Dirty);
        t.adjust_ranges();
        assert_eq!(t.state(), State::Clean);
        t.delete(&iv(1, 2, 0), false).expect("stored");
        assert_eq!(t.state(), State::Clean);
        t.delete(&iv(2, 3, 1), true).expect("stored");
        assert_eq!(t.state(), State::Dirty);
        t.insert(iv(7, 9, 2), true).expect("fresh");
        t.clear();
        assert_eq!(t.state(), State::Clean);
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }
}

#[test]
fn test_adjust_ranges_is_idempotent() {
    for mut t in trees() {
        for i in 0..100u8 {
            t.insert(iv(i, i.saturating_add(i % 17), i as u64), true).expect("fresh");
        }
        t.adjust_ranges();
        let once = format!("{:?}", t);
        t.adjust_ranges();
        assert_eq!(once, format!("{:?}", t));
    }
}

#[test]
fn test_round_trip() {
    for mut t in trees() {
        let ivs: Vec<Iv> = (0..200u64)
            .map(|i| iv((i % 50) as u8, (i % 50 + i % 7) as u8, i))
            .collect();
        for iv in &ivs {
            t.insert(iv.clone(), false).expect("fresh");
        }
        assert_eq!(t.len(), 200);
        for iv in ivs.iter().rev() {
            assert_eq!(t.delete(iv, false).as_ref(), Ok(iv));
        }
        assert_eq!(t.len(), 0);
        assert!(t.is_empty());
        assert!(t.iter().next().is_none());
    }
}

#[test]
fn test_lookup_exact_range() {
    for fast in [false, true] {
        for mut t in trees() {
            // many neighbours sharing a start, and one range stored under several ids
            for i in 0..60u64 {
                t.insert(iv(10, 10 + (i % 20) as u8, i), fast).expect("fresh");
                t.insert(iv((i % 30) as u8, 40, 100 + i), fast).expect("fresh");
            }
            let in_order = |found: Vec<&Iv>| found.into_iter().map(|iv| iv.1).collect::<Vec<_>>();
            // the max ends are never repaired here when inserting fast
            assert_eq!(in_order(t.lookup(&range([10u8], [17u8]))), [7, 27, 47]);
            assert_eq!(in_order(t.lookup(&range([10u8], [10u8]))), [0, 20, 40]);
            assert_eq!(in_order(t.lookup(&range([10u8], [40u8]))), [110, 140]);
            assert_eq!(in_order(t.lookup(&range([3u8], [40u8]))), [103, 133]);
            assert!(t.lookup(&range([10u8], [30u8])).is_empty());
            assert!(t.lookup(&range([31u8], [40u8])).is_empty());
            assert_eq!(t.is_clean(), !fast);
        }
    }
}

#[test]
fn test_clone_is_independent() {
    for mut t in trees() {
        for iv in scenario() {
            t.insert(iv, false).expect("fresh interval");
        }
        let mut copy = t.clone();
        copy.delete(&iv(1, 6, 3), false).expect("stored in the copy");
        copy.insert(iv(16, 24, 6), true).expect("fresh in the copy");

        assert_eq!(t.len(), 6);
        assert!(t.is_clean());
        assert!(t.contains(&iv(1, 6, 3)));
        assert!(!t.contains(&iv(16, 24, 6)));
        assert_eq!(ids(t.get(&range([16u8], [24u8]))), Vec::<u64>::new());
        assert_eq!(ids(t.iter()), [0, 1, 2, 3, 4, 5]);

        copy.adjust_ranges();
        assert_eq!(copy.len(), 6);
        assert_eq!(ids(copy.get(&range([16u8], [24u8]))), [6]);
        assert_eq!(ids(copy.iter()), [0, 1, 2, 4, 5, 6]);

        // and the other way round
        t.clear();
        assert_eq!(copy.len(), 6);
        assert!(copy.contains(&iv(25, 30, 5)));
    }
}

fn random_iv(id: u64) -> Iv {
    let offset = rand::random::<u8>() % 200;
    let len = rand::random::<u8>() % 40;
    iv(offset, offset + len, id)
}

#[test]
fn test_overlapping_nontrivial() {
    for mut t in trees() {
        let mut stored = Vec::<Iv>::new();
        for i in 0..3000u64 {
            if rand::random::<u8>() % 3 != 0 || stored.is_empty() {
                let iv = random_iv(i);
                stored.push(iv.clone());
                t.insert(iv, false).expect("ids are unique");
            } else {
                let iv = stored.swap_remove(rand::random::<usize>() % stored.len());
                t.delete(&iv, false).expect("stored");
            }
            let query = random_iv(0).0;
            let should: Vec<u64> = ids(stored.iter().filter(|iv| query.overlaps_inclusive(&iv.0)));
            assert_eq!(should, ids(t.overlapping(&query)));
        }
        assert_eq!(t.len(), stored.len());
    }
}

#[test]
fn test_from_config() {
    let t = Tree::<Iv>::from_config(&Config::default()).expect("default config");
    assert_eq!(t.backend(), BackendKind::BTree);

    let config = Config {
        backend: BackendKind::Llrb,
        degree: 0,
        overlapper: OverlapKind::Exclusive,
    };
    let mut t = Tree::<Iv>::from_config(&config).expect("llrb ignores degree");
    assert_eq!(t.backend(), BackendKind::Llrb);
    t.insert(iv(1, 2, 0), false).expect("fresh");
    assert!(t.get(&range([2u8], [3u8])).is_empty());

    let config = Config {
        backend: BackendKind::BTree,
        degree: 1,
        overlapper: OverlapKind::Inclusive,
    };
    assert!(matches!(Tree::<Iv>::from_config(&config), Err(Error::InvalidDegree(1))));
}

#[test]
fn test_shared_elements() {
    let a = Rc::new(iv(1, 5, 0));
    let b = Rc::new(iv(3, 9, 1));
    for backend in [BackendKind::Llrb, BackendKind::BTree] {
        let config = Config { backend, ..Config::default() };
        let mut t = Tree::<Rc<Iv>>::from_config(&config).expect("valid config");
        t.insert(Rc::clone(&a), false).expect("fresh");
        t.insert(Rc::clone(&b), false).expect("fresh");
        assert_eq!(Rc::strong_count(&a), 2);
        let removed = t.delete(&*a, false).expect("stored");
        assert!(Rc::ptr_eq(&removed, &a));
        drop(removed);
        assert_eq!(Rc::strong_count(&a), 1);
        let left: Vec<Rc<Iv>> = t.into_iter().collect();
        assert_eq!(left, [Rc::clone(&b)]);
    }
}
