use interval_fixture::{gen_n, random_gen_n, to_bytes, Fixture, DEFAULT_MAX_LEN};
use interval_store::{BackendKind, Config, Interval, Range, State, Tree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn trees() -> Vec<Tree<Fixture>> {
    [
        Config {
            backend: BackendKind::Llrb,
            ..Config::default()
        },
        Config::default(),
        Config {
            degree: 2,
            ..Config::default()
        },
    ]
    .iter()
    .map(|config| Tree::from_config(config).expect("valid config"))
    .collect()
}

fn ids<'a>(found: impl IntoIterator<Item = &'a Fixture>) -> Vec<u64> {
    let mut ids: Vec<u64> = found.into_iter().map(Interval::id).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn sequential_bulk_load() {
    for mut tree in trees() {
        for iv in gen_n(2000) {
            tree.insert(iv, true).expect("sequential ids");
        }
        assert_eq!(tree.state(), State::Dirty);
        tree.adjust_ranges();

        let query = Range::new(to_bytes(500), to_bytes(505));
        assert_eq!(ids(tree.get(&query)), (490..=505).collect::<Vec<u64>>());

        for iv in gen_n(2000) {
            assert_eq!(tree.delete(&iv, false), Ok(iv));
        }
        assert!(tree.is_empty());
    }
}

#[test]
fn random_bulk_load() {
    let mut rng = StdRng::seed_from_u64(0x1d);
    let batch = random_gen_n(&mut rng, 3000, 6);
    let queries = random_gen_n(&mut rng, 100, 6);

    for mut tree in trees() {
        for iv in &batch {
            tree.insert(iv.clone(), true).expect("sequential ids");
        }
        tree.adjust_ranges();
        assert_eq!(tree.len(), batch.len());

        for query in &queries {
            let should = ids(batch.iter().filter(|iv| query.range.overlaps_inclusive(&iv.range)));
            assert_eq!(ids(tree.get(&query.range)), should);
        }

        // interleave eager deletes with queries
        let mut remaining = batch.clone();
        while remaining.len() > 1000 {
            let iv = remaining.swap_remove(rng.gen_range(0..remaining.len()));
            tree.delete(&iv, false).expect("stored");
        }
        assert!(tree.is_clean());
        for query in &queries {
            let should = ids(
                remaining
                    .iter()
                    .filter(|iv| query.range.overlaps_inclusive(&iv.range)),
            );
            assert_eq!(ids(tree.get(&query.range)), should);
        }
    }
}

#[test]
fn long_keys() {
    let mut rng = StdRng::seed_from_u64(3);
    let batch = random_gen_n(&mut rng, 200, DEFAULT_MAX_LEN);
    for mut tree in trees() {
        for iv in &batch {
            tree.insert(iv.clone(), false).expect("sequential ids");
        }
        for iv in &batch {
            assert!(tree.lookup(&iv.range).contains(&iv));
        }
        let all: Vec<&Fixture> = tree.iter().collect();
        assert!(all.windows(2).all(|w| (&w[0].range, w[0].id) < (&w[1].range, w[1].id)));
    }
}
