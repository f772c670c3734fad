use log::info;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};

/// Share of rows held out for testing.
pub const TEST_FRACTION: f64 = 0.2;

/// Seed of the partition shuffle.
pub const SPLIT_SEED: u64 = 42;

/// Disjoint training and test subsets that together cover a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

/// Partitions `dataset` into training and test rows.
///
/// The test side gets `ceil(test_fraction · n)` rows. Row positions are
/// shuffled with a ChaCha8 generator seeded by `seed`; the first shuffled
/// positions form the test set and the rest the training set. The same
/// dataset, fraction and seed always give the same partition.
///
/// Fails with `InvalidFraction` unless `0 < test_fraction < 1`, or when
/// either side would end up empty.
pub fn train_test_split(dataset: &Dataset, test_fraction: f64, seed: u64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::InvalidFraction(test_fraction));
    }

    let n = dataset.n_rows();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(Error::InvalidFraction(test_fraction));
    }

    let mut positions: Vec<usize> = (0..n).collect();
    positions.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    let (test_idx, train_idx) = positions.split_at(n_test);

    let split = Split {
        train: dataset.select(train_idx),
        test: dataset.select(test_idx),
    };
    info!(
        "split {} rows into {} train / {} test (fraction {}, seed {})",
        n,
        split.train.n_rows(),
        split.test.n_rows(),
        test_fraction,
        seed
    );
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn numbered(n: usize) -> Dataset {
        Dataset::new(
            vec!["x".into()],
            "y",
            (0..n).map(|i| vec![i as f64]).collect(),
            (0..n).map(|i| (i * 2) as f64).collect(),
        )
        .unwrap()
    }

    #[test]
    fn partition_is_disjoint_and_complete_for_any_fraction() {
        let ds = numbered(101);
        for &fraction in &[0.01, 0.1, 0.2, 0.33, 0.5, 0.75, 0.99] {
            let split = train_test_split(&ds, fraction, SPLIT_SEED).unwrap();
            assert_eq!(split.train.n_rows() + split.test.n_rows(), ds.n_rows());

            let train: HashSet<usize> = split.train.row_ids().iter().copied().collect();
            let test: HashSet<usize> = split.test.row_ids().iter().copied().collect();
            assert!(train.is_disjoint(&test), "fraction {}", fraction);
            assert_eq!(train.union(&test).count(), ds.n_rows());
        }
    }

    #[test]
    fn same_seed_gives_identical_partition() {
        let ds = numbered(500);
        let a = train_test_split(&ds, TEST_FRACTION, SPLIT_SEED).unwrap();
        let b = train_test_split(&ds, TEST_FRACTION, SPLIT_SEED).unwrap();
        assert_eq!(a, b);

        let c = train_test_split(&ds, TEST_FRACTION, 7).unwrap();
        assert_ne!(a.test.row_ids(), c.test.row_ids());
    }

    #[test]
    fn rows_travel_with_their_targets() {
        let ds = numbered(50);
        let split = train_test_split(&ds, TEST_FRACTION, SPLIT_SEED).unwrap();
        for (row, target) in split.test.features().iter().zip(split.test.targets()) {
            assert_eq!(row[0] * 2.0, *target);
        }
    }

    #[test]
    fn full_size_dataset_splits_into_16512_and_4128() {
        let split = train_test_split(&numbered(20_640), TEST_FRACTION, SPLIT_SEED).unwrap();
        assert_eq!(split.train.n_rows(), 16_512);
        assert_eq!(split.test.n_rows(), 4_128);
    }

    #[test]
    fn out_of_range_fractions_are_rejected() {
        let ds = numbered(10);
        for &fraction in &[0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(matches!(
                train_test_split(&ds, fraction, SPLIT_SEED),
                Err(Error::InvalidFraction(_))
            ));
        }
        // 0.99 of 10 rows leaves nothing to train on.
        assert!(matches!(train_test_split(&ds, 0.99, SPLIT_SEED), Err(Error::InvalidFraction(_))));
    }
}
