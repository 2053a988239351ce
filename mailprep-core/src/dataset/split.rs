//! Stratified, seeded train/test partitioning.

use std::collections::BTreeMap;

use mailprep_types::{DatasetError, Label, TrainTestSplit};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use super::EmailDataset;

impl EmailDataset {
    /// Partitions records into train and test sets.
    ///
    /// The test set receives `ceil(test_size * len)` records. Each label
    /// contributes in proportion to its share of the dataset, with rounding
    /// leftovers handed to the labels with the largest fractional share. The
    /// same `seed` always yields the same partition.
    ///
    /// # Errors
    ///
    /// - `InvalidTestSize` unless `0 < test_size < 1`
    /// - `ClassTooSmall` if a label has fewer than two records
    /// - `PartitionTooSmall` if either side could not hold every label
    pub fn split(&self, test_size: f64, seed: u64) -> Result<TrainTestSplit, DatasetError> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(DatasetError::InvalidTestSize { test_size });
        }

        let n = self.len();
        let n_test = (test_size * n as f64).ceil() as usize;
        let n_train = n - n_test.min(n);

        let mut by_label: BTreeMap<Label, Vec<usize>> = BTreeMap::new();
        for (i, record) in self.records().iter().enumerate() {
            by_label.entry(record.label).or_default().push(i);
        }

        for (&label, rows) in &by_label {
            if rows.len() < 2 {
                return Err(DatasetError::ClassTooSmall {
                    label,
                    count: rows.len(),
                });
            }
        }

        let classes = by_label.len();
        if n_train < classes {
            return Err(DatasetError::PartitionTooSmall {
                partition: "train",
                size: n_train,
                classes,
            });
        }
        if n_test < classes {
            return Err(DatasetError::PartitionTooSmall {
                partition: "test",
                size: n_test,
                classes,
            });
        }

        let quotas = allocate(&by_label, n, n_test);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut train = Vec::with_capacity(n_train);
        let mut test = Vec::with_capacity(n_test);

        for ((label, rows), quota) in by_label.iter_mut().zip(quotas) {
            rows.shuffle(&mut rng);
            debug!(%label, test = quota, train = rows.len() - quota, "Label allocation");
            test.extend_from_slice(&rows[..quota]);
            train.extend_from_slice(&rows[quota..]);
        }

        // Interleave labels so neither side is grouped by class.
        train.shuffle(&mut rng);
        test.shuffle(&mut rng);

        let split = TrainTestSplit {
            train_texts: self.gather_texts(&train),
            test_texts: self.gather_texts(&test),
            train_labels: self.gather_labels(&train),
            test_labels: self.gather_labels(&test),
        };

        info!(
            train = split.train_len(),
            test = split.test_len(),
            seed,
            "Data split"
        );
        Ok(split)
    }

    fn gather_texts(&self, rows: &[usize]) -> Vec<Option<String>> {
        rows.iter().map(|&i| self.records()[i].text()).collect()
    }

    fn gather_labels(&self, rows: &[usize]) -> Vec<Label> {
        rows.iter().map(|&i| self.records()[i].label).collect()
    }
}

/// Largest-remainder allocation of `n_test` rows across labels, in map order.
fn allocate(by_label: &BTreeMap<Label, Vec<usize>>, n: usize, n_test: usize) -> Vec<usize> {
    let exact: Vec<f64> = by_label
        .values()
        .map(|rows| n_test as f64 * rows.len() as f64 / n as f64)
        .collect();

    let mut quotas: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let assigned: usize = quotas.iter().sum();

    let mut order: Vec<usize> = (0..exact.len()).collect();
    order.sort_by(|&a, &b| {
        let frac_a = exact[a] - exact[a].floor();
        let frac_b = exact[b] - exact[b].floor();
        frac_b.total_cmp(&frac_a).then(a.cmp(&b))
    });

    for &slot in order.iter().take(n_test.saturating_sub(assigned)) {
        quotas[slot] += 1;
    }

    // Keep at least one row of every label on each side.
    let sizes: Vec<usize> = by_label.values().map(Vec::len).collect();
    for slot in 0..quotas.len() {
        if quotas[slot] == 0 {
            if let Some(donor) = (0..quotas.len()).max_by_key(|&d| quotas[d]) {
                quotas[donor] -= 1;
                quotas[slot] += 1;
            }
        } else if quotas[slot] == sizes[slot] {
            if let Some(taker) = (0..quotas.len())
                .filter(|&t| quotas[t] + 1 < sizes[t])
                .max_by_key(|&t| sizes[t] - quotas[t])
            {
                quotas[slot] -= 1;
                quotas[taker] += 1;
            }
        }
    }

    quotas
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailprep_types::EmailRecord;

    fn dataset(spam: usize, ham: usize) -> EmailDataset {
        let records = (0..spam + ham)
            .map(|i| {
                let label = if i < spam { Label::Spam } else { Label::Ham };
                EmailRecord::new(i as u64 + 1, format!("subject {i}"), "body", label)
            })
            .collect();
        EmailDataset::from_records(records)
    }

    fn count(labels: &[Label], label: Label) -> usize {
        labels.iter().filter(|l| **l == label).count()
    }

    #[test]
    fn sample_eighty_twenty() {
        let split = EmailDataset::sample().split(0.2, 42).unwrap();
        assert_eq!(split.train_len(), 80);
        assert_eq!(split.test_len(), 20);
        assert_eq!(count(&split.test_labels, Label::Spam), 10);
        assert_eq!(count(&split.test_labels, Label::Ham), 10);
        assert_eq!(count(&split.train_labels, Label::Spam), 40);
    }

    #[test]
    fn parallel_vectors_line_up() {
        let split = dataset(30, 20).split(0.2, 1).unwrap();
        assert_eq!(split.train_texts.len(), split.train_labels.len());
        assert_eq!(split.test_texts.len(), split.test_labels.len());
    }

    #[test]
    fn same_seed_same_split() {
        let ds = dataset(40, 60);
        assert_eq!(ds.split(0.25, 9).unwrap(), ds.split(0.25, 9).unwrap());
    }

    #[test]
    fn different_seed_different_order() {
        let ds = EmailDataset::sample();
        let a = ds.split(0.2, 1).unwrap();
        let b = ds.split(0.2, 2).unwrap();
        assert_ne!(a.train_texts, b.train_texts);
    }

    #[test]
    fn partitions_cover_every_row_once() {
        let ds = dataset(13, 8);
        let split = ds.split(0.3, 5).unwrap();
        let mut all: Vec<_> = split
            .train_texts
            .iter()
            .chain(&split.test_texts)
            .cloned()
            .collect();
        all.sort();
        let mut expected = ds.texts();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn proportions_follow_label_shares() {
        // 7 of 21 rows held out: 13 * 7 / 21 = 4.33 spam, 8 * 7 / 21 = 2.67 ham.
        let split = dataset(13, 8).split(0.3, 5).unwrap();
        assert_eq!(split.test_len(), 7);
        assert_eq!(count(&split.test_labels, Label::Spam), 4);
        assert_eq!(count(&split.test_labels, Label::Ham), 3);
    }

    #[test]
    fn test_size_rounds_up() {
        let split = dataset(5, 5).split(0.15, 0).unwrap();
        assert_eq!(split.test_len(), 2);
        assert_eq!(split.train_len(), 8);
    }

    #[test]
    fn rejects_out_of_range_test_size() {
        let ds = EmailDataset::sample();
        for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                ds.split(bad, 42),
                Err(DatasetError::InvalidTestSize { .. })
            ));
        }
    }

    #[test]
    fn rejects_singleton_class() {
        let err = dataset(1, 10).split(0.2, 42).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ClassTooSmall { label: Label::Spam, count: 1 }
        ));
    }

    #[test]
    fn rejects_tiny_test_partition() {
        // ceil(0.1 * 4) = 1 test row cannot hold both labels.
        let err = dataset(2, 2).split(0.1, 42).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::PartitionTooSmall { partition: "test", size: 1, classes: 2 }
        ));
    }

    #[test]
    fn rejects_tiny_train_partition() {
        let err = dataset(2, 2).split(0.9, 42).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::PartitionTooSmall { partition: "train", size: 0, classes: 2 }
        ));
    }

    #[test]
    fn single_label_dataset_splits() {
        let split = dataset(10, 0).split(0.2, 3).unwrap();
        assert_eq!(split.test_len(), 2);
        assert!(split.test_labels.iter().all(|l| *l == Label::Spam));
    }

    #[test]
    fn every_label_on_both_sides() {
        let split = dataset(48, 2).split(0.1, 11).unwrap();
        assert_eq!(count(&split.test_labels, Label::Ham), 1);
        assert_eq!(count(&split.train_labels, Label::Ham), 1);
    }
}
