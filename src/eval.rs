//! Scoring a tree against labeled records.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::dataset::{FeatureCatalog, Record};
use crate::encoded::EncodedDataset;
use crate::tree::Node;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Score {
    pub correct: usize,
    /// Records whose path left the tree. They count as misses.
    pub unresolved: usize,
    pub total: usize
}

impl Score {
    /// Percentage of records predicted correctly, 0 when there are none.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0f64;
        }
        self.correct as f64 / self.total as f64 * 100f64
    }
}

pub fn evaluate(root: &Node, records: &[Record]) -> Score {
    let mut score = Score::default();
    for r in records {
        score.total += 1;
        match root.predict(r).label() {
            Some(label) if label == r.label() => score.correct += 1,
            Some(_) => {}
            None => score.unresolved += 1
        }
    }

    if score.unresolved > 0 {
        warn!(unresolved = score.unresolved, total = score.total, "records could not be classified");
    }
    info!("Score: {:.2} percent", score.accuracy());
    score
}

/// Errors raised while choosing the records a tree is trained and scored on.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("holdout fraction must be within [0, 1], got {0}")]
    InvalidFraction(f64),
    #[error("dataset has no test records; supply a test file or a holdout fraction")]
    NoTestData
}

/// Checks that `fraction` is a proportion of the records.
pub fn check_fraction(fraction: f64) -> Result<f64, EvalError> {
    if (0f64..=1f64).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(EvalError::InvalidFraction(fraction))
    }
}

/// Parses a holdout fraction given on the command line.
pub fn parse_fraction(text: &str) -> Result<f64, String> {
    let fraction: f64 = text.parse().map_err(|e| format!("`{}` is not a number: {}", text, e))?;
    check_fraction(fraction).map_err(|e| e.to_string())
}

/// Shuffles `records` with a seeded generator and moves `fraction` of them
/// into a test set. Returns `(train, test)`.
pub fn holdout(mut records: Vec<Record>, fraction: f64, seed: u64) -> Result<(Vec<Record>, Vec<Record>), EvalError> {
    let fraction = check_fraction(fraction)?;
    let mut rng = StdRng::seed_from_u64(seed);
    records.shuffle(&mut rng);

    let test_len = (records.len() as f64 * fraction).round() as usize;
    let test = records.split_off(records.len() - test_len);
    Ok((records, test))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holdout {
    pub fraction: f64,
    pub seed: u64
}

/// Records to grow the tree on, records to score it with, and the catalog
/// the tree may split on.
#[derive(Debug, Clone)]
pub struct TrainTest {
    pub train: Vec<Record>,
    pub test: Vec<Record>,
    pub catalog: FeatureCatalog
}

/// Splits a loaded dataset for one run. A holdout replaces the test file and
/// its catalog covers the training split only; without one the dataset must
/// carry test records.
pub fn train_test(dataset: EncodedDataset, holdout_by: Option<Holdout>) -> Result<TrainTest, EvalError> {
    match (holdout_by, dataset.test) {
        (Some(h), _) => {
            let (train, test) = holdout(dataset.train, h.fraction, h.seed)?;
            info!(train = train.len(), test = test.len(), "held out test records");
            let catalog = FeatureCatalog::from_records(&train);
            Ok(TrainTest { train: train, test: test, catalog: catalog })
        }
        (None, Some(test)) => Ok(TrainTest {
            train: dataset.train,
            test: test,
            catalog: dataset.catalog
        }),
        (None, None) => Err(EvalError::NoTestData)
    }
}
