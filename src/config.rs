//! Tree growing options.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::dataset::Record;
use crate::gini::{SummedGini, WeightedGini};
use crate::SplitCriterion;

/// How the partitions of a candidate split are aggregated into one score.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Plain sum of the partitions' Gini impurity.
    #[default]
    Summed,
    /// Size-weighted mean of the partitions' Gini impurity.
    Weighted
}

impl SplitCriterion for Criterion {
    fn score(&self, partitions: &[Vec<&Record>]) -> f64 {
        match *self {
            Criterion::Summed => SummedGini.score(partitions),
            Criterion::Weighted => WeightedGini.score(partitions)
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TreeConfig {
    pub criterion: Criterion,
    /// Grow sibling subtrees on the rayon thread pool.
    pub parallel: bool
}

impl TreeConfig {
    pub fn with_criterion(mut self, criterion: Criterion) -> TreeConfig {
        self.criterion = criterion;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> TreeConfig {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Criterion, TreeConfig};

    #[test]
    fn test_defaults() {
        let config = TreeConfig::default();
        assert_eq!(config.criterion, Criterion::Summed);
        assert!(!config.parallel);
    }

    #[test]
    fn test_serde_names() {
        let config = TreeConfig::default().with_criterion(Criterion::Weighted).with_parallel(true);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"criterion":"weighted","parallel":true}"#);
        let back: TreeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
