//! Gini impurity and the split criteria built on it.

use crate::dataset::Record;
use crate::distribution::LabelCounts;
use crate::SplitCriterion;

/// Scores a split by adding up the Gini impurity of every partition, without
/// weighting partitions by their size.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummedGini;

impl SplitCriterion for SummedGini {
    fn score(&self, partitions: &[Vec<&Record>]) -> f64 {
        partitions.iter()
            .map(|p| gini(p.iter().copied()))
            .sum()
    }
}

/// Scores a split by the size-weighted mean Gini impurity of its partitions.
/// Records that fell into no partition do not count toward the weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedGini;

impl SplitCriterion for WeightedGini {
    fn score(&self, partitions: &[Vec<&Record>]) -> f64 {
        let total: usize = partitions.iter().map(Vec::len).sum();
        if total == 0 {
            return 0f64;
        }
        partitions.iter()
            .map(|p| gini(p.iter().copied()) * p.len() as f64 / total as f64)
            .sum()
    }
}

/// 1 - Σ p_j² over the label frequencies of `records`. An empty set has
/// impurity 0.
pub fn gini<'a, I>(records: I) -> f64
    where I: IntoIterator<Item=&'a Record>
{
    let counts = LabelCounts::from_records(records);
    let total = counts.total();
    if total == 0 {
        return 0f64;
    }

    let mut impurity = 1f64;
    for (_, count) in counts.iter() {
        let prob = count as f64 / total as f64;
        impurity -= prob * prob;
    }

    impurity
}
