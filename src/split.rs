//! Choosing the feature a node splits on.

use crate::dataset::{subset, Feature, FeatureCatalog, Record};
use crate::SplitCriterion;

/// The feature chosen for a node and the criterion score it achieved.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Split<'c> {
    pub feature: &'c Feature,
    pub score: f64
}

/// One partition of `records` per value of `feature`, in catalog order.
/// Records without the feature land in no partition.
pub fn partition<'a>(records: &[&'a Record], feature: &Feature) -> Vec<Vec<&'a Record>> {
    feature.values.iter()
        .map(|v| subset(records, &feature.name, v))
        .collect()
}

/// Scores every feature of `catalog` against `records` and returns the one
/// with the lowest score. Only a strictly lower score replaces the current
/// best, so ties go to the feature that comes first in the catalog.
pub fn best_split<'c, C>(criterion: &C, records: &[&Record], catalog: &'c FeatureCatalog) -> Option<Split<'c>>
    where C: SplitCriterion
{
    let mut best: Option<Split<'c>> = None;

    for feature in catalog {
        let score = criterion.score(&partition(records, feature));
        if best.map_or(true, |b| score < b.score) {
            best = Some(Split {
                feature: feature,
                score: score
            });
        }
    }

    best
}
