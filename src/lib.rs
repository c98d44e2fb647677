//! Categorical decision trees.
//!
//! A tree is grown greedily: every node splits on the feature whose
//! partitions score lowest under a Gini based [`SplitCriterion`], each
//! feature is used at most once along a path, and a node stops splitting when
//! it is pure or has no features left. Records are classified by following
//! their values down the tree and taking the majority vote of the leaf.
//!
//! ```
//! use decisiontree::{build, FeatureCatalog, Prediction, Record};
//!
//! let data = vec![
//!     Record::from_pairs("edible", vec![("odor", "none")]),
//!     Record::from_pairs("poisonous", vec![("odor", "foul")]),
//! ];
//! let catalog = FeatureCatalog::from_records(&data);
//! let root = build(&data, &catalog);
//!
//! let query = Record::from_pairs("?", vec![("odor", "foul")]);
//! assert_eq!(root.predict(&query), Prediction::Label("poisonous"));
//! ```

pub mod config;
pub mod dataset;
pub mod distribution;
pub mod encoded;
pub mod eval;
pub mod gini;
pub mod logging;
pub mod split;
pub mod tree;

pub use config::{Criterion, TreeConfig};
pub use dataset::{Feature, FeatureCatalog, Record};
pub use distribution::Prediction;
pub use gini::gini;
pub use tree::{build, predict, Node, TreeBuilder};

/// Scores a candidate split given the partition of the node's records for
/// each value of the candidate feature. Lower is better.
pub trait SplitCriterion {
    fn score(&self, partitions: &[Vec<&Record>]) -> f64;
}
