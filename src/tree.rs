//! Growing a categorical decision tree and classifying records with it.

use rayon::prelude::*;
use serde::{Serialize, Serializer};
use tracing::{debug, info, trace};

use crate::config::{Criterion, TreeConfig};
use crate::dataset::{subset, FeatureCatalog, Record};
use crate::distribution::{majority_vote, Prediction};
use crate::gini::gini;
use crate::split::best_split;
use crate::SplitCriterion;

/// A node of the tree. Records are borrowed from the training set; children
/// are owned and keyed by the value of `feature`, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct Node<'a> {
    #[serde(rename = "samples", serialize_with = "serialize_len")]
    records: Vec<&'a Record>,
    impurity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    feature: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "serialize_children")]
    children: Vec<(String, Node<'a>)>
}

fn serialize_len<S: Serializer>(records: &[&Record], serializer: S) -> Result<S::Ok, S::Error> {
    records.len().serialize(serializer)
}

fn serialize_children<S: Serializer>(children: &[(String, Node)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(children.iter().map(|(value, child)| (value, child)))
}

impl<'a> Node<'a> {
    fn unsplit(records: Vec<&'a Record>, impurity: f64) -> Node<'a> {
        Node {
            records: records,
            impurity: impurity,
            feature: None,
            children: Vec::new()
        }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn impurity(&self) -> f64 {
        self.impurity
    }

    /// The feature this node splits on, `None` for leaves.
    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }

    pub fn children(&self) -> impl Iterator<Item=(&str, &Node<'a>)> {
        self.children.iter().map(|(value, child)| (value.as_str(), child))
    }

    pub fn child(&self, value: &str) -> Option<&Node<'a>> {
        self.children.iter()
            .find(|(v, _)| v == value)
            .map(|(_, child)| child)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of split levels below this node; 0 for a leaf.
    pub fn depth(&self) -> usize {
        self.children.iter()
            .map(|(_, c)| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|(_, c)| c.node_count()).sum::<usize>()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.children.iter().map(|(_, c)| c.leaf_count()).sum()
    }

    /// Calls `f` on every leaf with the split features leading to it, root first.
    pub fn for_each_leaf<F>(&self, mut f: F)
        where F: FnMut(&[&str], &Node<'a>)
    {
        let mut path = Vec::new();
        self.visit_leaves(&mut path, &mut f);
    }

    fn visit_leaves<'s, F>(&'s self, path: &mut Vec<&'s str>, f: &mut F)
        where F: FnMut(&[&str], &Node<'a>)
    {
        if self.is_leaf() {
            f(path.as_slice(), self);
            return;
        }
        if let Some(feature) = self.feature.as_deref() {
            path.push(feature);
        }
        for (_, child) in &self.children {
            child.visit_leaves(path, f);
        }
        if self.feature.is_some() {
            path.pop();
        }
    }

    /// Descends along the record's values and takes the majority vote of the
    /// leaf reached. Returns `Unresolved` as soon as the record has no value
    /// for a split feature or its value has no child.
    pub fn predict(&self, record: &Record) -> Prediction<'a> {
        let mut node = self;
        loop {
            if node.is_leaf() {
                return majority_vote(node.records.iter().copied());
            }
            let next = node.feature()
                .and_then(|f| record.get(f))
                .and_then(|v| node.child(v));
            match next {
                Some(child) => node = child,
                None => return Prediction::Unresolved
            }
        }
    }
}

/// Grows trees by repeatedly splitting on the feature with the lowest
/// criterion score.
#[derive(Debug, Clone)]
pub struct TreeBuilder<C = Criterion> {
    criterion: C,
    parallel: bool
}

impl TreeBuilder<Criterion> {
    pub fn from_config(config: &TreeConfig) -> TreeBuilder<Criterion> {
        TreeBuilder::new(config.criterion).parallel(config.parallel)
    }
}

impl Default for TreeBuilder<Criterion> {
    fn default() -> TreeBuilder<Criterion> {
        TreeBuilder::from_config(&TreeConfig::default())
    }
}

impl<C> TreeBuilder<C>
    where C: SplitCriterion + Sync
{
    pub fn new(criterion: C) -> TreeBuilder<C> {
        TreeBuilder {
            criterion: criterion,
            parallel: false
        }
    }

    pub fn parallel(mut self, parallel: bool) -> TreeBuilder<C> {
        self.parallel = parallel;
        self
    }

    pub fn build<'a>(&self, records: &'a [Record], catalog: &FeatureCatalog) -> Node<'a> {
        info!(records = records.len(), features = catalog.len(), "growing tree");
        let root = self.grow(records.iter().collect(), catalog);
        info!(
            nodes = root.node_count(),
            leaves = root.leaf_count(),
            depth = root.depth(),
            "tree complete"
        );
        root
    }

    /// Builds the subtree for `records` using only the features left in `catalog`.
    pub fn grow<'a>(&self, records: Vec<&'a Record>, catalog: &FeatureCatalog) -> Node<'a> {
        let impurity = gini(records.iter().copied());
        let mut node = Node::unsplit(records, impurity);

        if impurity == 0f64 {
            return node;
        }

        let split = match best_split(&self.criterion, &node.records, catalog) {
            Some(split) => split,
            None => {
                trace!(records = node.records.len(), impurity, "features exhausted");
                return node;
            }
        };
        let feature = &split.feature.name;
        debug!(
            feature = feature.as_str(),
            score = split.score,
            records = node.records.len(),
            impurity,
            "splitting node"
        );

        let remaining = catalog.without(feature);
        let records = &node.records;
        let grow_child = |value: &String| {
            let child = self.grow(subset(records, feature, value), &remaining);
            (value.clone(), child)
        };

        let children: Vec<(String, Node<'a>)> = if self.parallel {
            split.feature.values.par_iter().map(grow_child).collect()
        } else {
            split.feature.values.iter().map(grow_child).collect()
        };

        node.feature = Some(feature.clone());
        node.children = children;
        node
    }
}

/// Grows a tree with the default configuration.
pub fn build<'a>(records: &'a [Record], catalog: &FeatureCatalog) -> Node<'a> {
    TreeBuilder::<Criterion>::default().build(records, catalog)
}

/// Classifies `record` with the tree rooted at `root`.
pub fn predict<'a>(record: &Record, root: &Node<'a>) -> Prediction<'a> {
    root.predict(record)
}
