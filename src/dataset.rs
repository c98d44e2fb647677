//! Labeled records and the catalog of feature values seen while training.

use std::collections::HashMap;

/// A labeled sample. Attributes map feature names to categorical values; a
/// feature missing from the map is unknown for this record.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Record {
    label: String,
    attributes: HashMap<String, String>
}

impl Record {
    pub fn new<L: Into<String>>(label: L, attributes: HashMap<String, String>) -> Record {
        Record {
            label: label.into(),
            attributes: attributes
        }
    }

    /// Convenience constructor from `(feature, value)` pairs.
    pub fn from_pairs<L, I, K, V>(label: L, pairs: I) -> Record
        where L: Into<String>,
              I: IntoIterator<Item=(K, V)>,
              K: Into<String>,
              V: Into<String>
    {
        let attributes = pairs.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Record::new(label, attributes)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn get(&self, feature: &str) -> Option<&str> {
        self.attributes.get(feature).map(String::as_str)
    }

    pub fn matches(&self, feature: &str, value: &str) -> bool {
        self.get(feature) == Some(value)
    }
}

/// A feature and every value it takes in the training set, in first-seen order.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Feature {
    pub name: String,
    pub values: Vec<String>
}

/// Feature name to value set, kept in insertion order so that split
/// tie-breaks and child order are reproducible.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FeatureCatalog {
    features: Vec<Feature>
}

impl FeatureCatalog {
    pub fn new() -> FeatureCatalog {
        FeatureCatalog::default()
    }

    /// Collects every (feature, value) pair observed across `records`.
    ///
    /// Features are ordered by first appearance. Attribute maps have no order
    /// of their own, so features first seen on the same record are ordered by
    /// name.
    pub fn from_records(records: &[Record]) -> FeatureCatalog {
        let mut catalog = FeatureCatalog::new();
        for r in records {
            let mut pairs: Vec<(&String, &String)> = r.attributes.iter().collect();
            pairs.sort();
            for (feature, value) in pairs {
                catalog.insert(feature, value);
            }
        }
        catalog
    }

    /// Adds `value` to the value set of `feature`, creating the feature if needed.
    pub fn insert(&mut self, feature: &str, value: &str) {
        match self.features.iter_mut().find(|f| f.name == feature) {
            Some(f) => {
                if !f.values.iter().any(|v| v == value) {
                    f.values.push(value.to_string());
                }
            }
            None => self.features.push(Feature {
                name: feature.to_string(),
                values: vec![value.to_string()]
            })
        }
    }

    pub fn get(&self, feature: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == feature)
    }

    /// A copy of this catalog without `feature`. Used for the children of a
    /// split so that siblings never observe each other's removals.
    pub fn without(&self, feature: &str) -> FeatureCatalog {
        FeatureCatalog {
            features: self.features.iter()
                .filter(|f| f.name != feature)
                .cloned()
                .collect()
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<'a> IntoIterator for &'a FeatureCatalog {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// Records of `data` whose `feature` equals `value`. Records lacking the
/// feature are never selected.
pub fn subset<'a>(data: &[&'a Record], feature: &str, value: &str) -> Vec<&'a Record> {
    data.iter()
        .copied()
        .filter(|r| r.matches(feature, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{subset, FeatureCatalog, Record};

    fn records() -> Vec<Record> {
        vec![
            Record::from_pairs("e", vec![("odor", "n"), ("ring", "p")]),
            Record::from_pairs("p", vec![("odor", "f")]),
            Record::from_pairs("e", vec![("odor", "n"), ("ring", "e"), ("bruises", "t")])
        ]
    }

    #[test]
    fn test_catalog_from_records() {
        let catalog = FeatureCatalog::from_records(&records());
        let names: Vec<&str> = catalog.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["odor", "ring", "bruises"]);
        assert_eq!(catalog.get("odor").unwrap().values, vec!["n", "f"]);
        assert_eq!(catalog.get("ring").unwrap().values, vec!["p", "e"]);
    }

    #[test]
    fn test_without_leaves_original_intact() {
        let catalog = FeatureCatalog::from_records(&records());
        let reduced = catalog.without("odor");
        assert_eq!(reduced.len(), 2);
        assert!(reduced.get("odor").is_none());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_subset_skips_missing_feature() {
        let data = records();
        let refs: Vec<&Record> = data.iter().collect();
        assert_eq!(subset(&refs, "ring", "p").len(), 1);
        assert_eq!(subset(&refs, "ring", "e").len(), 1);
        assert_eq!(subset(&refs, "odor", "n").len(), 2);
        assert!(subset(&refs, "odor", "x").is_empty());
    }
}
