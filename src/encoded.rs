//! Reader for datasets stored in the numeric encoding used by the mushroom and
//! chess benchmarks.
//!
//! A dataset directory holds four text files:
//!
//! * `label-values`: line `n` is the label with code `n` (codes start at 1).
//! * `feature-names`: line `n` describes feature code `n`, either as
//!   `name-value` or, for binary features, as `name-first-second`. Only the
//!   first character of the last part is kept as the value.
//! * `train` and `test`: one record per line, `<label> <feature>:<n> ...`.
//!   For a binary feature `n == -1` selects the first value and anything else
//!   the second; `n` is ignored for single valued features.
//!
//! `test` is optional.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::dataset::{FeatureCatalog, Record};

pub const LABELS_FILE: &str = "label-values";
pub const FEATURES_FILE: &str = "feature-names";
pub const TRAIN_FILE: &str = "train";
pub const TEST_FILE: &str = "test";

/// Errors raised while loading an encoded dataset.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        source: io::Error
    },

    #[error("failed to decode {path}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<DecodeError>
    },

    #[error("line {line}: unknown label code {code}")]
    UnknownLabel { line: usize, code: usize },

    #[error("line {line}: unknown feature code {code}")]
    UnknownFeature { line: usize, code: usize },

    #[error("line {line}: invalid number `{text}`")]
    InvalidNumber { line: usize, text: String },

    #[error("line {line}: malformed feature description `{text}`")]
    MalformedFeature { line: usize, text: String },

    #[error("line {line}: record has no label")]
    MissingLabel { line: usize }
}

impl DecodeError {
    fn in_file(self, path: &Path) -> DecodeError {
        DecodeError::InFile {
            path: path.to_path_buf(),
            source: Box::new(self)
        }
    }
}

/// Maps 1-based codes to the strings on the corresponding lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    entries: Vec<String>
}

impl Lookup {
    pub fn parse(text: &str) -> Lookup {
        Lookup {
            entries: text.lines().map(str::to_string).collect()
        }
    }

    pub fn get(&self, code: usize) -> Option<&str> {
        code.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A decoded line of `feature-names`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDescription {
    pub name: String,
    /// One value, or the two values of a binary feature.
    pub values: Vec<String>
}

fn first_char(part: &str) -> Option<String> {
    part.chars().next().map(String::from)
}

impl FeatureDescription {
    pub fn parse(text: &str) -> Option<FeatureDescription> {
        let mut parts: Vec<&str> = text.split('-').collect();
        while parts.last() == Some(&"") {
            parts.pop();
        }
        if parts.len() < 2 {
            return None;
        }

        let values = if parts.len() > 2 {
            vec![parts[1].to_string(), first_char(parts[2])?]
        } else {
            vec![first_char(parts[1])?]
        };

        Some(FeatureDescription {
            name: parts[0].to_string(),
            values: values
        })
    }

    pub fn is_binary(&self) -> bool {
        self.values.len() == 2
    }
}

/// Decoded `feature-names`, indexed by 1-based feature code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureTable {
    features: Vec<FeatureDescription>
}

impl FeatureTable {
    pub fn parse(text: &str) -> Result<FeatureTable, DecodeError> {
        let mut features = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let description = FeatureDescription::parse(line.trim())
                .ok_or_else(|| DecodeError::MalformedFeature {
                    line: i + 1,
                    text: line.to_string()
                })?;
            features.push(description);
        }
        Ok(FeatureTable { features: features })
    }

    pub fn get(&self, code: usize) -> Option<&FeatureDescription> {
        code.checked_sub(1).and_then(|i| self.features.get(i))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, line: usize) -> Result<T, DecodeError> {
    text.parse().map_err(|_| DecodeError::InvalidNumber {
        line: line,
        text: text.to_string()
    })
}

/// Turns encoded record lines into [`Record`]s using explicit lookup tables.
#[derive(Debug, Clone)]
pub struct Decoder {
    labels: Lookup,
    features: FeatureTable
}

impl Decoder {
    pub fn new(labels: Lookup, features: FeatureTable) -> Decoder {
        Decoder {
            labels: labels,
            features: features
        }
    }

    /// Decodes a single record; `line` is only used in error messages.
    pub fn decode_line(&self, line: usize, text: &str) -> Result<Record, DecodeError> {
        let mut tokens = text.split_whitespace();

        let label_code: usize = parse_number(tokens.next().ok_or(DecodeError::MissingLabel { line: line })?, line)?;
        let label = self.labels.get(label_code)
            .ok_or(DecodeError::UnknownLabel { line: line, code: label_code })?;

        let mut attributes = HashMap::new();
        for token in tokens {
            let (code, n) = match token.split_once(':') {
                Some((code, n)) => (code, Some(n)),
                None => (token, None)
            };
            let code: usize = parse_number(code, line)?;
            let feature = self.features.get(code)
                .ok_or(DecodeError::UnknownFeature { line: line, code: code })?;

            let mut value = &feature.values[0];
            if feature.is_binary() {
                let n: i64 = parse_number(n.unwrap_or(""), line)?;
                if n != -1 {
                    value = &feature.values[1];
                }
            }
            attributes.insert(feature.name.clone(), value.clone());
        }

        Ok(Record::new(label, attributes))
    }

    /// Decodes every non-blank line of `text`.
    pub fn decode(&self, text: &str) -> Result<Vec<Record>, DecodeError> {
        text.lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| self.decode_line(i + 1, l))
            .collect()
    }
}

fn read(path: &Path) -> Result<String, DecodeError> {
    info!(path = %path.display(), "reading data");
    fs::read_to_string(path).map_err(|e| DecodeError::Read {
        path: path.to_path_buf(),
        source: e
    })
}

/// Training and test records loaded from a dataset directory, plus the
/// catalog of feature values seen in training.
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub train: Vec<Record>,
    pub test: Option<Vec<Record>>,
    pub catalog: FeatureCatalog
}

impl EncodedDataset {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<EncodedDataset, DecodeError> {
        let dir = dir.as_ref();

        let labels = Lookup::parse(&read(&dir.join(LABELS_FILE))?);
        let features_path = dir.join(FEATURES_FILE);
        let features = FeatureTable::parse(&read(&features_path)?)
            .map_err(|e| e.in_file(&features_path))?;
        info!(labels = labels.len(), features = features.len(), "loaded lookup tables");

        let decoder = Decoder::new(labels, features);
        let load = |path: PathBuf| -> Result<Vec<Record>, DecodeError> {
            let records = decoder.decode(&read(&path)?).map_err(|e| e.in_file(&path))?;
            info!(path = %path.display(), records = records.len(), "decoded records");
            Ok(records)
        };

        let train = load(dir.join(TRAIN_FILE))?;
        let test_path = dir.join(TEST_FILE);
        let test = if test_path.exists() {
            Some(load(test_path)?)
        } else {
            None
        };

        let catalog = FeatureCatalog::from_records(&train);
        Ok(EncodedDataset {
            train: train,
            test: test,
            catalog: catalog
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{DecodeError, Decoder, EncodedDataset, FeatureDescription, FeatureTable, Lookup};

    const LABELS: &str = "edible\npoisonous\n";
    const FEATURES: &str = "odor-none\nodor-foul\nbruises-yes-true\n";

    fn decoder() -> Decoder {
        Decoder::new(Lookup::parse(LABELS), FeatureTable::parse(FEATURES).unwrap())
    }

    #[test]
    fn test_lookup_is_one_based() {
        let lookup = Lookup::parse(LABELS);
        assert_eq!(lookup.get(0), None);
        assert_eq!(lookup.get(1), Some("edible"));
        assert_eq!(lookup.get(2), Some("poisonous"));
        assert_eq!(lookup.get(3), None);
    }

    #[test]
    fn test_feature_description() {
        let single = FeatureDescription::parse("odor-none").unwrap();
        assert_eq!(single.name, "odor");
        assert_eq!(single.values, vec!["n"]);
        assert!(!single.is_binary());

        let binary = FeatureDescription::parse("bruises-yes-true").unwrap();
        assert_eq!(binary.name, "bruises");
        assert_eq!(binary.values, vec!["yes", "t"]);

        assert!(FeatureDescription::parse("odor").is_none());
        assert!(FeatureDescription::parse("odor-").is_none());
    }

    #[test]
    fn test_decode_line() {
        let record = decoder().decode_line(1, "2 2:1 3:-1").unwrap();
        assert_eq!(record.label(), "poisonous");
        assert_eq!(record.get("odor"), Some("f"));
        assert_eq!(record.get("bruises"), Some("yes"));

        let record = decoder().decode_line(1, "1 1:1 3:1").unwrap();
        assert_eq!(record.get("odor"), Some("n"));
        assert_eq!(record.get("bruises"), Some("t"));
    }

    #[test]
    fn test_decode_errors() {
        let d = decoder();
        assert!(matches!(d.decode_line(4, "9 1:1"), Err(DecodeError::UnknownLabel { line: 4, code: 9 })));
        assert!(matches!(d.decode_line(4, "1 7:1"), Err(DecodeError::UnknownFeature { line: 4, code: 7 })));
        assert!(matches!(d.decode_line(4, "x 1:1"), Err(DecodeError::InvalidNumber { line: 4, .. })));
        assert!(matches!(d.decode_line(4, "1 3"), Err(DecodeError::InvalidNumber { line: 4, .. })));
        assert!(matches!(FeatureTable::parse("a-b\nbad\n"), Err(DecodeError::MalformedFeature { line: 2, .. })));
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let records = decoder().decode("1 1:1\n\n2 2:1\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_open_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("label-values"), LABELS).unwrap();
        fs::write(dir.path().join("feature-names"), FEATURES).unwrap();
        fs::write(dir.path().join("train"), "1 1:1 3:1\n2 2:1 3:-1\n").unwrap();

        let dataset = EncodedDataset::open(dir.path()).unwrap();
        assert_eq!(dataset.train.len(), 2);
        assert!(dataset.test.is_none());
        assert_eq!(dataset.catalog.get("odor").unwrap().values.len(), 2);

        fs::write(dir.path().join("test"), "1 1:1\n").unwrap();
        let dataset = EncodedDataset::open(dir.path()).unwrap();
        assert_eq!(dataset.test.unwrap().len(), 1);
    }

    #[test]
    fn test_open_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        match EncodedDataset::open(dir.path()) {
            Err(DecodeError::Read { path, .. }) => assert!(path.ends_with("label-values")),
            other => panic!("unexpected result: {:?}", other)
        }
    }

    #[test]
    fn test_messages_leave_cause_to_source() {
        use std::error::Error;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("label-values"), LABELS).unwrap();
        fs::write(dir.path().join("feature-names"), "odor-none
bad
").unwrap();

        let err = EncodedDataset::open(dir.path()).unwrap_err();
        let path = dir.path().join("feature-names");
        assert_eq!(err.to_string(), format!("failed to decode {}", path.display()));
        let cause = err.source().unwrap();
        assert_eq!(cause.to_string(), "line 2: malformed feature description `bad`");

        let missing = tempfile::tempdir().unwrap();
        let err = EncodedDataset::open(missing.path()).unwrap_err();
        assert!(!err.to_string().contains(&err.source().unwrap().to_string()));
    }
}
