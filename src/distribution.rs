use crate::dataset::Record;

/// Label frequencies in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct LabelCounts<'a> {
    counts: Vec<(&'a str, usize)>,
    total: usize
}

impl<'a> LabelCounts<'a> {
    pub fn from_records<I>(records: I) -> LabelCounts<'a>
        where I: IntoIterator<Item=&'a Record>
    {
        let mut counts = LabelCounts::default();
        for r in records {
            counts.add(r.label());
        }
        counts
    }

    pub fn add(&mut self, label: &'a str) {
        self.total += 1;
        match self.counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((label, 1))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item=(&'a str, usize)> + '_ {
        self.counts.iter().copied()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// The most frequent label. On equal counts the label seen first wins.
    pub fn majority(&self) -> Option<&'a str> {
        let mut best: Option<(&'a str, usize)> = None;
        for &(label, count) in &self.counts {
            match best {
                Some((_, max)) if max >= count => {}
                _ => best = Some((label, count))
            }
        }
        best.map(|(label, _)| label)
    }
}

/// Outcome of classifying a record.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Prediction<'a> {
    Label(&'a str),
    /// The record's path left the tree: its value for some split feature was
    /// missing or never seen in training, or it ended in an empty leaf.
    Unresolved
}

impl<'a> Prediction<'a> {
    pub fn label(&self) -> Option<&'a str> {
        match *self {
            Prediction::Label(l) => Some(l),
            Prediction::Unresolved => None
        }
    }
}

impl<'a> From<Option<&'a str>> for Prediction<'a> {
    fn from(label: Option<&'a str>) -> Prediction<'a> {
        match label {
            Some(l) => Prediction::Label(l),
            None => Prediction::Unresolved
        }
    }
}

/// Majority vote over `records`, or `Unresolved` if there are none.
pub fn majority_vote<'a, I>(records: I) -> Prediction<'a>
    where I: IntoIterator<Item=&'a Record>
{
    LabelCounts::from_records(records).majority().into()
}

#[cfg(test)]
mod tests {
    use super::{majority_vote, LabelCounts, Prediction};
    use crate::dataset::Record;

    fn labelled(labels: &[&str]) -> Vec<Record> {
        labels.iter()
            .map(|l| Record::from_pairs(*l, Vec::<(&str, &str)>::new()))
            .collect()
    }

    #[test]
    fn test_counts_keep_first_seen_order() {
        let data = labelled(&["b", "a", "b", "c"]);
        let counts = LabelCounts::from_records(&data);
        assert_eq!(counts.iter().collect::<Vec<_>>(), vec![("b", 2), ("a", 1), ("c", 1)]);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_majority_vote() {
        assert_eq!(majority_vote(&labelled(&["a", "b", "b"])), Prediction::Label("b"));
        assert_eq!(majority_vote(&labelled(&["p"])), Prediction::Label("p"));
        assert_eq!(majority_vote(&labelled(&[])), Prediction::Unresolved);
    }

    #[test]
    fn test_majority_tie_goes_to_first_seen() {
        assert_eq!(majority_vote(&labelled(&["x", "y", "y", "x"])), Prediction::Label("x"));
        assert_eq!(majority_vote(&labelled(&["y", "x", "x", "y"])), Prediction::Label("y"));
    }
}
