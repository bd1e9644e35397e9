use std::{collections::BTreeMap, fmt};

use crate::{reconcile::Reconciliation, Category, Record};

#[derive(Debug)]
pub struct Partition {
    /// Per-category datasets, without the `category` field.
    pub files: BTreeMap<Category, Vec<Record>>,
    /// Every category's records, tagged, in enumeration order.
    pub combined: Vec<Record>,
    pub summaries: Vec<Summary>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub category: Category,
    pub added: usize,
    pub updated: usize,
    pub total: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.added > 0 || self.updated > 0 {
            write!(
                f,
                "{}: {} new, {} updated, {} total",
                self.category, self.added, self.updated, self.total
            )
        } else {
            write!(f, "{}: No updates needed ({} total)", self.category, self.total)
        }
    }
}

pub fn partition(reconciled: BTreeMap<Category, Reconciliation>) -> Partition {
    let mut files = BTreeMap::new();
    let mut summaries = Vec::new();

    for (category, result) in reconciled {
        summaries.push(Summary {
            category,
            added: result.added,
            updated: result.updated,
            total: result.total(),
        });

        let stripped = result
            .merged
            .into_iter()
            .map(|mut x| {
                x.category = None;
                x
            })
            .collect();
        files.insert(category, stripped);
    }

    let combined = recombine(&files);
    Partition {
        files,
        combined,
        summaries,
    }
}

/// Rebuilds the combined view from per-category datasets.
pub fn recombine(files: &BTreeMap<Category, Vec<Record>>) -> Vec<Record> {
    files
        .iter()
        .flat_map(|(category, records)| {
            records.iter().map(|x| Record {
                category: Some(*category),
                ..x.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Names;

    fn record(id: u64, name: &str, category: Option<Category>) -> Record {
        Record {
            id: Some(id),
            names: vec![Names::from([("en".to_string(), name.to_string())])],
            latitude: Some(30.0),
            longitude: Some(15.0),
            category,
        }
    }

    fn reconciled() -> BTreeMap<Category, Reconciliation> {
        BTreeMap::from([
            (
                Category::Village,
                Reconciliation {
                    merged: vec![record(1, "Ghirza", Some(Category::Village))],
                    added: 1,
                    updated: 0,
                },
            ),
            (
                Category::City,
                Reconciliation {
                    merged: vec![record(1, "Tripoli", None), record(2, "Misrata", Some(Category::City))],
                    added: 1,
                    updated: 1,
                },
            ),
            (Category::Town, Reconciliation::default()),
        ])
    }

    #[test]
    fn strips_and_tags() {
        let output = partition(reconciled());

        assert!(output.files.values().flatten().all(|x| x.category.is_none()));
        assert_eq!(
            output
                .combined
                .iter()
                .map(|x| (x.category, x.primary_name()))
                .collect::<Vec<_>>(),
            vec![
                (Some(Category::City), "Tripoli"),
                (Some(Category::City), "Misrata"),
                (Some(Category::Village), "Ghirza"),
            ]
        );
        assert_eq!(recombine(&output.files), output.combined);
    }

    #[test]
    fn summaries() {
        let output = partition(reconciled());
        let lines: Vec<_> = output.summaries.iter().map(|x| x.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "Cities: 1 new, 1 updated, 2 total",
                "Towns: No updates needed (0 total)",
                "Villages: 1 new, 0 updated, 1 total",
            ]
        );
    }
}
