use std::collections::BTreeMap;

use tracing::info;

use crate::{
    dataset, normalize, overpass,
    partition::{partition, recombine, Summary},
    reconcile::reconcile,
    Category, Config, Result,
};

#[derive(Debug)]
pub struct Report {
    pub summaries: Vec<Summary>,
    pub combined: usize,
}

/// Queries Overpass and saves the raw response for `process`.
pub fn fetch(config: &Config) -> Result<()> {
    let text = overpass::query(config)?;
    dataset::write_input(&config.input, &text)
}

/// Merges the saved response into the datasets.
///
/// Everything is loaded and reconciled before the first write. Files are
/// then written one category at a time, so a failed write leaves earlier
/// categories complete and later ones untouched. Categories left out of the
/// configuration keep their files and still appear in the combined file.
pub fn process(config: &Config) -> Result<Report> {
    let elements = normalize::elements(&dataset::read_input(&config.input)?)?;
    let mut grouped = normalize::normalize(elements, &config.categories);

    let mut reconciled = BTreeMap::new();
    for category in &config.categories {
        let existing = dataset::load(&config.dataset_path(*category))?;
        let incoming = grouped.remove(category).unwrap_or_default();
        let result = reconcile(existing, incoming, config.unset_coordinates)?;
        info!(
            category = category.slug(),
            added = result.added,
            updated = result.updated,
            total = result.total(),
            "reconciled"
        );
        reconciled.insert(*category, result);
    }

    let mut untouched = BTreeMap::new();
    for category in Category::all() {
        if !config.categories.contains(&category) {
            untouched.insert(category, dataset::load(&config.dataset_path(category))?);
        }
    }

    let output = partition(reconciled);
    for (category, records) in &output.files {
        dataset::save(&config.dataset_path(*category), records)?;
    }

    let combined = if untouched.is_empty() {
        output.combined
    } else {
        let mut views = output.files;
        views.append(&mut untouched);
        recombine(&views)
    };
    dataset::save(&config.combined_path(), &combined)?;

    Ok(Report {
        summaries: output.summaries,
        combined: combined.len(),
    })
}
