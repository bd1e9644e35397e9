use std::collections::HashMap;

use crate::{CoordinatePolicy, Error, Record, Result};

#[derive(Debug, Default)]
pub struct Reconciliation {
    pub merged: Vec<Record>,
    pub added: usize,
    pub updated: usize,
}

impl Reconciliation {
    pub fn total(&self) -> usize {
        self.merged.len()
    }
}

/// Merges a freshly fetched batch into an existing collection.
///
/// Records are matched on primary name. A match is rewritten in place when
/// the incoming record brings a new language or the stored one lacks a
/// coordinate; anything unmatched is appended with the next free id. Nothing
/// is ever removed, and existing ids never change.
///
/// The name index is built once from `existing`, so two incoming records
/// sharing a primary name both land on the same slot and the later one wins.
///
/// Fails only when an id is needed after `u64::MAX` has been handed out.
pub fn reconcile(
    existing: Vec<Record>,
    incoming: Vec<Record>,
    policy: CoordinatePolicy,
) -> Result<Reconciliation> {
    let mut index = HashMap::new();
    for (i, record) in existing.iter().enumerate() {
        if !record.names.is_empty() {
            index.insert(record.primary_name().to_string(), i);
        }
    }

    let mut ids = Ids {
        next: existing.iter().filter_map(|x| x.id).max().unwrap_or(0).checked_add(1),
    };
    let mut output = Reconciliation {
        merged: existing,
        ..Default::default()
    };

    for mut record in incoming {
        if let Some(&i) = index.get(record.primary_name()) {
            if let Some(x) = merge(&output.merged[i], &record, policy, &mut ids)? {
                output.merged[i] = x;
                output.updated += 1;
            }
        } else {
            record.id = Some(ids.allocate()?);
            output.merged.push(record);
            output.added += 1;
        }
    }

    Ok(output)
}

struct Ids {
    next: Option<u64>,
}

impl Ids {
    fn allocate(&mut self) -> Result<u64> {
        let id = self.next.ok_or(Error::IdsExhausted)?;
        self.next = id.checked_add(1);
        Ok(id)
    }
}

fn merge(
    existing: &Record,
    incoming: &Record,
    policy: CoordinatePolicy,
    ids: &mut Ids,
) -> Result<Option<Record>> {
    let known = existing.names.first();
    let fresh = incoming.names.first().into_iter().flatten();

    let needs_coordinates =
        policy.is_unset(existing.latitude) || policy.is_unset(existing.longitude);
    let has_new_language = fresh
        .clone()
        .any(|(language, _)| !known.is_some_and(|x| x.contains_key(language)));
    if !needs_coordinates && !has_new_language {
        return Ok(None);
    }

    // While coordinates are being backfilled the incoming names replace
    // known ones too; otherwise only unknown languages are added.
    let overwrite = needs_coordinates;
    let mut names = known.cloned().unwrap_or_default();
    for (language, name) in fresh {
        if overwrite || !names.contains_key(language) {
            names.insert(language.clone(), name.clone());
        }
    }

    let id = match existing.id {
        Some(x) => x,
        None => ids.allocate()?,
    };

    Ok(Some(Record {
        id: Some(id),
        names: vec![names],
        latitude: policy.backfill(existing.latitude, incoming.latitude),
        longitude: policy.backfill(existing.longitude, incoming.longitude),
        category: incoming.category,
    }))
}
