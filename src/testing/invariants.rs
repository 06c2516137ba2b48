//! Invariant checking framework for index histories
//!
//! Each checker replays the completed, successful operations of an
//! [`EventLog`] against a model of the mapping and reports the first event
//! that disagrees with it. Failed operations are assumed to have left the
//! mapping untouched.

use super::events::{Event, OperationResult, OperationType};
use super::history::EventLog;
use crate::geo::LocationRecord;
use crate::models::DocumentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A violation of an invariant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub invariant: String,
    pub description: String,
    pub violating_events: Vec<usize>, // indices into the completed events
    pub context: HashMap<String, String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INVARIANT VIOLATION: {}", self.invariant)?;
        writeln!(f, "  Description: {}", self.description)?;
        writeln!(f, "  Violating events: {:?}", self.violating_events)?;
        if !self.context.is_empty() {
            writeln!(f, "  Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Trait for invariant checkers
pub trait Invariant: Send + Sync {
    fn name(&self) -> &str;

    /// Check the invariant against an event log
    fn check(&self, log: &EventLog) -> Result<(), Violation>;

    fn description(&self) -> &str {
        "No description provided"
    }
}

/// Check all invariants and return violations
pub fn check_all_invariants(log: &EventLog, invariants: &[Box<dyn Invariant>]) -> Vec<Violation> {
    invariants
        .iter()
        .filter_map(|invariant| invariant.check(log).err())
        .collect()
}

/// The standard set of index invariants
pub fn default_invariants() -> Vec<Box<dyn Invariant>> {
    vec![
        Box::new(EntryTracksLastIndexedValue),
        Box::new(ChangeFlagsConsistent),
        Box::new(SortOrderAscending),
        Box::new(RemovedDocumentNotSorted),
    ]
}

/// Expected mapping rebuilt from successful mutations
#[derive(Default)]
struct ModelState {
    entries: HashMap<DocumentId, LocationRecord>,
}

impl ModelState {
    /// Apply a successful mutation, returning the previous entry
    fn apply(&mut self, event: &Event) -> Option<Option<LocationRecord>> {
        if event.is_error() {
            return None;
        }
        match (&event.op_type, &event.result) {
            (OperationType::Index { doc_id, location }, Some(OperationResult::Indexed { .. })) => {
                let previous = self.entries.get(doc_id).copied();
                match location {
                    Some(record) => self.entries.insert(*doc_id, *record),
                    None => self.entries.remove(doc_id),
                };
                Some(previous)
            }
            (OperationType::Unindex { doc_id }, Some(OperationResult::Unindexed { .. })) => {
                Some(self.entries.remove(doc_id))
            }
            _ => None,
        }
    }
}

fn violation(
    invariant: &dyn Invariant,
    description: String,
    idx: usize,
    context: Vec<(&str, String)>,
) -> Violation {
    Violation {
        invariant: invariant.name().to_string(),
        description,
        violating_events: vec![idx],
        context: context
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

/// Invariant: an entry exists iff the last indexed value converted
///
/// Lookups must find a document exactly when the model holds an entry for it.
pub struct EntryTracksLastIndexedValue;

impl Invariant for EntryTracksLastIndexedValue {
    fn name(&self) -> &str {
        "EntryTracksLastIndexedValue"
    }

    fn description(&self) -> &str {
        "A document is present iff its most recent indexed value had a usable location"
    }

    fn check(&self, log: &EventLog) -> Result<(), Violation> {
        let mut model = ModelState::default();

        for (idx, event) in log.completed_events().iter().enumerate() {
            model.apply(event);

            if let (
                OperationType::Lookup { doc_id },
                Some(OperationResult::Located { found, .. }),
            ) = (&event.op_type, &event.result)
            {
                let expected = model.entries.contains_key(doc_id);
                if *found != expected {
                    return Err(violation(
                        self,
                        format!(
                            "Lookup of document {} found={} but expected found={}",
                            doc_id, found, expected
                        ),
                        idx,
                        vec![("doc_id", doc_id.to_string())],
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Invariant: `changed` is reported exactly when the entry changed
pub struct ChangeFlagsConsistent;

impl Invariant for ChangeFlagsConsistent {
    fn name(&self) -> &str {
        "ChangeFlagsConsistent"
    }

    fn description(&self) -> &str {
        "Mutations report changed=true iff the stored entry actually changed"
    }

    fn check(&self, log: &EventLog) -> Result<(), Violation> {
        let mut model = ModelState::default();

        for (idx, event) in log.completed_events().iter().enumerate() {
            let Some(previous) = model.apply(event) else {
                continue;
            };

            let (doc_id, reported, expected) = match (&event.op_type, &event.result) {
                (
                    OperationType::Index { doc_id, location },
                    Some(OperationResult::Indexed { changed, .. }),
                ) => (*doc_id, *changed, *location != previous),
                (
                    OperationType::Unindex { doc_id },
                    Some(OperationResult::Unindexed { changed, .. }),
                ) => (*doc_id, *changed, previous.is_some()),
                _ => continue,
            };

            if reported != expected {
                return Err(violation(
                    self,
                    format!(
                        "Document {} reported changed={} but expected changed={}",
                        doc_id, reported, expected
                    ),
                    idx,
                    vec![
                        ("doc_id", doc_id.to_string()),
                        ("previous", format!("{:?}", previous)),
                    ],
                ));
            }
        }

        Ok(())
    }
}

/// Invariant: sorted hits come back in key order
pub struct SortOrderAscending;

impl Invariant for SortOrderAscending {
    fn name(&self) -> &str {
        "SortOrderAscending"
    }

    fn description(&self) -> &str {
        "Distance sorts return hits ordered by distance (descending when reversed)"
    }

    fn check(&self, log: &EventLog) -> Result<(), Violation> {
        for (idx, event) in log.completed_events().iter().enumerate() {
            if let (
                OperationType::Sort { reverse, .. },
                Some(OperationResult::Sorted { hits }),
            ) = (&event.op_type, &event.result)
            {
                let out_of_order = hits.windows(2).any(|pair| {
                    let (a, b) = (pair[0].1, pair[1].1);
                    if *reverse {
                        a < b
                    } else {
                        a > b
                    }
                });
                if out_of_order {
                    return Err(violation(
                        self,
                        "Sort returned hits out of distance order".to_string(),
                        idx,
                        vec![("hits", format!("{:?}", hits))],
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Invariant: sorts only return documents that are indexed
pub struct RemovedDocumentNotSorted;

impl Invariant for RemovedDocumentNotSorted {
    fn name(&self) -> &str {
        "RemovedDocumentNotSorted"
    }

    fn description(&self) -> &str {
        "A successful sort never yields a document without an entry"
    }

    fn check(&self, log: &EventLog) -> Result<(), Violation> {
        let mut model = ModelState::default();

        for (idx, event) in log.completed_events().iter().enumerate() {
            model.apply(event);

            if let (OperationType::Sort { .. }, Some(OperationResult::Sorted { hits })) =
                (&event.op_type, &event.result)
            {
                if let Some((doc_id, _)) = hits
                    .iter()
                    .find(|(doc_id, _)| !model.entries.contains_key(doc_id))
                {
                    return Err(violation(
                        self,
                        format!("Document {} was sorted without an entry", doc_id),
                        idx,
                        vec![("doc_id", doc_id.to_string())],
                    ));
                }
            }
        }

        Ok(())
    }
}
