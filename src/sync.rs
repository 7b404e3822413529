// Reconciliation of the rendered service table against the server's list

use crate::api::{NewService, ServiceRecord};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Key locating a rendered row.
///
/// Derived from the service name without losing distinctness: spaces become
/// `_`, and `_`, `~` and every other whitespace character are escaped with `~`.
/// The result never contains whitespace and two different names never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(String);

impl RowKey {
    const ESCAPE: char = '~';

    pub fn for_name(name: &str) -> Self {
        let mut key = String::with_capacity(name.len());
        for c in name.chars() {
            match c {
                ' ' => key.push('_'),
                '_' | Self::ESCAPE => {
                    key.push(Self::ESCAPE);
                    key.push(c);
                }
                c if c.is_whitespace() => {
                    key.push(Self::ESCAPE);
                    key.push_str(&format!("{:04x}", c as u32));
                }
                c => key.push(c),
            }
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One rendered row: the latest record plus the local checkbox state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRow {
    pub key: RowKey,
    pub record: ServiceRecord,
    pub selected: bool,
}

impl ServiceRow {
    fn new(key: RowKey, record: ServiceRecord, selected: bool) -> Self {
        Self { key, record, selected }
    }
}

/// Summary of one reconciliation pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub added: usize,
    pub updated: usize,
    /// Keys of rows the server no longer lists
    pub removed: Vec<String>,
    /// Records that overwrote an earlier record with the same key in the same response
    pub duplicates: usize,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed.is_empty()
    }
}

/// Client-side rejection of an add request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DuplicateError {
    #[error("A service with given name already exists. Please modify the name!")]
    Name,

    #[error("A service with given Url already exists. Please modify the url!")]
    Url,
}

/// What a delete request should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteGate {
    /// Nothing is selected, nothing to send
    NothingSelected,
    /// Ask the user, then send these urls
    Confirm(Vec<String>),
}

pub const SELECT_AT_LEAST_ONE: &str = "Please select at least one service to delete.";
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete the selected services?";

/// The service collection and its rendered rows
#[derive(Debug, Default, Clone)]
pub struct ServiceTable {
    rows: Vec<ServiceRow>,
}

impl ServiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with `records`, keeping the selection of rows
    /// whose key survives and dropping rows the server no longer lists.
    pub fn reconcile(&mut self, records: Vec<ServiceRecord>) -> Reconciliation {
        let mut previous: HashMap<RowKey, bool> = self
            .rows
            .drain(..)
            .map(|row| (row.key, row.selected))
            .collect();

        let mut summary = Reconciliation::default();
        let mut index: HashMap<RowKey, usize> = HashMap::with_capacity(records.len());
        let mut rows: Vec<ServiceRow> = Vec::with_capacity(records.len());

        for record in records {
            let key = RowKey::for_name(&record.name);

            if let Some(&existing) = index.get(&key) {
                tracing::warn!("Service list contains '{}' twice, keeping the last entry", record.name);
                rows[existing].record = record;
                summary.duplicates += 1;
                continue;
            }

            let selected = match previous.remove(&key) {
                Some(selected) => {
                    summary.updated += 1;
                    selected
                }
                None => {
                    summary.added += 1;
                    false
                }
            };

            index.insert(key.clone(), rows.len());
            rows.push(ServiceRow::new(key, record, selected));
        }

        summary.removed = previous.into_keys().map(|key| key.0).collect();
        summary.removed.sort();
        self.rows = rows;

        tracing::debug!(
            "Reconciled service table: {} added, {} updated, {} removed",
            summary.added,
            summary.updated,
            summary.removed.len()
        );

        summary
    }

    pub fn rows(&self) -> &[ServiceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, key: &RowKey) -> Option<&ServiceRow> {
        self.rows.iter().find(|row| &row.key == key)
    }

    pub fn position(&self, key: &RowKey) -> Option<usize> {
        self.rows.iter().position(|row| &row.key == key)
    }

    /// Flip the checkbox of the row at `index`, returning the new state
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let row = self.rows.get_mut(index)?;
        row.selected = !row.selected;
        Some(row.selected)
    }

    #[cfg(test)]
    pub fn set_selected(&mut self, key: &RowKey, selected: bool) -> bool {
        match self.rows.iter_mut().find(|row| &row.key == key) {
            Some(row) => {
                row.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn selected_count(&self) -> usize {
        self.rows.iter().filter(|row| row.selected).count()
    }

    /// Urls of the selected services, in table order
    pub fn selected_urls(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| row.selected)
            .map(|row| row.record.url.clone())
            .collect()
    }

    /// Check an add request against the collection. The name check runs first.
    pub fn validate_new(&self, name: &str, url: &str) -> Result<NewService, DuplicateError> {
        let candidate = NewService::trimmed(name, url);

        if self.rows.iter().any(|row| same_ignoring_case(&row.record.name, &candidate.name)) {
            return Err(DuplicateError::Name);
        }

        if self.rows.iter().any(|row| same_ignoring_case(&row.record.url, &candidate.url)) {
            return Err(DuplicateError::Url);
        }

        Ok(candidate)
    }

    pub fn delete_gate(&self) -> DeleteGate {
        let urls = self.selected_urls();
        if urls.is_empty() {
            DeleteGate::NothingSelected
        } else {
            DeleteGate::Confirm(urls)
        }
    }

    /// (total, up, down, pending)
    pub fn stats(&self) -> (usize, usize, usize, usize) {
        let up = self.rows.iter().filter(|row| row.record.is_up()).count();
        let down = self.rows.iter().filter(|row| row.record.is_down()).count();
        (self.rows.len(), up, down, self.rows.len() - up - down)
    }
}

fn same_ignoring_case(a: &str, b: &str) -> bool {
    a.to_uppercase() == b.to_uppercase()
}
