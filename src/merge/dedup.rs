// src/merge/dedup.rs
//! Dedup keys and the key -> entry index used when appending list entries

use std::collections::HashMap;

use crate::types::{EducationEntry, TechEntry, WorkHistoryEntry};

/// Normalized identity of a list entry: two entries with the same key
/// describe the same real-world fact
pub trait DedupKey {
    fn dedup_key(&self) -> String;
}

impl DedupKey for TechEntry {
    fn dedup_key(&self) -> String {
        self.tech.to_lowercase()
    }
}

impl DedupKey for WorkHistoryEntry {
    fn dedup_key(&self) -> String {
        format!(
            "{}|{}",
            self.company.to_lowercase(),
            self.role.to_lowercase()
        )
    }
}

impl DedupKey for EducationEntry {
    fn dedup_key(&self) -> String {
        format!(
            "{}|{}",
            self.institution.to_lowercase(),
            self.degree.as_deref().unwrap_or("").to_lowercase()
        )
    }
}

/// Ordered entries plus a map from dedup key to the position of the first
/// entry carrying it. Existing entries are kept as-is, even when storage
/// already holds duplicates; only appends are deduplicated.
#[derive(Debug, Clone)]
pub struct DedupIndex<T> {
    entries: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T: DedupKey + Clone> DedupIndex<T> {
    pub fn from_existing(existing: &[T]) -> Self {
        let mut positions = HashMap::with_capacity(existing.len());
        for (i, entry) in existing.iter().enumerate() {
            positions.entry(entry.dedup_key()).or_insert(i);
        }

        Self {
            entries: existing.to_vec(),
            positions,
        }
    }

    #[cfg(test)]
    fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&T> {
        self.positions.get(key).map(|&i| &self.entries[i])
    }

    /// Append unless the key is already known; returns whether it was added
    pub fn insert(&mut self, entry: T) -> bool {
        let key = entry.dedup_key();
        if self.positions.contains_key(&key) {
            return false;
        }
        self.positions.insert(key, self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Append every new entry in order, returning how many were added
    pub fn extend<'a, I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        incoming
            .into_iter()
            .filter(|entry| self.insert((*entry).clone()))
            .count()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }
}
