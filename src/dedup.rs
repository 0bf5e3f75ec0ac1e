use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::canonical::{CanonicalKey, Canonicalizer};
use crate::grid::Grid;

/// A later occurrence of a key, pointing back at its first occurrence.
/// Both are 0-based positions in the raw stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    pub duplicate: usize,
    pub original: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniquePattern {
    pub index: usize,
    pub grid: Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    First,
    Duplicate { original: usize, count: usize },
}

/// Incremental key-indexed dedup. Grids must be pushed in the canonical
/// stream order for first-occurrence results to be reproducible.
#[derive(Debug)]
pub struct Deduplicator<'a> {
    canonicalizer: &'a Canonicalizer,
    first_seen: HashMap<CanonicalKey, usize>,
    counts: HashMap<CanonicalKey, usize>,
    unique: Vec<UniquePattern>,
    duplicates: Vec<DuplicatePair>,
    deleted_key_count: usize,
    raw_total: usize,
}

impl<'a> Deduplicator<'a> {
    pub fn new(canonicalizer: &'a Canonicalizer) -> Self {
        Self {
            canonicalizer,
            first_seen: HashMap::new(),
            counts: HashMap::new(),
            unique: Vec::new(),
            duplicates: Vec::new(),
            deleted_key_count: 0,
            raw_total: 0,
        }
    }

    pub fn push(&mut self, grid: Grid) -> Occurrence {
        let occurrence = self.record(&grid);
        if occurrence == Occurrence::First {
            self.keep(grid);
        }
        occurrence
    }

    /// `push` for callers that still need the grid afterwards. Only first
    /// occurrences are cloned.
    pub fn push_ref(&mut self, grid: &Grid) -> Occurrence {
        let occurrence = self.record(grid);
        if occurrence == Occurrence::First {
            self.keep(grid.clone());
        }
        occurrence
    }

    /// Grids checked in so far; also the stream index of the next push.
    pub fn raw_total(&self) -> usize {
        self.raw_total
    }

    fn record(&mut self, grid: &Grid) -> Occurrence {
        let index = self.raw_total;
        self.raw_total += 1;

        let key = self.canonicalizer.key(grid);
        let count = self.counts.entry(key.clone()).or_insert(0);
        *count += 1;
        let count = *count;

        if let Some(&original) = self.first_seen.get(&key) {
            self.duplicates.push(DuplicatePair {
                duplicate: index,
                original,
            });
            // Counted once per key, however often it repeats.
            if count == 2 {
                self.deleted_key_count += 1;
            }
            debug!(index, original, count, "duplicate pattern");
            Occurrence::Duplicate { original, count }
        } else {
            self.first_seen.insert(key, index);
            Occurrence::First
        }
    }

    fn keep(&mut self, grid: Grid) {
        let index = self.raw_total - 1;
        self.unique.push(UniquePattern { index, grid });
    }

    pub fn finish(self) -> DedupReport {
        let report = DedupReport {
            raw_total: self.raw_total,
            unique: self.unique,
            duplicates: self.duplicates,
            counts: self.counts,
            deleted_key_count: self.deleted_key_count,
        };
        info!(
            raw_total = report.raw_total,
            unique = report.unique.len(),
            duplicate_pairs = report.duplicates.len(),
            deleted_keys = report.deleted_key_count,
            "deduplicated patterns"
        );
        report
    }
}

#[derive(Debug, Clone)]
pub struct DedupReport {
    pub raw_total: usize,
    pub unique: Vec<UniquePattern>,
    pub duplicates: Vec<DuplicatePair>,
    pub counts: HashMap<CanonicalKey, usize>,
    /// Distinct keys seen at least twice.
    pub deleted_key_count: usize,
}

impl DedupReport {
    pub fn unique_count(&self) -> usize {
        self.unique.len()
    }

    pub fn occurrences(&self, key: &CanonicalKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn unique_grids(&self) -> impl Iterator<Item = &Grid> {
        self.unique.iter().map(|u| &u.grid)
    }

    /// The `raw - deleted = unique` check printed by the driver. Only exact
    /// while no key occurs more than twice; `raw_total == unique_count +
    /// duplicates.len()` holds unconditionally.
    pub fn reconciles(&self) -> bool {
        self.raw_total - self.deleted_key_count == self.unique_count()
    }
}

pub fn deduplicate<I>(canonicalizer: &Canonicalizer, grids: I) -> DedupReport
where
    I: IntoIterator<Item = Grid>,
{
    let mut dedup = Deduplicator::new(canonicalizer);
    for grid in grids {
        dedup.push(grid);
    }
    dedup.finish()
}
