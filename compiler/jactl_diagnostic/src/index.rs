//! Offset-bucketed diagnostic storage.

use rustc_hash::FxHashMap;

use crate::Diagnostic;

/// Diagnostics of one parse, bucketed by the offset they are reported at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticIndex {
    buckets: FxHashMap<u32, Vec<Diagnostic>>,
}

impl DiagnosticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `diagnostic` to the bucket at its own offset.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.buckets
            .entry(diagnostic.offset())
            .or_default()
            .push(diagnostic);
    }

    /// Diagnostics reported at exactly `offset`.
    pub fn at(&self, offset: u32) -> &[Diagnostic] {
        self.buckets.get(&offset).map_or(&[], Vec::as_slice)
    }

    /// Occupied offsets in ascending order.
    pub fn offsets(&self) -> Vec<u32> {
        let mut offsets: Vec<u32> = self.buckets.keys().copied().collect();
        offsets.sort_unstable();
        offsets
    }

    /// Buckets in ascending offset order.
    pub fn buckets(&self) -> impl Iterator<Item = (u32, &[Diagnostic])> {
        self.offsets()
            .into_iter()
            .map(move |offset| (offset, self.at(offset)))
    }

    /// Every diagnostic, ordered by offset then insertion.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.buckets().flat_map(|(_, diags)| diags.iter())
    }

    /// Number of occupied offsets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of diagnostics.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Extend<Diagnostic> for DiagnosticIndex {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.push(diagnostic);
        }
    }
}

impl FromIterator<Diagnostic> for DiagnosticIndex {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        let mut index = DiagnosticIndex::new();
        index.extend(iter);
        index
    }
}

#[cfg(test)]
mod tests;
