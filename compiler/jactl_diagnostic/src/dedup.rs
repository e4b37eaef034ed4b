use rustc_hash::FxHashSet;

/// Set of diagnostic messages already reported during one parse.
///
/// Error recovery tends to report the same fault several times while
/// backtracking; only the first occurrence of a message is kept. Two distinct
/// faults with identical text are therefore reported once.
#[derive(Clone, Debug, Default)]
pub struct MessageSet {
    seen: FxHashSet<String>,
}

impl MessageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message`. Returns `false` if it was already present.
    pub fn insert(&mut self, message: &str) -> bool {
        if self.seen.contains(message) {
            return false;
        }
        self.seen.insert(message.to_owned());
        true
    }

    /// Forget `message`, so that a later identical message is reported.
    pub fn remove(&mut self, message: &str) -> bool {
        self.seen.remove(message)
    }

    pub fn contains(&self, message: &str) -> bool {
        self.seen.contains(message)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests;
