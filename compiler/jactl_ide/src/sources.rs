//! The project model: which files exist, their packages and resident text.

use std::sync::Arc;

use jactl_ir::FileId;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// One registered file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Script name: the file name without extension.
    pub name: String,
    /// Package derived from the file's location. `None` when the file lies
    /// outside every configured source root; `Some("")` is the root package.
    pub package: Option<String>,
    pub text: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, package: Option<&str>, text: &str) -> Self {
        SourceFile {
            name: name.into(),
            package: package.map(str::to_owned),
            text: Arc::from(text),
        }
    }

    /// A file the project model knows nothing about: treated as a script
    /// named `Script` in the root package.
    pub fn detached(text: &str) -> Self {
        SourceFile::new("Script", Some(""), text)
    }

    /// Whether a class with this fully-qualified name could live here.
    fn may_declare(&self, fq_name: &str) -> bool {
        match self.package.as_deref() {
            None => false,
            Some("") => true,
            Some(package) => fq_name
                .strip_prefix(package)
                .is_some_and(|rest| rest.starts_with('.')),
        }
    }
}

/// Registered files, shared between readers.
#[derive(Debug, Default)]
pub struct SourceSet {
    files: RwLock<FxHashMap<FileId, SourceFile>>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, file: FileId, source: SourceFile) -> Option<SourceFile> {
        self.files.write().insert(file, source)
    }

    /// Replace the resident text of a registered file.
    pub fn set_text(&self, file: FileId, text: &str) -> bool {
        match self.files.write().get_mut(&file) {
            Some(source) => {
                source.text = Arc::from(text);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, file: FileId) -> Option<SourceFile> {
        self.files.write().remove(&file)
    }

    pub fn get(&self, file: FileId) -> Option<SourceFile> {
        self.files.read().get(&file).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Files registered in `package`, in id order.
    pub fn in_package(&self, package: &str) -> Vec<(FileId, SourceFile)> {
        self.collect(|source| source.package.as_deref() == Some(package))
    }

    /// Files whose package could contain `fq_name`, in id order.
    pub fn candidates_for(&self, fq_name: &str) -> Vec<(FileId, SourceFile)> {
        self.collect(|source| source.may_declare(fq_name))
    }

    fn collect(&self, keep: impl Fn(&SourceFile) -> bool) -> Vec<(FileId, SourceFile)> {
        let mut out: Vec<_> = self
            .files
            .read()
            .iter()
            .filter(|(_, source)| keep(source))
            .map(|(&file, source)| (file, source.clone()))
            .collect();
        out.sort_by_key(|(file, _)| *file);
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn packages_filter_candidates() {
        let set = SourceSet::new();
        set.insert(FileId::new(2), SourceFile::new("B", Some("a.b"), ""));
        set.insert(FileId::new(1), SourceFile::new("A", Some("a"), ""));
        set.insert(FileId::new(3), SourceFile::new("Loose", None, ""));
        set.insert(FileId::new(4), SourceFile::new("Top", Some(""), ""));

        let ids = |files: Vec<(FileId, SourceFile)>| -> Vec<u32> {
            files.into_iter().map(|(f, _)| f.raw()).collect()
        };
        assert_eq!(ids(set.candidates_for("a.b.C")), vec![1, 2, 4]);
        assert_eq!(ids(set.candidates_for("ab.C")), vec![4]);
        assert_eq!(ids(set.in_package("a")), vec![1]);
    }

    #[test]
    fn text_updates_only_registered_files() {
        let set = SourceSet::new();
        set.insert(FileId::new(1), SourceFile::new("A", Some(""), "x"));
        assert!(set.set_text(FileId::new(1), "y"));
        assert!(!set.set_text(FileId::new(9), "y"));
        assert_eq!(
            set.get(FileId::new(1)).map(|s| s.text.to_string()),
            Some("y".to_owned())
        );
    }
}
