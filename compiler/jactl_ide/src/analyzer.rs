//! The top-level service: cache, frontend and project model composed.

use std::sync::Arc;

use jactl_diagnostic::Diagnostic;
use jactl_ir::{AstKey, FileId, NodeData};
use jactl_resolve::{qualify, Binding, ClassDescriptor, ClassLookup, Declaration};
use jactl_tree::{CancellationToken, TreeId};
use tracing::trace;

use crate::{AstCache, CacheConfig, Frontend, IdeError, NodeRef, ParsedScript, SourceFile, SourceSet};

/// Answers position queries over cached parses.
///
/// Every query takes the file and its current text; the script is taken from
/// the cache when the text matches and rebuilt otherwise.
pub struct Analyzer {
    cache: AstCache,
    frontend: Frontend,
    sources: SourceSet,
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::new(CacheConfig::default(), Frontend::default())
    }
}

impl Analyzer {
    pub fn new(config: CacheConfig, frontend: Frontend) -> Self {
        Analyzer {
            cache: AstCache::new(config),
            frontend,
            sources: SourceSet::new(),
        }
    }

    pub fn cache(&self) -> &AstCache {
        &self.cache
    }

    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    pub fn frontend(&self) -> &Frontend {
        &self.frontend
    }

    /// The last script cached for `file`.
    pub fn get(&self, file: FileId) -> Option<Arc<ParsedScript>> {
        self.cache.get(file)
    }

    /// The script for `(file, text)`, from the cache or freshly built.
    pub fn put(&self, file: FileId, text: &str) -> Result<Arc<ParsedScript>, IdeError> {
        self.put_cancellable(file, text, &CancellationToken::new())
    }

    /// [`put`](Self::put) that gives up with [`IdeError::Cancelled`] once
    /// `cancel` fires. Nothing is cached then.
    pub fn put_cancellable(
        &self,
        file: FileId,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<ParsedScript>, IdeError> {
        self.cache.get_or_build(file, text, || {
            let source = self
                .sources
                .get(file)
                .unwrap_or_else(|| SourceFile::detached(text));
            let lookup = SourceLookup {
                analyzer: self,
                exclude: file,
            };
            self.frontend.build(file, text, &source, &lookup, cancel)
        })
    }

    pub fn lookup_node(
        &self,
        file: FileId,
        text: &str,
        key: &AstKey,
    ) -> Result<Option<NodeRef>, IdeError> {
        let script = self.put(file, text)?;
        Ok(script
            .lookup(key)
            .map(|id| NodeRef::new(Arc::clone(&script), id)))
    }

    pub fn errors_at(
        &self,
        file: FileId,
        text: &str,
        offset: u32,
    ) -> Result<Vec<Diagnostic>, IdeError> {
        Ok(self.put(file, text)?.errors_at(offset))
    }

    pub fn errors_for_node(
        &self,
        file: FileId,
        text: &str,
        node: TreeId,
    ) -> Result<Vec<Diagnostic>, IdeError> {
        Ok(self.put(file, text)?.errors_for_node(node))
    }

    /// Variables and functions visible at `key`, then members of the owning
    /// class chain.
    pub fn variables_and_functions_visible(
        &self,
        file: FileId,
        text: &str,
        key: &AstKey,
    ) -> Result<Vec<Declaration>, IdeError> {
        let script = self.put(file, text)?;
        let Some(node) = script.scoped_node(key) else {
            return Ok(Vec::new());
        };
        let location = script.location_of(key);
        Ok(script.resolution().visible_declarations(
            script.ast(),
            node,
            location,
            &self.lookup_for(file),
        ))
    }

    pub fn classes_visible(
        &self,
        file: FileId,
        text: &str,
        key: &AstKey,
    ) -> Result<Vec<ClassDescriptor>, IdeError> {
        let script = self.put(file, text)?;
        let Some(node) = script.scoped_node(key) else {
            return Ok(Vec::new());
        };
        Ok(script
            .resolution()
            .visible_classes(node, &self.lookup_for(file)))
    }

    pub fn owning_class(
        &self,
        file: FileId,
        text: &str,
        key: &AstKey,
    ) -> Result<Option<ClassDescriptor>, IdeError> {
        let script = self.put(file, text)?;
        let Some(node) = script.scoped_node(key) else {
            return Ok(None);
        };
        Ok(script
            .resolution()
            .owning_class(node, &self.lookup_for(file)))
    }

    pub fn is_imported(&self, file: FileId, text: &str, name: &str) -> Result<bool, IdeError> {
        Ok(self.put(file, text)?.resolution().is_imported(name))
    }

    /// A class declared in `file`, by fully-qualified name or by its name
    /// relative to the file's package.
    pub fn class_decl(
        &self,
        file: FileId,
        text: &str,
        name: &str,
    ) -> Result<Option<ClassDescriptor>, IdeError> {
        let script = self.put(file, text)?;
        Ok(local_class(&script, name).cloned())
    }

    /// Find the script declaring `fq_name` among the registered sources.
    pub fn class_decl_by_name(
        &self,
        fq_name: &str,
    ) -> Result<Option<(Arc<ParsedScript>, ClassDescriptor)>, IdeError> {
        for (file, source) in self.sources.candidates_for(fq_name) {
            let script = self.put(file, &source.text)?;
            if let Some(class) = script.resolution().local_class(fq_name).cloned() {
                return Ok(Some((script, class)));
            }
        }
        Ok(None)
    }

    /// Key of the declaration the identifier, assignment or `new` at `key`
    /// refers to. The declaration may live in another file.
    pub fn declaration_of(
        &self,
        file: FileId,
        text: &str,
        key: &AstKey,
    ) -> Result<Option<AstKey>, IdeError> {
        let script = self.put(file, text)?;
        let Some(node) = script.lookup(key) else {
            return Ok(None);
        };
        let Some(binding) = script.resolution().bindings.get(&node) else {
            return Ok(None);
        };
        trace!(?key, ?binding, "declaration of");
        match binding {
            Binding::Local(decl) => Ok(script.key_of(*decl)),
            Binding::Global(_) => Ok(None),
            Binding::Class(fq) => self.member_key(&script, fq, None),
            Binding::Field { class, name } | Binding::Method { class, name } => {
                self.member_key(&script, class, Some(name.as_str()))
            }
        }
    }

    /// Key of a class declaration, or of one of its fields or methods.
    fn member_key(
        &self,
        script: &Arc<ParsedScript>,
        class: &str,
        member: Option<&str>,
    ) -> Result<Option<AstKey>, IdeError> {
        let (script, desc) = match script.resolution().local_class(class) {
            Some(desc) => (Arc::clone(script), desc.clone()),
            None => match self.class_decl_by_name(class)? {
                Some(found) => found,
                None => return Ok(None),
            },
        };
        let Some(member) = member else {
            return Ok(script.key_of(desc.decl));
        };
        let ast = script.ast();
        let Some(NodeData::ClassDecl(decl)) = ast.get(desc.decl).map(|n| &n.data) else {
            return Ok(None);
        };
        let field = decl
            .fields
            .iter()
            .find(|&&f| ast.var_decl(f).is_some_and(|v| v.name == member));
        if let Some(&field) = field {
            return Ok(script.key_of(field));
        }
        let method = decl.methods.iter().find_map(|&m| match ast[m].data {
            NodeData::FunDecl { decl } if ast.fun_decl(decl).is_some_and(|f| f.name == member) => {
                Some(decl)
            }
            _ => None,
        });
        Ok(method.and_then(|decl| script.key_of(decl)))
    }

    fn lookup_for(&self, file: FileId) -> SourceLookup<'_> {
        SourceLookup {
            analyzer: self,
            exclude: file,
        }
    }

    /// Classes declared by another registered file, reusing its cached
    /// script when the text still matches.
    fn describe(&self, file: FileId, source: &SourceFile) -> Vec<ClassDescriptor> {
        match self.cache.get_matching(file, &source.text) {
            Some(script) => script.resolution().classes.clone(),
            None => self.frontend.describe(file, &source.text, &source.name),
        }
    }
}

fn local_class<'s>(script: &'s ParsedScript, name: &str) -> Option<&'s ClassDescriptor> {
    let resolution = script.resolution();
    resolution.local_class(name).or_else(|| {
        let qualified = qualify(resolution.package.as_deref(), name);
        resolution.local_class(&qualified)
    })
}

/// [`ClassLookup`] over the registered sources, skipping the file being
/// resolved.
struct SourceLookup<'a> {
    analyzer: &'a Analyzer,
    exclude: FileId,
}

impl ClassLookup for SourceLookup<'_> {
    fn lookup(&self, fq_name: &str) -> Option<ClassDescriptor> {
        self.analyzer
            .sources
            .candidates_for(fq_name)
            .into_iter()
            .filter(|(file, _)| *file != self.exclude)
            .find_map(|(file, source)| {
                self.analyzer
                    .describe(file, &source)
                    .into_iter()
                    .find(|c| c.fq_name == fq_name)
            })
    }

    fn package_classes(&self, package: &str) -> Vec<ClassDescriptor> {
        self.analyzer
            .sources
            .in_package(package)
            .into_iter()
            .filter(|(file, _)| *file != self.exclude)
            .flat_map(|(file, source)| self.analyzer.describe(file, &source))
            .filter(|c| c.enclosing.is_none() && !c.is_script)
            .collect()
    }
}
