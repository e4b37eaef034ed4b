//! Class descriptors and cross-file class lookup.
//!
//! A [`ClassDescriptor`] is the file-independent summary of one class
//! declaration: enough to list its members, walk its base chain and find its
//! declaration again. Descriptors of other files come from a [`ClassLookup`].

use jactl_ir::{Ast, FileId, NodeData, NodeId, TypeRef};
use rustc_hash::FxHashSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub return_ty: TypeRef,
    pub param_count: usize,
}

/// Summary of one class declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDescriptor {
    /// Simple name. For the script class this is the script name.
    pub name: String,
    pub package: Option<String>,
    /// Package, enclosing classes and name joined with `.`.
    pub fq_name: String,
    /// Fully-qualified name of the base class, as best determined from the
    /// declaring file alone.
    pub base: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    /// Fully-qualified names of directly nested classes.
    pub inner: Vec<String>,
    /// Fully-qualified name of the enclosing class. Top-level classes of a
    /// script have none, even though the script lists them as inner.
    pub enclosing: Option<String>,
    pub is_script: bool,
    pub file: FileId,
    /// The `ClassDecl` node in the declaring file's AST.
    pub decl: NodeId,
}

impl ClassDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// An `import` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub class_path: String,
    pub alias: Option<String>,
    pub node: NodeId,
}

impl Import {
    /// The simple name the import introduces.
    pub fn name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self
                .class_path
                .rsplit('.')
                .next()
                .unwrap_or(&self.class_path),
        }
    }
}

/// Join a package and a (possibly dotted) class name.
pub fn qualify(package: Option<&str>, name: &str) -> String {
    match package {
        Some(package) if !package.is_empty() => format!("{package}.{name}"),
        _ => name.to_owned(),
    }
}

/// Classes declared outside the file being resolved.
pub trait ClassLookup: Send + Sync {
    /// The class with the given fully-qualified name.
    fn lookup(&self, fq_name: &str) -> Option<ClassDescriptor>;

    /// Every top-level class in `package`.
    fn package_classes(&self, package: &str) -> Vec<ClassDescriptor>;
}

/// A [`ClassLookup`] that knows no classes.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoClasses;

impl ClassLookup for NoClasses {
    fn lookup(&self, _fq_name: &str) -> Option<ClassDescriptor> {
        None
    }

    fn package_classes(&self, _package: &str) -> Vec<ClassDescriptor> {
        Vec::new()
    }
}

/// Fully-qualified names `written` could refer to, most specific first.
///
/// `enclosing` lists the fully-qualified names of the classes around the
/// reference, innermost first.
pub(crate) fn candidates(
    written: &str,
    enclosing: &[String],
    package: Option<&str>,
    imports: &[Import],
) -> Vec<String> {
    let mut out: Vec<String> = enclosing
        .iter()
        .map(|fq| format!("{fq}.{written}"))
        .collect();
    let (head, rest) = match written.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (written, None),
    };
    for import in imports.iter().filter(|i| i.name() == head) {
        out.push(match rest {
            Some(rest) => format!("{}.{rest}", import.class_path),
            None => import.class_path.clone(),
        });
    }
    out.push(qualify(package, written));
    if rest.is_some() {
        out.push(written.to_owned());
    }
    let mut seen = FxHashSet::default();
    out.retain(|fq| seen.insert(fq.clone()));
    out
}

/// Collect the imports of a script class.
pub fn imports_of(ast: &Ast, root: NodeId) -> Vec<Import> {
    let Some(script) = ast.class_decl(root) else {
        return Vec::new();
    };
    script
        .imports
        .iter()
        .filter_map(|&node| match &ast.get(node)?.data {
            NodeData::Import { class_path, alias } if !class_path.is_empty() => Some(Import {
                class_path: class_path.clone(),
                alias: alias.clone(),
                node,
            }),
            _ => None,
        })
        .collect()
}

/// Describe every class declared in one parsed file, the script class first.
///
/// Base classes are qualified using only what the file itself declares and
/// imports; no other file is consulted.
pub fn describe_classes(
    file: FileId,
    script_name: &str,
    ast: &Ast,
    root: NodeId,
) -> Vec<ClassDescriptor> {
    let Some(script) = ast.class_decl(root) else {
        return Vec::new();
    };
    let package = script.package.clone();
    let mut out = Vec::new();
    let script_fq = qualify(package.as_deref(), script_name);
    describe(
        ast,
        file,
        root,
        script_name.to_owned(),
        script_fq,
        None,
        &mut out,
    );

    let imports = imports_of(ast, root);
    let known: FxHashSet<String> = out.iter().map(|c| c.fq_name.clone()).collect();
    let bases: Vec<Option<String>> = out
        .iter()
        .map(|class| {
            let written = class.base.as_deref()?;
            let chain = enclosing_chain(&out, class);
            let found = candidates(written, &chain, package.as_deref(), &imports);
            let local = found.iter().find(|fq| known.contains(*fq));
            let imported = found.iter().find(|fq| {
                imports
                    .iter()
                    .any(|i| **fq == i.class_path || fq.starts_with(&format!("{}.", i.class_path)))
            });
            local.or(imported).or(found.last()).cloned()
        })
        .collect();
    for (class, base) in out.iter_mut().zip(bases) {
        class.base = base;
    }
    out
}

/// The class itself and its enclosing classes, innermost first.
fn enclosing_chain(classes: &[ClassDescriptor], class: &ClassDescriptor) -> Vec<String> {
    let mut chain = vec![class.fq_name.clone()];
    let mut next = class.enclosing.clone();
    while let Some(fq) = next {
        next = classes
            .iter()
            .find(|c| c.fq_name == fq)
            .and_then(|c| c.enclosing.clone());
        chain.push(fq);
    }
    chain
}

fn describe(
    ast: &Ast,
    file: FileId,
    node: NodeId,
    name: String,
    fq_name: String,
    enclosing: Option<String>,
    out: &mut Vec<ClassDescriptor>,
) {
    let Some(decl) = ast.class_decl(node) else {
        return;
    };
    let fields = decl
        .fields
        .iter()
        .filter_map(|&f| ast.var_decl(f))
        .filter(|v| !v.name.is_empty())
        .map(|v| FieldDescriptor {
            name: v.name.clone(),
            ty: v.ty.clone(),
        })
        .collect();
    let methods = decl
        .methods
        .iter()
        .filter_map(|&m| ast.fun_decl(m))
        .filter(|f| !f.name.is_empty())
        .map(|f| MethodDescriptor {
            name: f.name.clone(),
            return_ty: f.return_ty.clone(),
            param_count: f.params.len(),
        })
        .collect();

    let inner: Vec<(NodeId, String, String)> = decl
        .inner_classes
        .iter()
        .filter_map(|&id| {
            let inner = ast.class_decl(id)?;
            if inner.name.is_empty() {
                return None;
            }
            let fq = if decl.is_script {
                qualify(decl.package.as_deref(), &inner.name)
            } else {
                format!("{fq_name}.{}", inner.name)
            };
            Some((id, inner.name.clone(), fq))
        })
        .collect();

    out.push(ClassDescriptor {
        name,
        package: decl.package.clone(),
        fq_name: fq_name.clone(),
        base: decl.base.clone(),
        fields,
        methods,
        inner: inner.iter().map(|(_, _, fq)| fq.clone()).collect(),
        enclosing,
        is_script: decl.is_script,
        file,
        decl: node,
    });

    let enclosing = (!decl.is_script).then_some(fq_name);
    for (id, name, fq) in inner {
        describe(ast, file, id, name, fq, enclosing.clone(), out);
    }
}
