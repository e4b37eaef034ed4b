//! The scope walk behind [`ScopeResolver`](crate::ScopeResolver).
//!
//! One pass over the AST in source order. Every block opens a [`BlockScope`];
//! functions declared directly in a block are registered before its
//! statements are walked, variables as their declarations are reached, so
//! a variable is only visible after its declaration.

use jactl_diagnostic::Diagnostic;
use jactl_ir::{Ast, NodeData, NodeId, Span, TypeRef, UnaryOp};
use tracing::trace;

use crate::class::{describe_classes, imports_of, qualify};
use crate::scope::{Binding, BlockScope, Resolution};
use jactl_stack::ensure_sufficient_stack;
use crate::types::is_assignable;
use crate::ResolveInput;

pub(crate) struct Walker<'a> {
    input: ResolveInput<'a>,
    ast: &'a Ast,
    res: Resolution,
    block: Option<NodeId>,
    class: String,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(input: ResolveInput<'a>) -> Self {
        Walker {
            input,
            ast: input.ast,
            res: Resolution::default(),
            block: None,
            class: String::new(),
        }
    }

    pub(crate) fn run(mut self) -> Resolution {
        let ast = self.ast;
        let root = self.input.root;
        let Some(script) = ast.class_decl(root) else {
            return self.res;
        };

        self.res.package = script.package.clone();
        self.res.script_class = qualify(script.package.as_deref(), self.input.script_name);
        self.res.classes = describe_classes(self.input.file, self.input.script_name, ast, root);
        self.res.imports = imports_of(ast, root);
        self.class = self.res.script_class.clone();

        for import in self.res.imports.clone() {
            if self
                .res
                .find_class(&import.class_path, self.input.classes)
                .is_none()
            {
                self.report(
                    format!("Unknown class '{}'", import.class_path),
                    ast[import.node].span,
                );
            }
        }

        if let Some(body) = script.body {
            self.walk_block(body, &[]);
        }
        for &class in &script.inner_classes {
            self.walk_class(class);
        }
        trace!(
            scopes = self.res.blocks.len(),
            bindings = self.res.bindings.len(),
            "resolved"
        );
        self.res
    }

    fn report(&mut self, message: String, span: Span) {
        self.res.diagnostics.push(Diagnostic::resolution(message, span));
    }

    fn scope_mut(&mut self) -> Option<&mut BlockScope> {
        self.res.blocks.get_mut(&self.block?)
    }

    fn note_block(&mut self, node: NodeId) {
        if let Some(block) = self.block {
            self.res.node_block.insert(node, block);
        }
    }

    fn walk_class(&mut self, node: NodeId) {
        let ast = self.ast;
        let Some(decl) = ast.class_decl(node) else {
            return;
        };
        let Some(desc) = self.res.classes.iter().find(|c| c.decl == node).cloned() else {
            return;
        };

        if let (Some(written), Some(base)) = (&decl.base, &desc.base) {
            if self.res.find_class(base, self.input.classes).is_none() {
                self.report(format!("Unknown class '{written}'"), ast[node].span);
            }
        }

        let saved = (self.block.take(), std::mem::replace(&mut self.class, desc.fq_name.clone()));
        self.res.blocks.insert(
            node,
            BlockScope {
                enclosing: None,
                owning_class: desc.fq_name,
                variables: Vec::new(),
                functions: Vec::new(),
            },
        );
        self.block = Some(node);
        self.note_block(node);

        let mut fields: Vec<&str> = Vec::new();
        for &field in &decl.fields {
            self.note_block(field);
            let Some(var) = ast.var_decl(field) else {
                continue;
            };
            if let NodeData::VarDecl { decl } = ast[field].data {
                self.check_var(decl);
            }
            if var.name.is_empty() {
                continue;
            }
            if fields.contains(&var.name.as_str()) {
                self.report(
                    format!("Field '{}' already declared", var.name),
                    name_span(&var.name, var.name_offset),
                );
            } else {
                fields.push(&var.name);
            }
        }
        for &method in &decl.methods {
            self.walk_stmt(method);
        }
        for &inner in &decl.inner_classes {
            self.walk_class(inner);
        }

        (self.block, self.class) = saved;
    }

    /// Open a scope for `block`, declare `params` in it, then walk it.
    fn walk_block(&mut self, block: NodeId, params: &[NodeId]) {
        let ast = self.ast;
        self.note_block(block);
        let stmts: &[NodeId] = match &ast[block].data {
            NodeData::Block { stmts } => stmts,
            _ => &[],
        };

        let outer = self.block.replace(block);
        self.res.blocks.insert(
            block,
            BlockScope {
                enclosing: outer,
                owning_class: self.class.clone(),
                variables: Vec::new(),
                functions: Vec::new(),
            },
        );

        for &param in params {
            self.walk_stmt(param);
        }
        for &stmt in stmts {
            let Some(fun) = ast.fun_decl(stmt) else {
                continue;
            };
            let NodeData::FunDecl { decl } = ast[stmt].data else {
                continue;
            };
            if fun.name.is_empty() {
                continue;
            }
            let Some(scope) = self.res.blocks.get_mut(&block) else {
                continue;
            };
            let duplicate = scope
                .functions
                .iter()
                .any(|&f| ast.fun_decl(f).is_some_and(|f| f.name == fun.name));
            if duplicate {
                self.report(
                    format!("Function '{}' already declared", fun.name),
                    name_span(&fun.name, fun.name_offset),
                );
            } else {
                scope.functions.push(decl);
            }
        }
        for &stmt in stmts {
            self.walk_stmt(stmt);
        }

        self.block = outer;
    }

    fn walk_stmt(&mut self, id: NodeId) {
        ensure_sufficient_stack(|| self.walk_stmt_inner(id));
    }

    fn walk_stmt_inner(&mut self, id: NodeId) {
        let ast = self.ast;
        self.note_block(id);
        match &ast[id].data {
            NodeData::VarDecl { decl } => self.declare_var(*decl),
            NodeData::FunDecl { decl } => self.walk_function(*decl),
            NodeData::ExprStmt { expr } => self.walk_expr(*expr),
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.walk_expr(*cond);
                self.walk_stmt(*then_branch);
                if let Some(branch) = else_branch {
                    self.walk_stmt(*branch);
                }
            }
            NodeData::While { cond, body } => {
                self.walk_expr(*cond);
                self.walk_stmt(*body);
            }
            NodeData::Return { value } => {
                if let Some(value) = value {
                    self.walk_expr(*value);
                }
            }
            NodeData::Block { .. } => self.walk_block(id, &[]),
            NodeData::ClassDecl(_) => self.walk_class(id),
            NodeData::Noop | NodeData::Import { .. } => {}
            _ => self.walk_expr(id),
        }
    }

    /// Resolve a declaration's initialiser, then make the name visible.
    fn declare_var(&mut self, decl: NodeId) {
        let ast = self.ast;
        self.note_block(decl);
        let Some(var) = ast.var_decl(decl) else {
            return;
        };
        self.check_var(decl);
        if var.name.is_empty() {
            return;
        }

        let Some(scope) = self.scope_mut() else {
            return;
        };
        let duplicate = scope
            .variables
            .iter()
            .any(|&v| ast.var_decl(v).is_some_and(|v| v.name == var.name));
        if duplicate {
            self.report(
                format!("Variable '{}' already declared", var.name),
                name_span(&var.name, var.name_offset),
            );
        } else {
            scope.variables.push(decl);
        }
    }

    /// Walk the initialiser and check it and the declared type.
    fn check_var(&mut self, decl: NodeId) {
        let ast = self.ast;
        let Some(var) = ast.var_decl(decl) else {
            return;
        };
        self.check_type(&var.ty, ast[decl].span);
        let Some(init) = var.init else {
            return;
        };
        self.walk_expr(init);
        if let Some(from) = self.static_type(init) {
            if !is_assignable(&from, &var.ty) {
                self.report(
                    format!("Cannot convert from {from} to {}", var.ty),
                    ast[init].span,
                );
            }
        }
    }

    fn check_type(&mut self, ty: &TypeRef, span: Span) {
        if let TypeRef::Class(name) = ty {
            if self.resolve_class(name).is_none() {
                self.report(format!("Unknown class '{name}'"), span);
            }
        }
    }

    fn walk_function(&mut self, decl: NodeId) {
        let ast = self.ast;
        self.note_block(decl);
        let Some(fun) = ast.fun_decl(decl) else {
            return;
        };
        self.check_type(&fun.return_ty, ast[decl].span);
        self.walk_block(fun.body, &fun.params);
    }

    fn walk_expr(&mut self, id: NodeId) {
        ensure_sufficient_stack(|| self.walk_expr_inner(id));
    }

    fn walk_expr_inner(&mut self, id: NodeId) {
        let ast = self.ast;
        let span = ast[id].span;
        self.note_block(id);
        match &ast[id].data {
            NodeData::Identifier { name } => self.bind(id, name, span),
            NodeData::VarAssign { name, value } => {
                self.walk_expr(*value);
                self.bind(id, name, span);
            }
            NodeData::ListLiteral { items } => {
                for &item in items {
                    self.walk_expr(item);
                }
            }
            NodeData::Binary { op, left, right } => {
                self.walk_expr(*left);
                self.walk_expr(*right);
                if op.is_arithmetic() {
                    self.check_numeric(op.symbol(), *left);
                    self.check_numeric(op.symbol(), *right);
                }
            }
            NodeData::PrefixUnary { op, operand } => {
                self.walk_expr(*operand);
                if *op == UnaryOp::Negate {
                    self.check_numeric("-", *operand);
                }
            }
            NodeData::Call { callee, args } => {
                self.walk_expr(*callee);
                for &arg in args {
                    self.walk_expr(arg);
                }
            }
            NodeData::MethodCall { target, args, .. } => {
                self.walk_expr(*target);
                for &arg in args.iter().flatten() {
                    self.walk_expr(arg);
                }
            }
            NodeData::Closure { params, body, .. } => self.walk_block(*body, params),
            NodeData::InvokeNew { class_name, args } => {
                match self.resolve_class(class_name) {
                    Some(fq) => {
                        self.res.bindings.insert(id, Binding::Class(fq));
                    }
                    None => self.report(format!("Unknown class '{class_name}'"), span),
                }
                for &arg in args {
                    self.walk_expr(arg);
                }
            }
            NodeData::FunDeclExpr(_) => self.walk_function(id),
            NodeData::VarDeclExpr(_) => self.declare_var(id),
            _ => {}
        }
    }

    fn bind(&mut self, id: NodeId, name: &str, span: Span) {
        match self.lookup(name) {
            Some(binding) => {
                self.res.bindings.insert(id, binding);
            }
            None => self.report(format!("Unknown variable '{name}'"), span),
        }
    }

    /// Innermost scope outwards, then the members of the current class and
    /// its bases, then globals, then class names.
    fn lookup(&self, name: &str) -> Option<Binding> {
        let ast = self.ast;
        let mut block = self.block;
        while let Some(id) = block {
            let scope = self.res.blocks.get(&id)?;
            let var = scope
                .variables
                .iter()
                .rev()
                .find(|&&v| ast.var_decl(v).is_some_and(|v| v.name == name));
            let fun = scope
                .functions
                .iter()
                .find(|&&f| ast.fun_decl(f).is_some_and(|f| f.name == name));
            if let Some(&decl) = var.or(fun) {
                return Some(Binding::Local(decl));
            }
            block = scope.enclosing;
        }

        for class in self.res.class_chain(&self.class, self.input.classes) {
            if class.field(name).is_some() {
                return Some(Binding::Field {
                    class: class.fq_name,
                    name: name.to_owned(),
                });
            }
            if class.method(name).is_some() {
                return Some(Binding::Method {
                    class: class.fq_name,
                    name: name.to_owned(),
                });
            }
        }

        if self.class == self.res.script_class && self.input.globals.contains(name) {
            return Some(Binding::Global(name.to_owned()));
        }
        self.resolve_class(name).map(Binding::Class)
    }

    fn resolve_class(&self, written: &str) -> Option<String> {
        self.res
            .resolve_class_name(written, &self.class, self.input.classes)
            .map(|c| c.fq_name)
    }

    /// Type of an expression when it is evident without inference.
    fn static_type(&self, id: NodeId) -> Option<TypeRef> {
        let ast = self.ast;
        match &ast[id].data {
            NodeData::Literal(lit) => Some(lit.type_ref()),
            NodeData::ListLiteral { .. } => Some(TypeRef::List),
            NodeData::Identifier { .. } => match self.res.bindings.get(&id)? {
                Binding::Local(decl) => ast.var_decl(*decl).map(|v| v.ty.clone()),
                Binding::Global(name) => match self.input.globals.type_of(name)? {
                    "String" => Some(TypeRef::String),
                    "boolean" => Some(TypeRef::Boolean),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }

    fn check_numeric(&mut self, op: &str, operand: NodeId) {
        let Some(ty) = self.static_type(operand) else {
            return;
        };
        if ty != TypeRef::Any && !ty.is_numeric() {
            self.report(
                format!("Non-numeric operand for '{op}' of type {ty}"),
                self.ast[operand].span,
            );
        }
    }
}

fn name_span(name: &str, offset: u32) -> Span {
    let len = u32::try_from(name.len()).unwrap_or(u32::MAX);
    Span::new(offset, offset.saturating_add(len))
}
