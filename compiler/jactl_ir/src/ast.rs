//! Semantic AST arena.
//!
//! The grammar allocates one [`Node`] per semantic construct and attaches its
//! [`NodeId`] to the marker that spans it. Nodes reference their children by
//! id; nothing in the arena points back at markers or tree nodes. Those
//! correlations live in side tables owned by the tree materializer.

use std::fmt;
use std::ops::Index;

use crate::Span;

/// Index of a node in an [`Ast`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A semantic node with the span of the source it was parsed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub data: NodeData,
    pub span: Span,
}

/// Declared or inferred type.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeRef {
    /// `def` / `var` / untyped.
    Any,
    Boolean,
    Int,
    Long,
    Double,
    Decimal,
    String,
    List,
    Map,
    /// A class type, as written (possibly dotted or a `$`-joined inner name).
    Class(String),
}

impl TypeRef {
    pub fn is_builtin(&self) -> bool {
        !matches!(self, TypeRef::Class(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeRef::Int | TypeRef::Long | TypeRef::Double | TypeRef::Decimal
        )
    }

    /// Name as the user would write it.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Any => "def",
            TypeRef::Boolean => "boolean",
            TypeRef::Int => "int",
            TypeRef::Long => "long",
            TypeRef::Double => "double",
            TypeRef::Decimal => "Decimal",
            TypeRef::String => "String",
            TypeRef::List => "List",
            TypeRef::Map => "Map",
            TypeRef::Class(name) => name,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a declared name introduces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NameKind {
    Package,
    Class,
    Function,
    Method,
    Parameter,
    Variable,
    Field,
}

/// Where a variable declaration lives.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarRole {
    Local,
    Parameter,
    Field,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Decimal(String),
    Str(String),
    Bool(bool),
    Null,
}

impl Literal {
    pub fn type_ref(&self) -> TypeRef {
        match self {
            Literal::Int(_) => TypeRef::Int,
            Literal::Decimal(_) => TypeRef::Decimal,
            Literal::Str(_) => TypeRef::String,
            Literal::Bool(_) => TypeRef::Boolean,
            Literal::Null => TypeRef::Any,
        }
    }
}

/// A class declaration, or the implicit class wrapping a script.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ClassDecl {
    pub name: String,
    pub package: Option<String>,
    /// Base class name as written after `extends`.
    pub base: Option<String>,
    /// `VarDecl` statements.
    pub fields: Vec<NodeId>,
    /// `FunDecl` statements.
    pub methods: Vec<NodeId>,
    pub inner_classes: Vec<NodeId>,
    /// `ImportStmt` nodes (script class only).
    pub imports: Vec<NodeId>,
    /// Top-level statements (script class only).
    pub body: Option<NodeId>,
    pub is_script: bool,
}

/// Declaration of a variable, parameter or field.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDeclExpr {
    pub name: String,
    /// Offset of the name token.
    pub name_offset: u32,
    pub ty: TypeRef,
    pub init: Option<NodeId>,
    pub role: VarRole,
}

/// Declaration of a function or method.
#[derive(Clone, Debug, PartialEq)]
pub struct FunDeclExpr {
    pub name: String,
    pub name_offset: u32,
    pub return_ty: TypeRef,
    /// Parameter `VarDecl` statements.
    pub params: Vec<NodeId>,
    pub body: NodeId,
    pub is_method: bool,
}

/// Semantic payload of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
    // Statements
    ClassDecl(ClassDecl),
    Import {
        class_path: String,
        alias: Option<String>,
    },
    Block {
        stmts: Vec<NodeId>,
    },
    /// Wraps a [`NodeData::VarDeclExpr`].
    VarDecl {
        decl: NodeId,
    },
    /// Wraps a [`NodeData::FunDeclExpr`].
    FunDecl {
        decl: NodeId,
    },
    ExprStmt {
        expr: NodeId,
    },
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    Return {
        value: Option<NodeId>,
    },
    /// Statement with no observable effect (`;`).
    Noop,

    // Expressions
    Identifier {
        name: String,
    },
    Literal(Literal),
    ListLiteral {
        items: Vec<NodeId>,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    PrefixUnary {
        op: UnaryOp,
        operand: NodeId,
    },
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    /// Method call, or field access when `args` is `None`.
    MethodCall {
        target: NodeId,
        name: String,
        args: Option<Vec<NodeId>>,
    },
    VarAssign {
        name: String,
        value: NodeId,
    },
    Closure {
        params: Vec<NodeId>,
        body: NodeId,
        /// Set when the grammar decided the braces were a plain block.
        is_block: bool,
    },
    InvokeNew {
        class_name: String,
        args: Vec<NodeId>,
    },
    VarDeclExpr(VarDeclExpr),
    FunDeclExpr(FunDeclExpr),

    // Names and types
    Name {
        text: String,
        kind: NameKind,
    },
    Type(TypeRef),
}

/// Arena of semantic nodes for one parse.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its id.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` nodes are allocated.
    pub fn alloc(&mut self, data: NodeData, span: Span) -> NodeId {
        let id = u32::try_from(self.nodes.len())
            .unwrap_or_else(|_| panic!("AST exceeds {} nodes", u32::MAX));
        self.nodes.push(Node { data, span });
        NodeId(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        (0u32..).zip(self.nodes.iter()).map(|(i, n)| (NodeId(i), n))
    }

    /// The class declaration payload of `id`, if it is one.
    pub fn class_decl(&self, id: NodeId) -> Option<&ClassDecl> {
        match &self.get(id)?.data {
            NodeData::ClassDecl(decl) => Some(decl),
            _ => None,
        }
    }

    /// The variable declaration behind `id`: either the expression itself or
    /// a `VarDecl` statement wrapping it.
    pub fn var_decl(&self, id: NodeId) -> Option<&VarDeclExpr> {
        match &self.get(id)?.data {
            NodeData::VarDeclExpr(decl) => Some(decl),
            NodeData::VarDecl { decl } => self.var_decl(*decl),
            _ => None,
        }
    }

    /// The function declaration behind `id` (expression or wrapping statement).
    pub fn fun_decl(&self, id: NodeId) -> Option<&FunDeclExpr> {
        match &self.get(id)?.data {
            NodeData::FunDeclExpr(decl) => Some(decl),
            NodeData::FunDecl { decl } => self.fun_decl(*decl),
            _ => None,
        }
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}
