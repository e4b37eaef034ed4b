//! Tree node kinds.
//!
//! A marker's kind is decided once, when the marker completes, by matching on
//! the semantic node attached to it ([`NodeKind::classify`]).

use std::fmt;

use crate::ast::{NameKind, NodeData, TypeRef};

/// Kind of an internal syntax tree node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub enum NodeKind {
    // Statements
    ImportStmt,
    ClassDecl,
    Block,
    ExprStmt,
    VarDecl,
    FunDecl,
    IfStmt,
    WhileStmt,
    ReturnStmt,

    // Expressions
    Identifier,
    Literal,
    ListLiteral,
    BinaryExpr,
    PrefixUnaryExpr,
    CallExpr,
    MethodCallExpr,
    VarAssign,
    Closure,
    InvokeNew,
    VarDeclExpr,
    FunDeclExpr,

    // Names
    PackageName,
    ClassName,
    FunctionName,
    MethodName,
    ParameterName,
    VariableName,
    FieldName,

    // Types
    ClassType,
    BuiltinType,

    /// A grouping with no semantic node of its own (parameter lists etc).
    List,
}

impl NodeKind {
    /// Kind of the tree node for a completed marker carrying `data`.
    ///
    /// Returns `None` for no-op nodes; the recorder drops such markers.
    pub fn classify(data: &NodeData) -> Option<NodeKind> {
        Some(match data {
            NodeData::ClassDecl(_) => NodeKind::ClassDecl,
            NodeData::Import { .. } => NodeKind::ImportStmt,
            NodeData::Block { .. } => NodeKind::Block,
            NodeData::VarDecl { .. } => NodeKind::VarDecl,
            NodeData::FunDecl { .. } => NodeKind::FunDecl,
            NodeData::ExprStmt { .. } => NodeKind::ExprStmt,
            NodeData::If { .. } => NodeKind::IfStmt,
            NodeData::While { .. } => NodeKind::WhileStmt,
            NodeData::Return { .. } => NodeKind::ReturnStmt,
            NodeData::Noop => return None,
            NodeData::Identifier { .. } => NodeKind::Identifier,
            NodeData::Literal(_) => NodeKind::Literal,
            NodeData::ListLiteral { .. } => NodeKind::ListLiteral,
            NodeData::Binary { .. } => NodeKind::BinaryExpr,
            NodeData::PrefixUnary { .. } => NodeKind::PrefixUnaryExpr,
            NodeData::Call { .. } => NodeKind::CallExpr,
            NodeData::MethodCall { .. } => NodeKind::MethodCallExpr,
            NodeData::VarAssign { .. } => NodeKind::VarAssign,
            NodeData::Closure { .. } => NodeKind::Closure,
            NodeData::InvokeNew { .. } => NodeKind::InvokeNew,
            NodeData::VarDeclExpr(_) => NodeKind::VarDeclExpr,
            NodeData::FunDeclExpr(_) => NodeKind::FunDeclExpr,
            NodeData::Name { kind, .. } => Self::for_name(*kind),
            NodeData::Type(TypeRef::Class(_)) => NodeKind::ClassType,
            NodeData::Type(_) => NodeKind::BuiltinType,
        })
    }

    pub fn for_name(kind: NameKind) -> NodeKind {
        match kind {
            NameKind::Package => NodeKind::PackageName,
            NameKind::Class => NodeKind::ClassName,
            NameKind::Function => NodeKind::FunctionName,
            NameKind::Method => NodeKind::MethodName,
            NameKind::Parameter => NodeKind::ParameterName,
            NameKind::Variable => NodeKind::VariableName,
            NameKind::Field => NodeKind::FieldName,
        }
    }

    /// Kinds that mark the identifier of a declaration.
    pub fn is_name(self) -> bool {
        matches!(
            self,
            NodeKind::PackageName
                | NodeKind::ClassName
                | NodeKind::FunctionName
                | NodeKind::MethodName
                | NodeKind::ParameterName
                | NodeKind::VariableName
                | NodeKind::FieldName
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::ImportStmt => "IMPORT_STMT",
            NodeKind::ClassDecl => "CLASS_DECL",
            NodeKind::Block => "BLOCK",
            NodeKind::ExprStmt => "EXPR_STMT",
            NodeKind::VarDecl => "VAR_DECL",
            NodeKind::FunDecl => "FUN_DECL",
            NodeKind::IfStmt => "IF_STMT",
            NodeKind::WhileStmt => "WHILE_STMT",
            NodeKind::ReturnStmt => "RETURN_STMT",
            NodeKind::Identifier => "IDENTIFIER",
            NodeKind::Literal => "LITERAL",
            NodeKind::ListLiteral => "LIST_LITERAL",
            NodeKind::BinaryExpr => "BINARY_EXPR",
            NodeKind::PrefixUnaryExpr => "PREFIX_UNARY_EXPR",
            NodeKind::CallExpr => "CALL_EXPR",
            NodeKind::MethodCallExpr => "METHOD_CALL_EXPR",
            NodeKind::VarAssign => "VAR_ASSIGN",
            NodeKind::Closure => "CLOSURE",
            NodeKind::InvokeNew => "INVOKE_NEW",
            NodeKind::VarDeclExpr => "VAR_DECL_EXPR",
            NodeKind::FunDeclExpr => "FUN_DECL_EXPR",
            NodeKind::PackageName => "PACKAGE",
            NodeKind::ClassName => "CLASS",
            NodeKind::FunctionName => "FUNCTION",
            NodeKind::MethodName => "METHOD",
            NodeKind::ParameterName => "PARAMETER",
            NodeKind::VariableName => "VARIABLE",
            NodeKind::FieldName => "FIELD",
            NodeKind::ClassType => "CLASS_TYPE",
            NodeKind::BuiltinType => "BUILT_IN_TYPE",
            NodeKind::List => "LIST",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
