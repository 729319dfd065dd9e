//! Abstract Syntax Tree.
//!
//! This is the read-only tree surface consumed by the semantic passes. The
//! parser collaborator builds it; the passes only traverse it.

use std::fmt;

use smol_str::SmolStr;

use pytran_diagnostics::span::Spanned;

pub type Ident = SmolStr;

/// Represents the root of the AST. A translation unit is composed of a single
/// root node.
#[derive(Debug, PartialEq)]
pub struct Program {
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, PartialEq)]
pub enum Stmt {
    FunctionDef(Spanned<FunctionDefStmt>),
    ClassDef(Spanned<ClassDefStmt>),

    If(Spanned<IfStmt>),
    While(Spanned<WhileStmt>),
    For(Spanned<ForStmt>),

    Return(Spanned<ReturnStmt>),
    Yield(Spanned<YieldStmt>),
    Raise(Spanned<RaiseStmt>),
    Break,
    Continue,
    Pass,

    Assign(Spanned<AssignStmt>),
    Print(Spanned<PrintStmt>),
    Import(Spanned<ImportStmt>),

    /// An expression evaluated for its effect.
    Expr(Spanned<Expr>),
}

#[derive(Debug, PartialEq)]
pub struct FunctionDefStmt {
    pub ident: Spanned<Ident>,
    pub params: Vec<Spanned<Ident>>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, PartialEq)]
pub struct ClassDefStmt {
    pub ident: Spanned<Ident>,
    pub bases: Vec<Spanned<Ident>>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, PartialEq)]
pub struct IfStmt {
    pub cond: Spanned<Expr>,
    pub then_body: Vec<Spanned<Stmt>>,
    pub elif_blocks: Vec<(Spanned<Expr>, Vec<Spanned<Stmt>>)>,
    pub else_body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, PartialEq)]
pub struct WhileStmt {
    pub cond: Spanned<Expr>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, PartialEq)]
pub struct ForStmt {
    /// The loop target. Only simple names bind a variable.
    pub target: Spanned<Expr>,
    pub iter: Spanned<Expr>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Spanned<Expr>>,
}

#[derive(Debug, PartialEq)]
pub struct YieldStmt {
    pub value: Option<Spanned<Expr>>,
}

#[derive(Debug, PartialEq)]
pub struct RaiseStmt {
    pub exc: Option<Spanned<Expr>>,
}

#[derive(Debug, PartialEq)]
pub struct AssignStmt {
    pub target: Spanned<Expr>,
    pub value: Spanned<Expr>,
}

/// The Python 2 `print` statement.
#[derive(Debug, PartialEq)]
pub struct PrintStmt {
    pub args: Vec<Spanned<Expr>>,
}

#[derive(Debug, PartialEq)]
pub struct ImportStmt {
    pub module: Spanned<Ident>,
}

#[derive(Debug, PartialEq)]
pub enum Expr {
    Name(Spanned<NameExpr>),
    Lit(Spanned<LitExpr>),

    Binary(Spanned<BinaryExpr>),
    Unary(Spanned<UnaryExpr>),

    Call(Spanned<CallExpr>),
}

#[derive(Debug, PartialEq)]
pub struct NameExpr {
    pub ident: Spanned<Ident>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LitExpr {
    Bool(bool),
    Int(i64),
    /// The float is stored as a string representation.
    Float(String),
    Str(String),
    None,
}

impl LitExpr {
    /// Whether this literal compares equal to zero, the way the source
    /// language would. `False`, `0` and `0.0` all count.
    pub fn is_zero(&self) -> bool {
        match self {
            LitExpr::Bool(b) => !b,
            LitExpr::Int(n) => *n == 0,
            LitExpr::Float(repr) => repr.parse::<f64>() == Ok(0.0),
            LitExpr::Str(_) | LitExpr::None => false,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct BinaryExpr {
    pub lhs: Box<Spanned<Expr>>,
    pub op: Spanned<BinOp>,
    pub rhs: Box<Spanned<Expr>>,
}

#[derive(Debug, PartialEq)]
pub struct UnaryExpr {
    pub op: Spanned<UnaryOp>,
    pub expr: Box<Spanned<Expr>>,
}

#[derive(Debug, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Spanned<Expr>>,
    pub args: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    // Relational
    Eq,
    Neq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn is_division(self) -> bool {
        matches!(self, BinOp::Div | BinOp::FloorDiv)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

// Pretty printing implementations.

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
        };
        f.write_str(str)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "not",
        };
        f.write_str(str)
    }
}
