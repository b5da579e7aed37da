//! Abstract Syntax Tree definitions for the fixture script subset.
//!
//! Function bodies are held behind `Rc` so the runtime can capture a function declaration in a closure value
//! without cloning its body.

use std::fmt;
use std::rc::Rc;

use t262_core::lang::keywords::{self, KeywordId};
use t262_core::lang::operators::{self, OperatorId};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A script is a list of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Spanned<Statement>>,
}

impl Program {
    /// Names of top-level function declarations, in source order.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.body.iter().filter_map(|stmt| match &stmt.node {
            Statement::Function(decl) => decl.name.as_deref(),
            _ => None,
        })
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Var(Vec<VarDeclarator>),
    Function(Rc<FunctionDecl>),
    Expr(Spanned<Expr>),
    Block(Vec<Spanned<Statement>>),
    If(IfStmt),
    While(LoopStmt),
    DoWhile(LoopStmt),
    For(ForStmt),
    ForIn(ForInStmt),
    Return(Option<Spanned<Expr>>),
    Break,
    Continue,
    Throw(Spanned<Expr>),
    Try(TryStmt),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: Ident,
    pub init: Option<Spanned<Expr>>,
}

/// A function declaration or expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Always present for declarations; optional for expressions.
    pub name: Option<Ident>,
    pub params: Vec<Ident>,
    pub body: Vec<Spanned<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Spanned<Expr>,
    pub then_branch: Box<Spanned<Statement>>,
    pub else_branch: Option<Box<Spanned<Statement>>>,
}

/// Shared shape of `while` and `do ... while`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopStmt {
    pub condition: Spanned<Expr>,
    pub body: Box<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub condition: Option<Spanned<Expr>>,
    pub update: Option<Spanned<Expr>>,
    pub body: Box<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Var(Vec<VarDeclarator>),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForInStmt {
    /// `var name` declares the binding; a bare name assigns to an existing one.
    pub declares: bool,
    pub name: Ident,
    pub object: Spanned<Expr>,
    pub body: Box<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub block: Vec<Spanned<Statement>>,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<Vec<Spanned<Statement>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Ident,
    pub body: Vec<Spanned<Statement>>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Ident(Ident),
    This,
    Array(Vec<Spanned<Expr>>),
    Object(Vec<ObjectProperty>),
    Function(Rc<FunctionDecl>),
    Unary(UnaryOp, Box<Spanned<Expr>>),
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Spanned<Expr>>,
    },
    Binary(Box<Spanned<Expr>>, BinaryOp, Box<Spanned<Expr>>),
    Logical(Box<Spanned<Expr>>, LogicalOp, Box<Spanned<Expr>>),
    Conditional {
        condition: Box<Spanned<Expr>>,
        then_expr: Box<Spanned<Expr>>,
        else_expr: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Member(Box<Spanned<Expr>>, Ident),
    Index(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    Call(Box<Spanned<Expr>>, Vec<Spanned<Expr>>),
    New(Box<Spanned<Expr>>, Vec<Spanned<Expr>>),
    /// `a, b, c`: evaluates left to right, yields the last value.
    Sequence(Vec<Spanned<Expr>>),
}

impl Expr {
    /// Return `true` if this expression may appear on the left of `=` or as a `++`/`--` operand.
    pub fn is_assignment_target(&self) -> bool {
        matches!(self, Expr::Ident(_) | Expr::Member(..) | Expr::Index(..))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    /// Identifier, string and numeric keys are all normalized to their string form.
    pub key: String,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    Typeof,
    Void,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    In,
    Instanceof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    /// `+=`, `-=`, ...: apply the arithmetic operator, then assign.
    Compound(BinaryOp),
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spelling = match self {
            BinaryOp::Add => operators::as_str(OperatorId::Plus),
            BinaryOp::Sub => operators::as_str(OperatorId::Minus),
            BinaryOp::Mul => operators::as_str(OperatorId::Star),
            BinaryOp::Div => operators::as_str(OperatorId::Slash),
            BinaryOp::Mod => operators::as_str(OperatorId::Percent),
            BinaryOp::Eq => operators::as_str(OperatorId::Eq),
            BinaryOp::NotEq => operators::as_str(OperatorId::NotEq),
            BinaryOp::StrictEq => operators::as_str(OperatorId::StrictEq),
            BinaryOp::StrictNotEq => operators::as_str(OperatorId::StrictNotEq),
            BinaryOp::Lt => operators::as_str(OperatorId::Lt),
            BinaryOp::Gt => operators::as_str(OperatorId::Gt),
            BinaryOp::LtEq => operators::as_str(OperatorId::LtEq),
            BinaryOp::GtEq => operators::as_str(OperatorId::GtEq),
            BinaryOp::In => keywords::as_str(KeywordId::In),
            BinaryOp::Instanceof => keywords::as_str(KeywordId::Instanceof),
        };
        f.write_str(spelling)
    }
}
